//! Ingestion pipeline: bootstrap, prepare, fetch, write.

use std::path::PathBuf;
use std::sync::Arc;

use pricefeed_core::{DailySeriesProvider, DataError, DataProvider, PriceSink, Result, Symbol};
use tracing::{debug, error, info, instrument};

use crate::bootstrap::ensure_parent_dirs;
use crate::config::Config;

/// What a single run ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The provider returned no data (non-success status); nothing was written.
    NoData,
    /// The sink persisted this many rows.
    Written(usize),
    /// The sink reported a storage error; it has been logged.
    StorageFailed,
}

/// Runs one fetch against a provider and hands the result to a sink.
///
/// Storage errors from the sink are logged and absorbed so the run can go on;
/// every other error is returned to the caller.
pub struct Pipeline {
    provider: Arc<dyn DailySeriesProvider>,
    symbol: Symbol,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("provider", &self.provider.name())
            .field("symbol", &self.symbol)
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline fetching `symbol` from `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn DailySeriesProvider>, symbol: Symbol) -> Self {
        Self { provider, symbol }
    }

    /// Create a pipeline from run configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.provider(), config.symbol.clone())
    }

    /// Returns the symbol this pipeline fetches.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Run the pipeline once.
    ///
    /// `extra_paths` are bootstrapped alongside the sink's own targets.
    ///
    /// # Errors
    /// Returns bootstrap failures, fetch failures (network, parse), and any
    /// non-storage error raised by the sink.
    #[instrument(skip(self, sink, extra_paths), fields(symbol = %self.symbol, sink = sink.name()))]
    pub async fn run(
        &self,
        sink: &dyn PriceSink,
        extra_paths: &[PathBuf],
    ) -> Result<IngestOutcome> {
        let mut targets = sink.targets();
        targets.extend_from_slice(extra_paths);
        ensure_parent_dirs(&targets)?;

        if let Err(e) = sink.prepare().await {
            absorb_storage_error(sink, "prepare", e)?;
        }

        debug!(provider = self.provider.name(), "Fetching daily series");
        let Some(response) = self.provider.fetch_daily(&self.symbol).await? else {
            info!("No {} data fetched, skipping {} write", self.symbol, sink.name());
            return Ok(IngestOutcome::NoData);
        };

        let series = response.series();
        debug!(rows = series.len(), "Fetched daily series");

        match sink.write(&self.symbol, &series).await {
            Ok(rows) => Ok(IngestOutcome::Written(rows)),
            Err(e) => {
                absorb_storage_error(sink, "write", e)?;
                Ok(IngestOutcome::StorageFailed)
            }
        }
    }
}

/// Log a storage error and swallow it; hand anything else back.
fn absorb_storage_error(sink: &dyn PriceSink, step: &str, e: DataError) -> Result<()> {
    if e.is_storage() {
        error!(sink = sink.name(), step, "Error: {e}");
        Ok(())
    } else {
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    #[cfg(feature = "sqlite")]
    use chrono::NaiveDate;
    use mockito::{Matcher, ServerGuard};
    use pricefeed_core::DailySeries;
    use pricefeed_sink::InMemorySink;
    #[cfg(feature = "csv")]
    use pricefeed_sink::CsvSink;
    #[cfg(feature = "sqlite")]
    use pricefeed_sink::SqliteSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn body(entries: &[(&str, &str)]) -> String {
        let series: Vec<String> = entries
            .iter()
            .map(|(date, close)| {
                format!(
                    r#""{date}": {{"1. open": "100.0", "2. high": "101.0", "3. low": "99.0", "4. close": "{close}", "5. volume": "1000"}}"#
                )
            })
            .collect();
        format!(
            r#"{{"Meta Data": {{"2. Symbol": "SPY"}}, "Time Series (Daily)": {{{}}}}}"#,
            series.join(", ")
        )
    }

    async fn serve(status: usize, body: &str) -> ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::UrlEncoded("symbol".into(), "SPY".into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        server
    }

    fn pipeline_for(server: &ServerGuard) -> Pipeline {
        let config = Config::new("test_key").with_base_url(format!("{}/query", server.url()));
        Pipeline::from_config(&config)
    }

    #[cfg(feature = "csv")]
    fn csv_data_rows(path: &std::path::Path) -> usize {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .count()
    }

    /// Sink whose every operation fails at the storage layer.
    #[derive(Debug, Default)]
    struct BrokenStore {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl PriceSink for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        fn targets(&self) -> Vec<PathBuf> {
            Vec::new()
        }

        async fn prepare(&self) -> Result<()> {
            Err(DataError::Storage("database is locked".into()))
        }

        async fn write(&self, _symbol: &Symbol, _series: &DailySeries) -> Result<usize> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(DataError::Storage("database is locked".into()))
        }
    }

    #[cfg(feature = "csv")]
    #[tokio::test]
    async fn test_csv_run_writes_all_rows() {
        let server = serve(
            200,
            &body(&[("2024-01-02", "472.65"), ("2024-01-03", "468.79"), ("2024-01-04", "467.28")]),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out").join("spy_data.csv"));

        let outcome = pipeline_for(&server).run(&sink, &[]).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Written(3));
        assert_eq!(csv_data_rows(sink.path()), 3);
    }

    #[cfg(all(feature = "csv", feature = "sqlite"))]
    #[tokio::test]
    async fn test_not_found_writes_nothing() {
        let server = serve(404, "{}").await;
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_for(&server);

        let memory = InMemorySink::new();
        assert_eq!(pipeline.run(&memory, &[]).await.unwrap(), IngestOutcome::NoData);
        assert_eq!(memory.write_calls(), 0);

        let csv = CsvSink::new(dir.path().join("spy_data.csv"));
        assert_eq!(pipeline.run(&csv, &[]).await.unwrap(), IngestOutcome::NoData);
        assert!(!csv.path().exists());

        let db = SqliteSink::new(dir.path().join("financial_data.db"));
        assert_eq!(pipeline.run(&db, &[]).await.unwrap(), IngestOutcome::NoData);
        assert_eq!(db.row_count().unwrap(), 0);
    }

    #[cfg(all(feature = "csv", feature = "sqlite"))]
    #[tokio::test]
    async fn test_missing_series_key_writes_no_rows() {
        let server = serve(200, r#"{"Note": "Thank you for using Alpha Vantage!"}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_for(&server);

        let csv = CsvSink::new(dir.path().join("spy_data.csv"));
        assert_eq!(pipeline.run(&csv, &[]).await.unwrap(), IngestOutcome::Written(0));
        assert_eq!(csv_data_rows(csv.path()), 0);

        let db = SqliteSink::new(dir.path().join("financial_data.db"));
        assert_eq!(pipeline.run(&db, &[]).await.unwrap(), IngestOutcome::Written(0));
        assert_eq!(db.row_count().unwrap(), 0);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_database_reruns_are_idempotent() {
        let entries = [("2024-01-02", "472.65"), ("2024-01-03", "468.79")];
        let server = serve(200, &body(&entries)).await;
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteSink::new(dir.path().join("financial_data.db"));
        let pipeline = pipeline_for(&server);

        pipeline.run(&db, &[]).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let first = db.get(day).unwrap();

        pipeline.run(&db, &[]).await.unwrap();

        assert_eq!(db.row_count().unwrap(), 2);
        assert_eq!(db.get(day).unwrap(), first);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_database_revision_updates_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteSink::new(dir.path().join("financial_data.db"));
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let jan3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        let server = serve(200, &body(&[("2024-01-02", "472.65"), ("2024-01-03", "468.79")])).await;
        pipeline_for(&server).run(&db, &[]).await.unwrap();
        let before = db.get(jan2).unwrap();

        let server = serve(200, &body(&[("2024-01-02", "472.65"), ("2024-01-03", "470.00")])).await;
        pipeline_for(&server).run(&db, &[]).await.unwrap();

        assert_eq!(db.row_count().unwrap(), 2);
        assert_eq!(db.get(jan2).unwrap(), before);
        assert_eq!(db.get(jan3).unwrap().unwrap().close, 470.0);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_bootstraps_extra_paths_before_fetch() {
        // 404 so nothing is written, yet directories must exist.
        let server = serve(404, "").await;
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteSink::new(dir.path().join("store").join("financial_data.db"));
        let extras = vec![
            dir.path().join("sql").join("spy_data.sql"),
            dir.path().join("data").join("spy_data.csv"),
        ];

        pipeline_for(&server).run(&db, &extras).await.unwrap();

        assert!(dir.path().join("store").is_dir());
        assert!(dir.path().join("sql").is_dir());
        assert!(dir.path().join("data").is_dir());
        assert!(!extras[0].exists());
        assert!(!extras[1].exists());
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_missing_api_key_still_prepares_database() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Regex(
                "^function=TIME_SERIES_DAILY&symbol=SPY&outputsize=full$".into(),
            ))
            .with_status(200)
            .with_body(r#"{"Error Message": "the parameter apikey is invalid or missing."}"#)
            .expect(1)
            .create_async()
            .await;
        let config =
            Config::from_lookup(|_| None).with_base_url(format!("{}/query", server.url()));
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteSink::new(dir.path().join("financial_data.db"));
        let extras = vec![
            dir.path().join("sql").join("spy_data.sql"),
            dir.path().join("data").join("spy_data.csv"),
        ];

        let outcome = Pipeline::from_config(&config).run(&db, &extras).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Written(0));
        assert!(dir.path().join("sql").is_dir());
        assert!(dir.path().join("data").is_dir());
        assert!(db.path().exists());
        assert_eq!(db.row_count().unwrap(), 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_storage_errors_are_absorbed() {
        let server = serve(200, &body(&[("2024-01-02", "472.65")])).await;
        let sink = BrokenStore::default();

        let outcome = pipeline_for(&server).run(&sink, &[]).await.unwrap();

        assert_eq!(outcome, IngestOutcome::StorageFailed);
        // A failed prepare does not stop the write attempt.
        assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parse_errors_are_fatal() {
        let server = serve(200, "not json").await;
        let memory = InMemorySink::new();

        let err = pipeline_for(&server).run(&memory, &[]).await.unwrap_err();

        assert!(matches!(err, DataError::Parse(_)));
        assert_eq!(memory.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_network_errors_are_fatal() {
        let config = Config::new("test_key").with_base_url("http://127.0.0.1:1/query");
        let memory = InMemorySink::new();

        let err = Pipeline::from_config(&config)
            .run(&memory, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, DataError::Network(_)));
    }

    #[test]
    fn test_debug_shows_provider_name() {
        let pipeline = Pipeline::from_config(&Config::new("k"));
        let debug_str = format!("{pipeline:?}");
        assert!(debug_str.contains("Alpha Vantage"));
        assert_eq!(pipeline.symbol().as_str(), "SPY");
    }
}
