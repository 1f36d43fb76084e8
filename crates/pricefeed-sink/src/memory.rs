//! In-memory sink implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use pricefeed_core::{DailySeries, PriceRecord, PriceSink, Result, Symbol};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory sink for testing and development.
///
/// Rows live in an `RwLock`-protected map keyed by date, with the same
/// last-write-wins semantics as the SQLite sink. Nothing touches the disk.
#[derive(Debug, Default)]
pub struct InMemorySink {
    rows: RwLock<BTreeMap<NaiveDate, PriceRecord>>,
    writes: AtomicUsize,
}

impl InMemorySink {
    /// Create a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Returns the stored row for `date`, if any.
    pub async fn get(&self, date: NaiveDate) -> Option<PriceRecord> {
        self.rows.read().await.get(&date).copied()
    }

    /// Returns all stored rows in ascending date order.
    pub async fn records(&self) -> Vec<PriceRecord> {
        self.rows.read().await.values().copied().collect()
    }

    /// Returns how many times [`write`](PriceSink::write) has been called.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSink for InMemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn targets(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    #[instrument(skip(self, series), fields(symbol = %symbol, rows = series.len()))]
    async fn write(&self, symbol: &Symbol, series: &DailySeries) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let records = series.records()?;
        let mut rows = self.rows.write().await;
        for record in &records {
            rows.insert(record.date, *record);
        }
        debug!("Stored {} {symbol} rows in memory", records.len());
        Ok(records.len())
    }
}
