//! SQLite table sink.

use async_trait::async_trait;
use chrono::NaiveDate;
use pricefeed_core::{
    DATE_FORMAT, DailySeries, DataError, PriceRecord, PriceSink, Result, Symbol,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Table holding one row per trading date.
pub const TABLE_NAME: &str = "spy_data";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS spy_data (
    date TEXT PRIMARY KEY,
    open REAL,
    high REAL,
    low REAL,
    close REAL,
    volume INTEGER
)";

const UPSERT_SQL: &str = "INSERT OR REPLACE INTO spy_data (date, open, high, low, close, volume)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// SQLite-backed sink keyed by date.
///
/// Holds only the database path. Every operation opens its own connection
/// and drops it before returning; nothing is pooled or shared between
/// schema creation and insertion.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    /// Create a sink for the database file at `path`.
    ///
    /// Nothing is touched on disk until [`create_database`](Self::create_database)
    /// or another operation runs.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self, step: &str) -> Result<Connection> {
        Connection::open(&self.path).map_err(|e| {
            DataError::Storage(format!("{step}: opening {}: {e}", self.path.display()))
        })
    }

    /// Create the database file if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] if the file cannot be opened or created.
    pub fn create_database(&self) -> Result<()> {
        let conn = self.connect("creating the database")?;
        conn.close()
            .map_err(|(_, e)| DataError::Storage(format!("creating the database: {e}")))?;
        info!("Database created successfully.");
        Ok(())
    }

    /// Create the `spy_data` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] on any SQLite failure.
    pub fn create_tables(&self) -> Result<()> {
        let conn = self.connect("creating table")?;
        conn.execute(CREATE_TABLE_SQL, [])
            .map_err(|e| DataError::Storage(format!("creating table: {e}")))?;
        info!("Table '{TABLE_NAME}' created successfully.");
        Ok(())
    }

    /// Insert or replace one row per record, keyed by date.
    ///
    /// All rows go through one transaction, committed at the end. A failure
    /// part-way drops the transaction, which rolls back the rows of this call.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] on any SQLite failure.
    pub fn insert(&self, symbol: &Symbol, records: &[PriceRecord]) -> Result<usize> {
        let mut conn = self.connect("inserting data")?;
        let tx = conn
            .transaction()
            .map_err(|e| DataError::Storage(format!("inserting {symbol} data: {e}")))?;

        for record in records {
            let volume = i64::try_from(record.volume).map_err(|_| {
                DataError::Parse(format!(
                    "{} volume {} exceeds INTEGER range",
                    record.date, record.volume
                ))
            })?;

            tx.execute(
                UPSERT_SQL,
                params![
                    record.date_key(),
                    record.open,
                    record.high,
                    record.low,
                    record.close,
                    volume
                ],
            )
            .map_err(|e| DataError::Storage(format!("inserting {symbol} data: {e}")))?;
        }

        tx.commit()
            .map_err(|e| DataError::Storage(format!("inserting {symbol} data: {e}")))?;
        info!("{symbol} data inserted successfully.");
        debug!("Upserted {} rows", records.len());
        Ok(records.len())
    }

    /// Returns the number of rows in the table.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] on any SQLite failure, including a
    /// missing table.
    pub fn row_count(&self) -> Result<usize> {
        let conn = self.connect("counting rows")?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM spy_data", [], |row| row.get(0))
            .map_err(|e| DataError::Storage(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Returns the stored row for `date`, if any.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] on any SQLite failure.
    pub fn get(&self, date: NaiveDate) -> Result<Option<PriceRecord>> {
        let conn = self.connect("reading a row")?;
        let key = date.format(DATE_FORMAT).to_string();

        let row = conn
            .query_row(
                "SELECT open, high, low, close, volume FROM spy_data WHERE date = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| DataError::Storage(e.to_string()))?;

        row.map(|(open, high, low, close, volume)| {
            let volume = u64::try_from(volume)
                .map_err(|_| DataError::Parse(format!("{key} has negative volume {volume}")))?;
            Ok(PriceRecord::new(date, open, high, low, close, volume))
        })
        .transpose()
    }
}

#[async_trait]
impl PriceSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn prepare(&self) -> Result<()> {
        if let Err(e) = self.create_database() {
            error!("Error: {e}");
        }
        self.create_tables()
    }

    #[instrument(skip(self, series), fields(symbol = %symbol, path = %self.path.display(), rows = series.len()))]
    async fn write(&self, symbol: &Symbol, series: &DailySeries) -> Result<usize> {
        let records = series.records()?;
        if records.is_empty() {
            debug!("Empty series, nothing to insert");
            return Ok(0);
        }
        self.insert(symbol, &records)
    }
}
