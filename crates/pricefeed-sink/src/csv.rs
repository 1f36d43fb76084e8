//! CSV file sink.

use async_trait::async_trait;
use polars::prelude::*;
use pricefeed_core::{DailySeries, DataError, PriceSink, Result, Symbol};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Column labels, index column first, prices in API field order.
pub const CSV_COLUMNS: [&str; 6] = [
    "Date",
    "1. open",
    "2. high",
    "3. low",
    "4. close",
    "5. volume",
];

/// Writes a daily series to a single CSV file.
///
/// Every write replaces the file wholesale. There is no temporary file or
/// atomic rename, so a crash mid-write can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the output table: one row per date in series order, raw API
    /// values as strings.
    ///
    /// # Errors
    /// Returns [`DataError::Other`] if polars rejects the columns.
    pub fn to_frame(series: &DailySeries) -> Result<DataFrame> {
        let mut dates = Vec::with_capacity(series.len());
        let mut opens = Vec::with_capacity(series.len());
        let mut highs = Vec::with_capacity(series.len());
        let mut lows = Vec::with_capacity(series.len());
        let mut closes = Vec::with_capacity(series.len());
        let mut volumes = Vec::with_capacity(series.len());

        for (date, bar) in series.iter() {
            dates.push(date);
            opens.push(bar.open.as_str());
            highs.push(bar.high.as_str());
            lows.push(bar.low.as_str());
            closes.push(bar.close.as_str());
            volumes.push(bar.volume.as_str());
        }

        let [date_col, open_col, high_col, low_col, close_col, volume_col] = CSV_COLUMNS;

        DataFrame::new(vec![
            Column::new(date_col.into(), dates),
            Column::new(open_col.into(), opens),
            Column::new(high_col.into(), highs),
            Column::new(low_col.into(), lows),
            Column::new(close_col.into(), closes),
            Column::new(volume_col.into(), volumes),
        ])
        .map_err(|e| DataError::Other(e.to_string()))
    }
}

#[async_trait]
impl PriceSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    #[instrument(skip(self, series), fields(symbol = %symbol, path = %self.path.display(), rows = series.len()))]
    async fn write(&self, symbol: &Symbol, series: &DailySeries) -> Result<usize> {
        let mut df = Self::to_frame(series)?;

        let mut file = File::create(&self.path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| DataError::Other(format!("writing {}: {e}", self.path.display())))?;

        debug!("Wrote {} CSV rows", df.height());
        info!("{symbol} data has been written to {}.", self.path.display());
        Ok(df.height())
    }
}
