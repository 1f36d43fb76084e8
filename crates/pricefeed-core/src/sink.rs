//! Sink trait for persisting fetched daily series.
//!
//! This module defines the [`PriceSink`] trait that gives the pipeline one
//! interface over every durable destination (CSV file, SQLite table, memory).

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::{
    error::Result,
    types::{DailySeries, Symbol},
};

/// A destination for daily price data.
///
/// Writes are last-write-wins per date: persisting a series that contains a
/// date already present replaces the stored values for that date.
#[async_trait]
pub trait PriceSink: Send + Sync + Debug {
    /// Returns a short name for log lines (e.g. "csv", "sqlite").
    fn name(&self) -> &str;

    /// Returns the files this sink writes to.
    ///
    /// Their parent directories must exist before [`prepare`](Self::prepare)
    /// or [`write`](Self::write) is called.
    fn targets(&self) -> Vec<PathBuf>;

    /// Performs one-time setup before data is fetched.
    ///
    /// Must be idempotent. The default does nothing.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Persists every entry of `series` fetched for `symbol`, returning the
    /// number of rows written.
    async fn write(&self, symbol: &Symbol, series: &DailySeries) -> Result<usize>;
}
