#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricefeed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Sink implementations for daily price data.
//!
//! This crate provides implementations of the [`PriceSink`] trait from `pricefeed-core`:
//!
//! - [`CsvSink`] - Whole-file CSV output (requires `csv` feature)
//! - [`SqliteSink`] - Upsert into a SQLite table (requires `sqlite` feature)
//! - [`InMemorySink`] - Map-backed sink for testing

/// In-memory sink implementation.
pub mod memory;

/// CSV file sink implementation.
#[cfg(feature = "csv")]
pub mod csv;

/// SQLite sink implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use pricefeed_core::PriceSink;

// Re-export implementations
pub use memory::InMemorySink;

#[cfg(feature = "csv")]
pub use csv::{CSV_COLUMNS, CsvSink};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteSink, TABLE_NAME};
