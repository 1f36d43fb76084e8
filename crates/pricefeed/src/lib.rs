#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricefeed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Daily price ingestion for a single instrument.
//!
//! This crate re-exports the core types, the Alpha Vantage provider and the
//! sink implementations, and adds the pieces that tie them together:
//! [`Config`], [`bootstrap`] and [`Pipeline`].
//!
//! # Features
//!
//! - `csv` - CSV file sink
//! - `sqlite` - SQLite table sink
//!
//! # Example
//!
//! ```rust,ignore
//! use pricefeed::{Config, CsvSink, Pipeline, CSV_PATH};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> pricefeed::Result<()> {
//!     let config = Config::from_env();
//!     let sink = CsvSink::new(CSV_PATH);
//!
//!     let outcome = Pipeline::from_config(&config).run(&sink, &[]).await?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use pricefeed_core::*;

// Sink implementations
pub use pricefeed_sink::InMemorySink;
#[cfg(feature = "csv")]
pub use pricefeed_sink::{CSV_COLUMNS, CsvSink};
#[cfg(feature = "sqlite")]
pub use pricefeed_sink::{SqliteSink, TABLE_NAME};

// Providers
pub use pricefeed_alphavantage::{ALPHA_VANTAGE_URL, AlphaVantageProvider};

/// Output directory bootstrap.
pub mod bootstrap;
/// Run configuration.
pub mod config;
/// Ingestion pipeline.
pub mod pipeline;

pub use config::{
    API_KEY_VAR, COMPANION_CSV_PATH, CSV_PATH, Config, DATABASE_PATH, DEFAULT_SYMBOL,
    SQL_SCRIPT_PATH,
};
pub use pipeline::{IngestOutcome, Pipeline};
