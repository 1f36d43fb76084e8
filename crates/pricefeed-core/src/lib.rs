#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricefeed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the pricefeed pipeline.
//!
//! - [`DailySeriesProvider`](provider::DailySeriesProvider) - Fetches a daily series
//! - [`PriceSink`](sink::PriceSink) - Persists a daily series

/// Error types for data operations.
pub mod error;
/// Output size selection for requests.
pub mod output_size;
/// Provider traits for fetching market data.
pub mod provider;
/// Sink trait for persisting fetched data.
pub mod sink;
/// Core data types (Symbol, DailySeries, PriceRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use output_size::OutputSize;
pub use provider::{DailySeriesProvider, DataProvider};
pub use sink::PriceSink;
pub use types::{DATE_FORMAT, DailyBar, DailyResponse, DailySeries, PriceRecord, Symbol};
