//! Core data types for daily price data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`DailyBar`] - One day of prices exactly as the API reports them
//! - [`DailySeries`] - The `Time Series (Daily)` map, keyed by date, in response order
//! - [`DailyResponse`] - A parsed `TIME_SERIES_DAILY` response body
//! - [`PriceRecord`] - A typed, persisted row keyed by calendar date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::fmt;

use crate::error::{DataError, Result};

/// Date format used for series keys and the persisted `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One day of OHLCV values as reported by the API.
///
/// Values stay as strings so file sinks can reproduce them verbatim; use
/// [`PriceRecord::from_bar`] to coerce them into numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Opening price.
    #[serde(rename = "1. open")]
    pub open: String,
    /// Highest price of the day.
    #[serde(rename = "2. high")]
    pub high: String,
    /// Lowest price of the day.
    #[serde(rename = "3. low")]
    pub low: String,
    /// Closing price.
    #[serde(rename = "4. close")]
    pub close: String,
    /// Shares traded.
    #[serde(rename = "5. volume")]
    pub volume: String,
}

impl DailyBar {
    /// Creates a bar from its five raw values.
    #[must_use]
    pub fn new(
        open: impl Into<String>,
        high: impl Into<String>,
        low: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
        }
    }
}

/// The `Time Series (Daily)` mapping of ISO date strings to [`DailyBar`]s.
///
/// Entries keep the order they arrived in, which for Alpha Vantage is newest
/// first. Re-inserting a date replaces its bar in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries(IndexMap<String, DailyBar>);

impl DailySeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Inserts or replaces the bar for a date.
    pub fn insert(&mut self, date: impl Into<String>, bar: DailyBar) {
        self.0.insert(date.into(), bar);
    }

    /// Returns the bar for a date, if present.
    #[must_use]
    pub fn get(&self, date: &str) -> Option<&DailyBar> {
        self.0.get(date)
    }

    /// Returns the number of dated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the series has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over `(date, bar)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailyBar)> {
        self.0.iter().map(|(date, bar)| (date.as_str(), bar))
    }

    /// Coerces every entry into a [`PriceRecord`].
    ///
    /// # Errors
    /// Returns [`DataError::Parse`] on the first entry whose date or values
    /// cannot be coerced.
    pub fn records(&self) -> Result<Vec<PriceRecord>> {
        self.iter()
            .map(|(date, bar)| PriceRecord::from_bar(date, bar))
            .collect()
    }
}

impl FromIterator<(String, DailyBar)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (String, DailyBar)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A parsed `TIME_SERIES_DAILY` response body.
///
/// Alpha Vantage answers throttled or invalid calls with HTTP 200 and one of
/// the advisory fields set instead of the time series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyResponse {
    /// Request metadata echoed back by the API.
    #[serde(rename = "Meta Data", default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<serde_json::Value>,
    /// The daily series, absent on advisory responses.
    #[serde(
        rename = "Time Series (Daily)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub time_series: Option<DailySeries>,
    /// Throttling notice.
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Premium endpoint or daily limit notice.
    #[serde(rename = "Information", default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    /// Invalid call description.
    #[serde(rename = "Error Message", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DailyResponse {
    /// Returns the daily series, or an empty series when the key was absent.
    #[must_use]
    pub fn series(&self) -> DailySeries {
        self.time_series.clone().unwrap_or_default()
    }

    /// Returns the advisory messages carried by the body, in a stable order.
    pub fn advisories(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Note", self.note.as_deref()),
            ("Information", self.information.as_deref()),
            ("Error Message", self.error_message.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, msg)| msg.map(|m| (label, m)))
    }
}

/// A typed daily price row, unique per `date`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading date, the primary key.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

impl PriceRecord {
    /// Creates a new record.
    #[must_use]
    pub const fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Coerces a raw bar into a record: prices to `f64`, volume to integer.
    ///
    /// # Errors
    /// Returns [`DataError::Parse`] naming the offending date and field.
    pub fn from_bar(date: &str, bar: &DailyBar) -> Result<Self> {
        let parsed_date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|e| DataError::Parse(format!("invalid date {date:?}: {e}")))?;

        let price = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| DataError::Parse(format!("{date} {field} {raw:?}: {e}")))
        };

        let volume = bar
            .volume
            .trim()
            .parse::<u64>()
            .map_err(|e| DataError::Parse(format!("{date} volume {:?}: {e}", bar.volume)))?;

        Ok(Self {
            date: parsed_date,
            open: price("open", &bar.open)?,
            high: price("high", &bar.high)?,
            low: price("low", &bar.low)?,
            close: price("close", &bar.close)?,
            volume,
        })
    }

    /// Returns the date in its persisted `YYYY-MM-DD` form.
    #[must_use]
    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
