//! Run configuration.
//!
//! The API key is read once at startup and passed explicitly to the provider.

use std::fmt;
use std::sync::Arc;

use pricefeed_alphavantage::{ALPHA_VANTAGE_URL, AlphaVantageProvider};
use pricefeed_core::{DailySeriesProvider, OutputSize, Symbol};
use tracing::{debug, warn};

/// Environment variable holding the Alpha Vantage API key.
pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

/// The single instrument this tool ingests.
pub const DEFAULT_SYMBOL: &str = "SPY";

/// CSV output of the CSV program.
pub const CSV_PATH: &str = "spy_data.csv";

/// SQLite database of the database program.
pub const DATABASE_PATH: &str = "financial_data.db";

/// Companion SQL script path; its directory is created but the file is not written.
pub const SQL_SCRIPT_PATH: &str = "sql/spy_data.sql";

/// Companion CSV path of the database program; its directory is created but the file is not written.
pub const COMPANION_CSV_PATH: &str = "data/spy_data.csv";

/// Settings for one ingestion run.
#[derive(Clone)]
pub struct Config {
    /// Alpha Vantage API key. `None` sends the request without one.
    pub api_key: Option<String>,
    /// Instrument to fetch.
    pub symbol: Symbol,
    /// Amount of history to request.
    pub output_size: OutputSize,
    /// Query endpoint.
    pub base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("symbol", &self.symbol)
            .field("output_size", &self.output_size)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Create a configuration with the default symbol, output size and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_key(Some(api_key.into()))
    }

    fn from_key(api_key: Option<String>) -> Self {
        Self {
            api_key,
            symbol: Symbol::new(DEFAULT_SYMBOL),
            output_size: OutputSize::default(),
            base_url: ALPHA_VANTAGE_URL.to_string(),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or any parent) is loaded first
    /// when present; variables already set in the environment take precedence.
    #[must_use]
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// A missing or blank API key is logged and left unset; the run still goes
    /// ahead and the API reports the problem in its response body.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if api_key.is_none() {
            warn!("{API_KEY_VAR} is not set, requesting without an API key");
        }
        Self::from_key(api_key)
    }

    /// Set the amount of history to request.
    #[must_use]
    pub const fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    /// Set the query endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the provider described by this configuration.
    #[must_use]
    pub fn provider(&self) -> Arc<dyn DailySeriesProvider> {
        let provider = match &self.api_key {
            Some(key) => AlphaVantageProvider::new(key.clone()),
            None => AlphaVantageProvider::without_key(),
        };
        Arc::new(
            provider
                .with_base_url(self.base_url.clone())
                .with_output_size(self.output_size),
        )
    }
}
