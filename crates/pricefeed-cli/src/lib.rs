#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricefeed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Shared plumbing for the `spy-csv` and `spy-db` programs.

use std::path::PathBuf;

use clap::Args;
use pricefeed::{Config, IngestOutcome, OutputSize, Pipeline, PriceSink};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Fetch options common to both programs.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FetchArgs {
    /// Request only the latest 100 trading days instead of the full history.
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

impl FetchArgs {
    /// Output size matching the flags.
    #[must_use]
    pub const fn output_size(&self) -> OutputSize {
        if self.compact { OutputSize::Compact } else { OutputSize::Full }
    }

    /// Apply the flags on top of a loaded configuration.
    #[must_use]
    pub fn apply(&self, config: Config) -> Config {
        config.with_output_size(self.output_size())
    }
}

/// Run one ingestion into `sink` and report how it went.
///
/// # Errors
/// Returns any error the pipeline does not absorb: bootstrap, network and
/// parse failures, plus non-storage sink errors.
pub async fn ingest(
    config: &Config,
    sink: &dyn PriceSink,
    extra_paths: &[PathBuf],
) -> anyhow::Result<IngestOutcome> {
    let pipeline = Pipeline::from_config(config);
    let outcome = pipeline.run(sink, extra_paths).await?;

    match outcome {
        IngestOutcome::Written(rows) => info!(rows, sink = sink.name(), "Run complete"),
        IngestOutcome::NoData => warn!(symbol = %pipeline.symbol(), "Run complete, nothing fetched"),
        IngestOutcome::StorageFailed => warn!(sink = sink.name(), "Run complete, storage failed"),
    }
    Ok(outcome)
}
