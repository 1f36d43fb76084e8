//! Fetch the SPY daily series and write it to a CSV file.

use std::path::PathBuf;

use clap::Parser;
use pricefeed::{CSV_PATH, Config, CsvSink};
use pricefeed_cli::{FetchArgs, ingest, init_tracing};

#[derive(Debug, Parser)]
#[command(name = "spy-csv", about = "Write SPY daily prices to a CSV file")]
struct Cli {
    /// CSV file to overwrite.
    #[arg(long, default_value = CSV_PATH)]
    output: PathBuf,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.fetch.apply(Config::from_env());
    let sink = CsvSink::new(cli.output);

    ingest(&config, &sink, &[]).await?;
    Ok(())
}
