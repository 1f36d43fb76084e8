//! Fetch the SPY daily series and upsert it into a SQLite database.

use std::path::PathBuf;

use clap::Parser;
use pricefeed::{COMPANION_CSV_PATH, Config, DATABASE_PATH, SQL_SCRIPT_PATH, SqliteSink};
use pricefeed_cli::{FetchArgs, ingest, init_tracing};

#[derive(Debug, Parser)]
#[command(name = "spy-db", about = "Upsert SPY daily prices into a SQLite database")]
struct Cli {
    /// SQLite database file.
    #[arg(long, default_value = DATABASE_PATH)]
    database: PathBuf,

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
    let sink = SqliteSink::new(cli.database);
    let companions = [PathBuf::from(SQL_SCRIPT_PATH), PathBuf::from(COMPANION_CSV_PATH)];

    ingest(&config, &sink, &companions).await?;
    Ok(())
}
