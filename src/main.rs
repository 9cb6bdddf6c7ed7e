use anyhow::Result;
use clap::Parser;
use tickerdeck::config::Config;
use tickerdeck::external::yahoo::YahooProvider;
use tickerdeck::logging;
use tickerdeck::services::report_service;

/// Builds a one-ticker equity report deck: market data in, filled slide deck
/// and PDF out, optionally opened and emailed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ticker symbol to report on (Yahoo Finance notation, e.g. MC.PA).
    ticker: String,

    /// Skip opening the PDF viewer, regardless of configuration.
    #[arg(long)]
    no_open: bool,

    /// Skip the email step, regardless of configuration.
    #[arg(long)]
    no_email: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let ticker = cli.ticker.trim().to_uppercase();

    let mut cfg = Config::from_env();
    if cli.no_open {
        cfg.open_pdf = false;
    }
    if cli.no_email {
        cfg.send_email = false;
    }
    cfg.validate().map_err(anyhow::Error::msg)?;

    let provider = YahooProvider::new();
    let pdf_path = report_service::run_report(&cfg, &provider, &ticker).await?;
    tracing::info!(ticker = %ticker, path = %pdf_path.display(), "report run finished");

    Ok(())
}
