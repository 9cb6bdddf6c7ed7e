use crate::config::Config;
use crate::errors::AppError;
use crate::external::market_data::MarketDataProvider;
use crate::models::deck::Deck;
use crate::models::report::RawReportData;
use crate::services::{
    assembly_service, chart_service, export_service, notification_service, ratio_service,
    template_service,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Runs the whole report pipeline for one ticker and returns the PDF path.
///
/// Essential steps (profile, statements, price history, template, export)
/// propagate their errors. ESG, news, calendar and forecast fetches are
/// best-effort and fall back to empty data; the email step is best-effort
/// and its errors are swallowed after logging.
pub async fn run_report(
    cfg: &Config,
    provider: &dyn MarketDataProvider,
    ticker: &str,
) -> Result<PathBuf, AppError> {
    info!(ticker, "1) fetching company profile and financial statements");
    let profile = provider.fetch_company_profile(ticker).await?;
    let financials = provider.fetch_financials(ticker).await?;
    let history = provider.fetch_price_history(ticker).await?;
    info!(
        ticker,
        price_points = history.len(),
        statement_columns = financials.columns().len(),
        "core data fetched"
    );

    info!(ticker, "2) rendering price chart");
    let chart_path = chart_service::render_chart(&history, ticker, cfg.chart_dir());

    info!(ticker, "3) computing growth ratios");
    let ratios = ratio_service::calculate_ratios(&history);
    info!(ticker, ?ratios, "ratios computed");

    info!(ticker, "4) fetching ESG, news, calendar and forecasts");
    let esg = provider.fetch_esg(ticker).await.unwrap_or_else(|e| {
        warn!(ticker, error = %e, "ESG fetch failed, continuing without scores");
        Default::default()
    });
    let news = provider.fetch_news(ticker).await.unwrap_or_else(|e| {
        warn!(ticker, error = %e, "news fetch failed, continuing without news");
        Vec::new()
    });
    let calendar = provider.fetch_calendar(ticker).await.unwrap_or_else(|e| {
        warn!(ticker, error = %e, "calendar fetch failed, continuing without events");
        Vec::new()
    });
    let forecasts = provider.fetch_forecasts(ticker).await.unwrap_or_else(|e| {
        warn!(ticker, error = %e, "forecast fetch failed, continuing without consensus");
        Default::default()
    });

    info!(ticker, "5) assembling report fields");
    let raw = RawReportData {
        profile,
        financials,
        ratios: Some(ratios),
        chart_path,
        esg,
        news,
        calendar,
        forecasts,
    };
    let fields = assembly_service::assemble(&raw);

    info!(ticker, template = %cfg.template_path.display(), "6) filling deck template");
    let mut deck = Deck::load(&cfg.template_path)?;
    template_service::validate_bindings(&deck)?;
    template_service::fill(&mut deck, &fields);

    let deck_path = cfg.deck_path(ticker);
    deck.save(&deck_path)?;
    info!(ticker, path = %deck_path.display(), "filled deck saved");

    info!(ticker, "7) exporting to PDF");
    let pdf_path = cfg.pdf_path(ticker);
    export_service::convert_to_pdf(&cfg.convert_cmd, &deck_path, &pdf_path)?;

    if cfg.open_pdf {
        export_service::open_document(&pdf_path);
    }

    if cfg.send_email {
        info!(ticker, "8) emailing report");
        if let Err(e) = notification_service::send_report(cfg, &pdf_path, ticker) {
            error!(ticker, error = %e, "report email failed, run continues");
        }
    }

    Ok(pdf_path)
}
