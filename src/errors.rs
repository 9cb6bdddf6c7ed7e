use crate::external::market_data::MarketDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Mail error: {0}")]
    Mail(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
