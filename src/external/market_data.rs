use crate::models::calendar::CalendarEvent;
use crate::models::company::CompanyProfile;
use crate::models::esg::EsgSummary;
use crate::models::forecast::AnalystForecast;
use crate::models::fundamentals::FinancialTable;
use crate::models::news::NewsItem;
use crate::models::price_point::PriceSeries;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no data for ticker {0}")]
    NotFound(String),
}

/// Seam to the market-data provider. Absence of individual fields inside a
/// successful response is tolerated by the consumers, not here; an error from
/// these methods means the request itself failed.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Company info map plus long business description.
    async fn fetch_company_profile(&self, ticker: &str) -> Result<CompanyProfile, MarketDataError>;

    /// Income statement and balance sheet combined, columns `N`, `N-1`, ...
    async fn fetch_financials(&self, ticker: &str) -> Result<FinancialTable, MarketDataError>;

    /// Full daily closing-price history, oldest first.
    async fn fetch_price_history(&self, ticker: &str) -> Result<PriceSeries, MarketDataError>;

    async fn fetch_esg(&self, ticker: &str) -> Result<EsgSummary, MarketDataError>;

    async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsItem>, MarketDataError>;

    async fn fetch_calendar(&self, ticker: &str) -> Result<Vec<CalendarEvent>, MarketDataError>;

    async fn fetch_forecasts(&self, ticker: &str) -> Result<AnalystForecast, MarketDataError>;
}
