use chrono::{DateTime, Utc};

/// A single news article for a ticker, in provider-returned order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    /// Publish time, when the provider supplied one.
    pub published_at: Option<DateTime<Utc>>,
}
