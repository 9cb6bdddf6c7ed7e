use crate::external::market_data::{MarketDataError, MarketDataProvider};
use crate::models::calendar::CalendarEvent;
use crate::models::company::CompanyProfile;
use crate::models::esg::EsgSummary;
use crate::models::forecast::AnalystForecast;
use crate::models::fundamentals::FinancialTable;
use crate::models::news::NewsItem;
use crate::models::price_point::{PricePoint, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const TIMESERIES_URL: &str =
    "https://query1.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";

/// Earliest period accepted by the fundamentals-timeseries endpoint.
const EARLIEST_FUNDAMENTALS_TS: i64 = 493_590_046;

/// Annual statement lines requested from the timeseries endpoint, in the row
/// order of the combined table (income-statement rows first, balance-sheet
/// rows last).
const STATEMENT_LINES: &[(&str, &str)] = &[
    ("annualTotalRevenue", "Total Revenue"),
    ("annualEBITDA", "EBITDA"),
    ("annualEBIT", "EBIT"),
    ("annualDilutedEPS", "Diluted EPS"),
    ("annualNetDebt", "Net Debt"),
];

/// Yahoo Finance market-data provider. No API key required.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; Tickerdeck/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, MarketDataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::BadResponse(format!("HTTP {}", resp.status())));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))
    }

    /// Fetches one or more quoteSummary modules and returns the single result
    /// object they live in.
    async fn quote_summary(&self, ticker: &str, modules: &str) -> Result<Value, MarketDataError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{ticker}?modules={modules}");
        let body = self.get_json(&url).await?;

        body.get("quoteSummary")
            .and_then(|q| q.get("result"))
            .and_then(|r| r.get(0))
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs for the chart endpoint (only what we need).
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
struct SearchNewsItem {
    title: String,
    #[serde(rename = "providerPublishTime")]
    provider_publish_time: Option<i64>,
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_company_profile(&self, ticker: &str) -> Result<CompanyProfile, MarketDataError> {
        let result = self
            .quote_summary(ticker, "assetProfile,price,summaryDetail")
            .await?;

        let mut fields = BTreeMap::new();
        for module in ["price", "summaryDetail", "assetProfile"] {
            if let Some(obj) = result.get(module) {
                flatten_module(&mut fields, obj);
            }
        }

        let description = fields
            .remove("longBusinessSummary")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        // Same shaping as the report expects: dividend yield only when
        // numeric, market cap in millions, beta to 2 decimals.
        if fields.get("dividendYield").and_then(Value::as_f64).is_none() {
            fields.insert("dividendYield".to_string(), Value::from("NA"));
        }
        if let Some(cap) = fields.get("marketCap").and_then(Value::as_f64) {
            fields.insert("marketCap".to_string(), Value::from((cap / 1_000_000.0).round() as i64));
        }
        if let Some(beta) = fields.get("beta").and_then(Value::as_f64) {
            fields.insert("beta".to_string(), Value::from((beta * 100.0).round() / 100.0));
        }

        Ok(CompanyProfile { fields, description })
    }

    async fn fetch_financials(&self, ticker: &str) -> Result<FinancialTable, MarketDataError> {
        let types: Vec<&str> = STATEMENT_LINES.iter().map(|(t, _)| *t).collect();
        let url = format!(
            "{TIMESERIES_URL}/{ticker}?type={}&period1={}&period2={}",
            types.join(","),
            EARLIEST_FUNDAMENTALS_TS,
            Utc::now().timestamp(),
        );
        let body = self.get_json(&url).await?;

        let results = body
            .get("timeseries")
            .and_then(|t| t.get("result"))
            .and_then(Value::as_array)
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;

        // One date-indexed map per requested line.
        let mut by_line: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
        let mut dates: BTreeSet<String> = BTreeSet::new();

        for series in results {
            for (type_name, _) in STATEMENT_LINES {
                let Some(entries) = series.get(type_name).and_then(Value::as_array) else {
                    continue;
                };
                let line = by_line.entry(*type_name).or_default();
                for entry in entries {
                    let (Some(date), Some(value)) = (
                        entry.get("asOfDate").and_then(Value::as_str),
                        entry.get("reportedValue").and_then(raw_f64),
                    ) else {
                        continue;
                    };
                    dates.insert(date.to_string());
                    line.insert(date.to_string(), value);
                }
            }
        }

        // Most recent period becomes column N.
        let ordered_dates: Vec<&String> = dates.iter().rev().collect();
        let mut table = FinancialTable::new(ordered_dates.len());
        for (type_name, row_name) in STATEMENT_LINES {
            let line = by_line.get(type_name);
            let values = ordered_dates
                .iter()
                .map(|d| line.and_then(|l| l.get(*d)).copied())
                .collect();
            table.push_row(*row_name, values);
        }

        Ok(table)
    }

    async fn fetch_price_history(&self, ticker: &str) -> Result<PriceSeries, MarketDataError> {
        let url = format!("{CHART_URL}/{ticker}?range=max&interval=1d");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .json::<ChartResponse>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .quote
            .first()
            .ok_or_else(|| MarketDataError::BadResponse("missing quote".into()))?
            .close
            .clone();

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            // skip days without a close
            let Some(close) = closes.get(i).copied().flatten() else {
                continue;
            };
            let date = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| MarketDataError::Parse("bad timestamp".into()))?
                .date_naive();
            points.push(PricePoint { date, close });
        }

        Ok(PriceSeries::new(points))
    }

    async fn fetch_esg(&self, ticker: &str) -> Result<EsgSummary, MarketDataError> {
        let result = self.quote_summary(ticker, "esgScores").await?;
        let scores = result
            .get("esgScores")
            .and_then(Value::as_object)
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;

        let mut fields = BTreeMap::new();
        for (key, value) in scores {
            fields.insert(key.clone(), unwrap_raw(value));
        }
        Ok(EsgSummary { fields })
    }

    async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsItem>, MarketDataError> {
        let url = format!("{SEARCH_URL}?q={ticker}&newsCount=20&quotesCount=0");
        let body = self.get_json(&url).await?;
        let parsed: SearchResponse = serde_json::from_value(body)
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        Ok(parsed
            .news
            .into_iter()
            .map(|item| NewsItem {
                title: item.title,
                published_at: item
                    .provider_publish_time
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            })
            .collect())
    }

    async fn fetch_calendar(&self, ticker: &str) -> Result<Vec<CalendarEvent>, MarketDataError> {
        let result = self.quote_summary(ticker, "calendarEvents").await?;
        let mut events = Vec::new();

        if let Some(raw_dates) = result
            .pointer("/calendarEvents/earnings/earningsDate")
            .and_then(Value::as_array)
        {
            let dates: Vec<NaiveDate> = raw_dates.iter().filter_map(timestamp_date).collect();
            if !dates.is_empty() {
                events.push(CalendarEvent { name: "Earnings Date".to_string(), dates });
            }
        }
        for (field, name) in [
            ("exDividendDate", "Ex-Dividend Date"),
            ("dividendDate", "Dividend Date"),
        ] {
            if let Some(date) = result
                .pointer(&format!("/calendarEvents/{field}"))
                .and_then(timestamp_date)
            {
                events.push(CalendarEvent { name: name.to_string(), dates: vec![date] });
            }
        }

        Ok(events)
    }

    async fn fetch_forecasts(&self, ticker: &str) -> Result<AnalystForecast, MarketDataError> {
        let result = self.quote_summary(ticker, "financialData").await?;
        let data = result
            .get("financialData")
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;

        Ok(AnalystForecast {
            target_mean_price: data.get("targetMeanPrice").and_then(raw_f64),
            target_low_price: data.get("targetLowPrice").and_then(raw_f64),
            target_high_price: data.get("targetHighPrice").and_then(raw_f64),
            recommendation_mean: data.get("recommendationMean").and_then(raw_f64),
            recommendation_key: data
                .get("recommendationKey")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; plain numbers also
/// occur. Reads either.
fn raw_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.get("raw").and_then(Value::as_f64))
}

/// Replaces `{raw, fmt}` wrappers with their raw value, leaving scalars and
/// arrays untouched.
fn unwrap_raw(value: &Value) -> Value {
    match value.get("raw") {
        Some(raw) => raw.clone(),
        None => value.clone(),
    }
}

fn timestamp_date(value: &Value) -> Option<NaiveDate> {
    let ts = raw_f64(value)? as i64;
    Some(DateTime::from_timestamp(ts, 0)?.date_naive())
}

/// Copies the scalar fields of one quoteSummary module into the profile map,
/// unwrapping `{raw, fmt}` numbers. Nested objects and arrays are not profile
/// fields and are skipped.
fn flatten_module(fields: &mut BTreeMap<String, Value>, module: &Value) {
    let Some(obj) = module.as_object() else { return };
    for (key, value) in obj {
        let flattened = match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => value.clone(),
            Value::Object(_) => match value.get("raw") {
                Some(raw) if raw.is_number() => raw.clone(),
                _ => continue,
            },
            _ => continue,
        };
        fields.insert(key.clone(), flattened);
    }
}
