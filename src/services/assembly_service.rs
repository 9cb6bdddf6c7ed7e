use crate::models::calendar::CalendarEvent;
use crate::models::esg::EsgSummary;
use crate::models::forecast::AnalystForecast;
use crate::models::news::NewsItem;
use crate::models::report::{RatioSet, RawReportData, ReportFields};
use serde_json::Value;

pub const NA: &str = "N/A";

/// How many news lines the template has room for.
const MAX_NEWS_ITEMS: usize = 9;
/// How many calendar entries the template has room for.
const MAX_CALENDAR_ENTRIES: usize = 3;

/// Periods shown for the revenue row.
const REVENUE_COLUMNS: [&str; 3] = ["N", "N-1", "N-2"];
/// Periods shown for every other metric row.
const TRAILING_COLUMNS: [&str; 3] = ["N-1", "N-2", "N-3"];

/// Shapes everything fetched for one run into the flat field set the template
/// filler writes. Every individual lookup degrades to "N/A" on its own;
/// assembly itself never fails.
pub fn assemble(raw: &RawReportData) -> ReportFields {
    let table = &raw.financials;

    let revenue = REVENUE_COLUMNS.map(|col| format_monetary(table.value("Total Revenue", col)));
    let ebitda = TRAILING_COLUMNS.map(|col| format_monetary(table.value("EBITDA", col)));
    let ebit = TRAILING_COLUMNS.map(|col| format_monetary(table.value("EBIT", col)));
    let leverage = TRAILING_COLUMNS
        .map(|col| format_leverage(table.value("Net Debt", col), table.value("EBITDA", col)));
    let eps = TRAILING_COLUMNS.map(|col| format_eps(table.value("Diluted EPS", col)));

    let previous_close = raw
        .profile
        .previous_close()
        .or_else(|| table.last_row_value("N"));

    ReportFields {
        short_name: raw
            .profile
            .short_name()
            .map(str::to_string)
            .unwrap_or_else(|| NA.to_string()),
        description: raw.profile.description.clone(),
        profile_substitutions: raw
            .profile
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect(),
        ratios: raw.ratios.clone().unwrap_or_else(RatioSet::unavailable),

        revenue,
        ebitda,
        ebit,
        leverage,
        eps,

        total_esg: format_esg_field(&raw.esg, "totalEsg"),
        rating_month: format_esg_field(&raw.esg, "ratingMonth"),
        rating_year: format_esg_field(&raw.esg, "ratingYear"),
        controversy_level: format_esg_field(&raw.esg, "highestControversy"),
        related_controversies: format_esg_field(&raw.esg, "relatedControversy"),

        news_lines: format_news(&raw.news),
        calendar_entries: format_calendar(&raw.calendar),

        consensus_line: format_consensus(&raw.forecasts),
        recommendation_key: raw
            .forecasts
            .recommendation_key
            .clone()
            .unwrap_or_else(|| NA.to_string()),
        upside_downside: format_upside(previous_close, raw.forecasts.target_mean_price),

        chart_path: raw.chart_path.clone(),
    }
}

/// Monetary cells are reported in thousands: divide by 1000, truncate toward
/// zero, group with thousands separators.
pub fn format_monetary(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands((v / 1000.0).trunc() as i64),
        None => NA.to_string(),
    }
}

/// Net Debt / EBITDA with a trailing "x". Both operands must be present and
/// EBITDA nonzero; a zero divisor reads as "N/A", not a panic or infinity.
pub fn format_leverage(net_debt: Option<f64>, ebitda: Option<f64>) -> String {
    match (net_debt, ebitda) {
        (Some(debt), Some(ebitda)) if ebitda != 0.0 => {
            format!("{}x", float_display(round2(debt / ebitda)))
        }
        _ => NA.to_string(),
    }
}

pub fn format_eps(value: Option<f64>) -> String {
    match value {
        Some(v) => float_display(round2(v)),
        None => NA.to_string(),
    }
}

/// One ESG field by provider key. Lists join with " / ", except the related
/// controversies which are one per line; scalars stringify; anything missing
/// is "N/A".
pub fn format_esg_field(esg: &EsgSummary, key: &str) -> String {
    let Some(value) = esg.field(key) else {
        return NA.to_string();
    };
    match value {
        Value::Array(items) => {
            let sep = if key == "relatedControversy" { "\n" } else { " / " };
            items.iter().map(display_value).collect::<Vec<_>>().join(sep)
        }
        other => display_value(other),
    }
}

/// At most nine news lines, provider order preserved. Items without a
/// publish time render as the bare title.
pub fn format_news(items: &[NewsItem]) -> Vec<String> {
    items
        .iter()
        .take(MAX_NEWS_ITEMS)
        .map(|item| match item.published_at {
            Some(ts) => format!("{} - {}", ts.format("%Y-%m-%d"), item.title),
            None => item.title.clone(),
        })
        .collect()
}

/// At most three (event name, date) pairs, provider order preserved. Events
/// with a date window display the first date.
pub fn format_calendar(events: &[CalendarEvent]) -> Vec<(String, String)> {
    events
        .iter()
        .take(MAX_CALENDAR_ENTRIES)
        .map(|event| {
            let date = event
                .first_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NA.to_string());
            (event.name.clone(), date)
        })
        .collect()
}

pub fn format_consensus(forecasts: &AnalystForecast) -> String {
    let figure = |v: Option<f64>| v.map(float_display).unwrap_or_else(|| NA.to_string());
    format!(
        "low {}, mean {}, high {}",
        figure(forecasts.target_low_price),
        figure(forecasts.target_mean_price),
        figure(forecasts.target_high_price),
    )
}

/// Percentage gap between the analyst mean target and the previous close,
/// rounded to two decimals.
pub fn format_upside(previous_close: Option<f64>, target_mean_price: Option<f64>) -> String {
    match (previous_close, target_mean_price) {
        (Some(close), Some(target)) if close != 0.0 => {
            format!("{}%", float_display(round2((target / close - 1.0) * 100.0)))
        }
        _ => NA.to_string(),
    }
}

/// Renders an already-rounded float the way the report displays numbers:
/// up to two decimals, one trailing zero trimmed ("2.50" -> "2.5",
/// "20.00" -> "20.0").
pub fn float_display(value: f64) -> String {
    let mut s = format!("{value:.2}");
    if s.ends_with('0') {
        s.pop();
    }
    s
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => float_display(n.as_f64().unwrap_or_default()),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => NA.to_string(),
        other => other.to_string(),
    }
}
