use crate::models::calendar::CalendarEvent;
use crate::models::company::CompanyProfile;
use crate::models::esg::EsgSummary;
use crate::models::forecast::AnalystForecast;
use crate::models::fundamentals::FinancialTable;
use crate::models::news::NewsItem;
use std::path::PathBuf;

/// Growth ratios for the report, one formatted percentage per horizon.
///
/// All three keys are always present; a ratio that could not be computed is
/// the literal "N/A". Computation is all-or-nothing: if any horizon is
/// unavailable the whole set degrades to "N/A".
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSet {
    pub overall: String,
    pub five_year: String,
    pub three_year: String,
}

impl RatioSet {
    pub fn unavailable() -> Self {
        Self {
            overall: "N/A".to_string(),
            five_year: "N/A".to_string(),
            three_year: "N/A".to_string(),
        }
    }
}

/// Everything fetched and computed for one run, before assembly.
#[derive(Debug, Clone, Default)]
pub struct RawReportData {
    pub profile: CompanyProfile,
    pub financials: FinancialTable,
    pub ratios: Option<RatioSet>,
    pub chart_path: Option<PathBuf>,
    pub esg: EsgSummary,
    pub news: Vec<NewsItem>,
    pub calendar: Vec<CalendarEvent>,
    pub forecasts: AnalystForecast,
}

impl Default for RatioSet {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// The flat field set written into the deck template. Built fresh per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFields {
    pub short_name: String,
    pub description: String,
    /// Profile key -> display value, substituted across every slide.
    pub profile_substitutions: Vec<(String, String)>,
    pub ratios: RatioSet,

    /// Formatted metric cells, most recent period first.
    pub revenue: [String; 3],
    pub ebitda: [String; 3],
    pub ebit: [String; 3],
    pub leverage: [String; 3],
    pub eps: [String; 3],

    pub total_esg: String,
    pub rating_month: String,
    pub rating_year: String,
    pub controversy_level: String,
    pub related_controversies: String,

    /// "YYYY-MM-DD - title" lines, at most nine.
    pub news_lines: Vec<String>,
    /// (event name, formatted date) pairs, at most three.
    pub calendar_entries: Vec<(String, String)>,

    pub consensus_line: String,
    pub recommendation_key: String,
    pub upside_downside: String,

    pub chart_path: Option<PathBuf>,
}
