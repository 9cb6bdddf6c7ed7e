use crate::models::price_point::PriceSeries;
use crate::models::report::RatioSet;
use tracing::warn;

/// Compound annual growth rate over `years`, as a percentage rounded to two
/// decimals.
///
/// The series is resampled to annual closes. The most recent annual point is
/// a possibly-incomplete year and is intentionally skipped: the end point is
/// the second-to-last annual close, and the start point lies `years` before
/// it. `None` when the history is too short or either price is non-positive.
pub fn calculate_cagr(series: &PriceSeries, years: usize) -> Option<f64> {
    if years < 1 {
        return None;
    }

    let annual = series.annual_closes();
    let n = annual.len();
    if n < years + 1 {
        return None;
    }

    let start = annual.get(n.checked_sub(years + 2)?)?.close;
    let end = annual[n - 2].close;
    if start <= 0.0 || end <= 0.0 {
        return None;
    }

    let cagr = (end / start).powf(1.0 / years as f64) - 1.0;
    Some(round2(cagr * 100.0))
}

/// The three growth ratios of the report: full-history, 5-year and 3-year
/// CAGR. All-or-nothing: if any horizon cannot be computed the whole set is
/// "N/A", so partial results never mix.
pub fn calculate_ratios(series: &PriceSeries) -> RatioSet {
    let annual_points = series.annual_closes().len();
    let Some(years_data) = annual_points.checked_sub(2).filter(|y| *y >= 1) else {
        warn!(annual_points, "not enough annual closes to compute growth ratios");
        return RatioSet::unavailable();
    };

    let overall = calculate_cagr(series, years_data);
    let five_y = calculate_cagr(series, 4);
    let three_y = calculate_cagr(series, 2);

    match (overall, five_y, three_y) {
        (Some(overall), Some(five_y), Some(three_y)) => RatioSet {
            overall: format_pct(overall),
            five_year: format_pct(five_y),
            three_year: format_pct(three_y),
        },
        _ => {
            warn!(
                annual_points,
                "growth ratio computation incomplete, reporting N/A"
            );
            RatioSet::unavailable()
        }
    }
}

fn format_pct(value: f64) -> String {
    format!("{value:.2}%")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
