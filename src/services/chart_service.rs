use crate::models::price_point::PriceSeries;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CHART_WIDTH: u32 = 1280;
const CHART_HEIGHT: u32 = 480;

/// Renders the closing-price history to `"{label}_chart.png"` inside
/// `out_dir` and returns the path. The chart is optional for the report:
/// any failure is logged and swallowed, and callers skip image insertion
/// when `None` comes back.
pub fn render_chart(series: &PriceSeries, label: &str, out_dir: &Path) -> Option<PathBuf> {
    if series.len() < 2 {
        warn!(label, points = series.len(), "not enough price points to chart");
        return None;
    }

    let path = out_dir.join(format!("{label}_chart.png"));
    match draw(series, label, &path) {
        Ok(()) => {
            info!(label, path = %path.display(), "chart rendered");
            Some(path)
        }
        Err(e) => {
            warn!(label, error = %e, "chart rendering failed, continuing without image");
            None
        }
    }
}

fn draw(series: &PriceSeries, label: &str, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let points = series.points();
    let first_date = points.first().ok_or("empty price series")?.date;
    let last_date = points.last().ok_or("empty price series")?.date;

    let (mut low, mut high) = (f64::MAX, f64::MIN);
    for p in points {
        low = low.min(p.close);
        high = high.max(p.close);
    }
    let padding = ((high - low) * 0.05).max(1e-6);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{label} Stock Price (Maximum Historical Data)"),
            ("sans-serif", 28),
        )
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(first_date..last_date, (low - padding)..(high + padding))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .label_style(("sans-serif", 16))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.date, p.close)),
            &BLUE,
        ))?
        .label(format!("{label} Stock Price"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
