use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One daily closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronological daily price history for one ticker.
///
/// Invariant: dates are strictly increasing, no duplicates. The constructor
/// enforces this by dropping any point that does not advance the date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resamples to one point per calendar year, keeping the last observation
    /// of each year. The final year may be partial; callers that need complete
    /// years are expected to skip it themselves.
    pub fn annual_closes(&self) -> Vec<PricePoint> {
        let mut annual: Vec<PricePoint> = Vec::new();
        for point in &self.points {
            match annual.last_mut() {
                Some(last) if last.date.year() == point.date.year() => *last = *point,
                _ => annual.push(*point),
            }
        }
        annual
    }
}
