/// Analyst consensus figures. Every field is optional; the assembler renders
/// missing figures as "N/A".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalystForecast {
    pub target_mean_price: Option<f64>,
    pub target_low_price: Option<f64>,
    pub target_high_price: Option<f64>,
    pub recommendation_mean: Option<f64>,
    pub recommendation_key: Option<String>,
}
