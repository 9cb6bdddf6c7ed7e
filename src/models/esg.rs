use serde_json::Value;
use std::collections::BTreeMap;

/// ESG scores and controversy data, kept as the provider's raw field map.
/// Formatting (list joins, "N/A" fallbacks) happens at assembly time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EsgSummary {
    pub fields: BTreeMap<String, Value>,
}

impl EsgSummary {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
