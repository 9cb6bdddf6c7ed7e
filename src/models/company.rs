use serde_json::Value;
use std::collections::BTreeMap;

/// Company overview as returned by the data provider: a flat map of named
/// scalar fields plus the long business description.
///
/// Fields are kept ordered (BTreeMap) so that downstream assembly is
/// deterministic for identical inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    pub fields: BTreeMap<String, Value>,
    pub description: String,
}

impl CompanyProfile {
    pub fn short_name(&self) -> Option<&str> {
        self.fields.get("shortName").and_then(Value::as_str)
    }

    pub fn previous_close(&self) -> Option<f64> {
        self.fields.get("previousClose").and_then(Value::as_f64)
    }
}
