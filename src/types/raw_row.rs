use serde_json::{Map, Value};

/// An hourly row as it came out of extraction, before any type coercion.
///
/// `fields` holds whatever keys the source produced for that hour
/// (`time`, `temperature_2m`, ...). Nothing about their presence or their
/// JSON types is guaranteed.
#[derive(Debug, PartialEq, Clone)]
pub struct RawRow {
    pub city: String,
    pub fields: Map<String, Value>,
}

impl RawRow {
    pub fn new(city: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            city: city.into(),
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
