#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Column default exactly as the introspector reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum RawDefault {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawDefault {
    /// Textual form, only for string defaults.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawDefault::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for RawDefault {
    fn from(value: &str) -> Self {
        RawDefault::Text(value.to_string())
    }
}

impl From<i64> for RawDefault {
    fn from(value: i64) -> Self {
        RawDefault::Integer(value)
    }
}
