//! Tagged value descriptions.

use crate::{ConstructionError, ConstructionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A `{type, value}` pair describing a value to construct.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypedValue {
    /// Construction tag: a built-in name or a qualified record name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// The raw decoded value.
    #[serde(default)]
    pub value: Json,
}

impl TypedValue {
    pub fn new(type_name: impl Into<String>, value: impl Into<Json>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::new("string", value)
    }

    pub fn int(value: i64) -> Self {
        Self::new("int", value)
    }

    /// The root context.
    pub fn background() -> Self {
        Self::new("context", "background")
    }

    /// Read a nested `{type, value}` entry out of a raw document value.
    pub fn from_entry(entry: &Json) -> ConstructionResult<Self> {
        let map = entry.as_object().ok_or_else(|| {
            ConstructionError::malformed_entry("expected a map with 'type' and 'value'")
        })?;
        let type_name = map
            .get("type")
            .ok_or_else(|| ConstructionError::malformed_entry("expected 'type' in map"))?
            .as_str()
            .ok_or_else(|| ConstructionError::malformed_entry("'type' in map must be a string"))?;
        let value = map
            .get("value")
            .ok_or_else(|| ConstructionError::malformed_entry("expected 'value' in map"))?;
        Ok(Self::new(type_name, value.clone()))
    }
}

/// Name of the JSON kind of a raw value, for error messages.
pub(crate) fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "map",
    }
}
