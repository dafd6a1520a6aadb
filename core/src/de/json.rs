use crate::{error::*, value::data::Value};
use serde::Deserialize;

impl Value {
    /// Parses JSON text. Top-level fragments such as `"text"` or `5` are
    /// accepted; `null` gives `Absent`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::parsing)
    }

    pub fn from_json_bytes(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(Error::parsing)
    }

    pub fn from_native_tree(tree: serde_json::Value) -> Result<Self> {
        Self::deserialize(tree).map_err(Error::parsing)
    }

    /// Like [`Value::from_json_str`] but any failure gives `Absent`.
    pub fn safe_from_json_str(json: &str) -> Self {
        Self::from_json_str(json).unwrap_or_else(absorb)
    }

    pub fn safe_from_json_bytes(json: &[u8]) -> Self {
        Self::from_json_bytes(json).unwrap_or_else(absorb)
    }

    pub fn safe_from_native_tree(tree: serde_json::Value) -> Self {
        Self::from_native_tree(tree).unwrap_or_else(absorb)
    }
}

pub(crate) fn absorb(error: Error) -> Value {
    tracing::debug!(%error, "discarding data that failed to parse");
    Value::Absent
}
