use crate::value::{data::Value, scalar::Scalar};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

#[derive(Debug, Clone)]
pub struct JsonConfig {
    pub style: JsonStyle,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            style: JsonStyle::default_pretty(),
        }
    }
}

impl JsonConfig {
    pub fn compact() -> Self {
        Self {
            style: JsonStyle::Compact,
        }
    }

    pub fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonStyle {
    Compact,
    Pretty { indent: usize },
}

impl JsonStyle {
    pub fn default_pretty() -> Self {
        Self::Pretty { indent: 2 }
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty { .. })
    }
}

impl Value {
    /// Plain JSON tree for handing over to other JSON tooling. `Absent` has
    /// no standalone representation, nested `Absent` becomes `null`.
    pub fn to_native_tree(&self) -> Option<serde_json::Value> {
        if self.is_absent() || !encodable(self) {
            return None;
        }
        match serde_json::to_value(self) {
            Ok(tree) => Some(tree),
            Err(error) => {
                tracing::warn!(%error, "could not convert data to a json tree");
                None
            }
        }
    }

    /// Pretty printed JSON bytes, or `None` for `Absent` and for data holding
    /// NaN or infinite numbers.
    pub fn to_json_bytes(&self) -> Option<Vec<u8>> {
        self.to_json_bytes_with(&JsonConfig::default())
    }

    pub fn to_json_bytes_with(&self, config: &JsonConfig) -> Option<Vec<u8>> {
        if self.is_absent() || !encodable(self) {
            return None;
        }
        let mut result = Vec::with_capacity(256);
        let status = match config.style {
            JsonStyle::Compact => serde_json::to_writer(&mut result, self),
            JsonStyle::Pretty { indent } => {
                let indent = vec![b' '; indent];
                let mut serializer = serde_json::Serializer::with_formatter(
                    &mut result,
                    PrettyFormatter::with_indent(&indent),
                );
                self.serialize(&mut serializer)
            }
        };
        match status {
            Ok(()) => Some(result),
            Err(error) => {
                tracing::warn!(%error, "could not encode data as json");
                None
            }
        }
    }

    /// JSON text for collections. A scalar gives its bare stringified payload
    /// (not quoted, so only usable as a fragment) and `Absent` gives an empty
    /// string.
    pub fn to_json_string(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Scalar(v) => v.to_string(),
            Self::Sequence(_) | Self::Mapping(_) => self
                .to_json_bytes()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_default(),
        }
    }
}

/// JSON has no token for NaN or infinities; serde_json would write `null` and
/// the scalar would come back as `Absent`.
fn encodable(value: &Value) -> bool {
    match value {
        Value::Scalar(v @ (Scalar::Float(_) | Scalar::Double(_))) if !is_finite(v) => {
            tracing::warn!(value = %v, "non-finite number cannot be encoded as json");
            false
        }
        Value::Sequence(v) => v.iter().all(encodable),
        Value::Mapping(v) => v.values().all(encodable),
        _ => true,
    }
}

fn is_finite(value: &Scalar) -> bool {
    match value {
        Scalar::Float(v) => v.is_finite(),
        Scalar::Double(v) => v.is_finite(),
        _ => true,
    }
}
