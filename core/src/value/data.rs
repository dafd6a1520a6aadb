use crate::{de::data::ValueVisitor, value::scalar::Scalar};
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Display},
};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

/// String-keyed collection backing [`Value::Mapping`]. Keeps insertion order.
pub type Mapping = IndexMap<String, Value>;

/// Text used for "no value", both when describing data and as the scalar
/// sentinel that coercion reads back as "no value".
pub const NULL_LITERAL: &str = "null";

/// Self-describing JSON-compatible data.
///
/// ```
/// use serializable_data::Value;
///
/// let data = Value::mapping().with("something", 3.05);
/// assert_eq!(data["something"].as_string().as_deref(), Some("3.05"));
/// assert_eq!(data["something"].as_double(), Some(3.05));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Absent,
    Scalar(Scalar),
    Sequence(Vec<Self>),
    Mapping(Mapping),
}

impl Value {
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    pub fn sequence() -> Self {
        Self::Sequence(vec![])
    }

    pub fn scalar<T>(value: T) -> Self
    where
        T: Into<Scalar>,
    {
        Self::Scalar(value.into())
    }

    /// Chained insert for building mappings. `Absent` becomes a mapping
    /// first; on any other kind the entry is dropped and the mismatch logged.
    pub fn with<K, T>(mut self, key: K, value: T) -> Self
    where
        K: Into<String>,
        T: Into<Self>,
    {
        if let Err(error) = self.set(key, value) {
            tracing::debug!(%error, "dropped entry while building mapping");
        }
        self
    }

    /// Chained push for building sequences, `Absent` becomes a sequence
    /// first.
    pub fn item<T>(mut self, value: T) -> Self
    where
        T: Into<Self>,
    {
        match self.sequence_mut() {
            Ok(list) => list.push(value.into()),
            Err(error) => tracing::debug!(%error, "dropped item while building sequence"),
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Scalar(v) => v.kind(),
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(v) => Some(v),
            _ => None,
        }
    }

    /// Number of entries in a collection, zero for scalars and `Absent`.
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(v) => v.len(),
            Self::Mapping(v) => v.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            // type is deliberately ignored, `5` equals `"5"`
            (Self::Scalar(a), Self::Scalar(b)) => a.to_string() == b.to_string(),
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Absent => formatter.write_str(NULL_LITERAL),
            Self::Scalar(v) => v.fmt(formatter),
            Self::Sequence(v) => {
                formatter.write_str("[")?;
                for (index, item) in v.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(",")?;
                    }
                    item.fmt(formatter)?;
                }
                formatter.write_str("]")
            }
            Self::Mapping(v) => {
                formatter.write_str("[")?;
                for (index, (key, item)) in v.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(",")?;
                    }
                    write!(formatter, "{}=", key)?;
                    item.fmt(formatter)?;
                }
                formatter.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($( $type:ty ),*) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::Scalar(v.into())
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String, &str, Url,
    Uuid, Scalar
);

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Scalar(v.as_str().into())
    }
}

impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Self::from_timestamp(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Value>,
{
    fn from(v: [T; N]) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T> From<IndexMap<String, T>> for Value
where
    T: Into<Value>,
{
    fn from(v: IndexMap<String, T>) -> Self {
        Self::Mapping(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T> From<HashMap<String, T>> for Value
where
    T: Into<Value>,
{
    fn from(v: HashMap<String, T>) -> Self {
        Self::Mapping(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T> From<BTreeMap<String, T>> for Value
where
    T: Into<Value>,
{
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Mapping(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}

impl<K> FromIterator<(K, Value)> for Value
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_unit(),
            Self::Scalar(v) => v.serialize(serializer),
            Self::Sequence(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(v) => {
                let mut map = serializer.serialize_map(Some(v.len()))?;
                for (k, v) in v {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
