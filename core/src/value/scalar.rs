use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};
use url::Url;
use uuid::Uuid;

/// Flat primitive payload wrapped by [`Value::Scalar`](crate::Value::Scalar).
///
/// The payload keeps its native kind, but readers never depend on it: every
/// accessor falls back to the stringified form (see [`Display`]).
#[derive(Debug, Clone)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Url(Url),
    Identifier(Uuid),
}

impl Scalar {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::Url(_) => "url",
            Self::Identifier(_) => "identifier",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

fn write_float(formatter: &mut fmt::Formatter, value: f64) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        write!(formatter, "{:.1}", value)
    } else {
        write!(formatter, "{}", value)
    }
}

impl Display for Scalar {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(formatter, "{}", v),
            Self::Int(v) => write!(formatter, "{}", v),
            Self::UInt(v) => write!(formatter, "{}", v),
            // f32 goes through its own shortest representation, widening first
            // would print 3.05 as 3.049999952316284.
            Self::Float(v) => match v.to_string().parse::<f64>() {
                Ok(v) => write_float(formatter, v),
                Err(_) => write!(formatter, "{}", v),
            },
            Self::Double(v) => write_float(formatter, *v),
            Self::String(v) => formatter.write_str(v),
            Self::Binary(v) => formatter.write_str(&STANDARD.encode(v)),
            Self::Url(v) => formatter.write_str(v.as_str()),
            Self::Identifier(v) => write!(formatter, "{}", v.hyphenated()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::UInt(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f32(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Binary(v) => serializer.serialize_str(&STANDARD.encode(v)),
            Self::Url(v) => serializer.serialize_str(v.as_str()),
            Self::Identifier(v) => serializer.collect_str(&v.hyphenated()),
        }
    }
}

macro_rules! impl_scalar_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Scalar {
            fn from(v: $type) -> Self {
                Self::$variant(v as _)
            }
        }
    };
}

impl_scalar_from!(bool => Bool);
impl_scalar_from!(i8 => Int);
impl_scalar_from!(i16 => Int);
impl_scalar_from!(i32 => Int);
impl_scalar_from!(i64 => Int);
impl_scalar_from!(isize => Int);
impl_scalar_from!(u8 => UInt);
impl_scalar_from!(u16 => UInt);
impl_scalar_from!(u32 => UInt);
impl_scalar_from!(u64 => UInt);
impl_scalar_from!(usize => UInt);
impl_scalar_from!(f32 => Float);
impl_scalar_from!(f64 => Double);

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<char> for Scalar {
    fn from(v: char) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Url> for Scalar {
    fn from(v: Url) -> Self {
        Self::Url(v)
    }
}

impl From<Uuid> for Scalar {
    fn from(v: Uuid) -> Self {
        Self::Identifier(v)
    }
}
