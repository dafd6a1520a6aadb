//! Best-effort reads of [`Value`] data.
//!
//! A scalar first answers with its own payload when the kind already
//! matches. Otherwise its stringified form is parsed for the requested type,
//! following the order bool, integer, float, double, timestamp, url, binary,
//! number and finally the string itself. A miss is never an error, it is
//! simply `None`.

use crate::{
    storable::{Binary, Retrievable},
    value::{
        data::{Value, NULL_LITERAL},
        scalar::Scalar,
    },
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Number;
use std::borrow::Cow;
use time::{
    format_description::FormatItem, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};
use url::Url;
use uuid::Uuid;

/// Fixed timestamp layout, always UTC: `2010-03-18 19:05:15`.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Formats `value` with [`TIMESTAMP_FORMAT`] after moving it to UTC.
/// Sub-second precision is dropped.
pub fn format_timestamp(value: OffsetDateTime) -> Option<String> {
    value.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT).ok()
}

pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Lenient truth test: skips leading whitespace, then `Y`, `y`, `T`, `t` or a
/// number whose first significant digit is nonzero means `true`.
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim_start();
    match value.chars().next() {
        Some('Y' | 'y' | 'T' | 't') => return true,
        None => return false,
        _ => {}
    }
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits
        .trim_start_matches('0')
        .chars()
        .next()
        .map(|c| ('1'..='9').contains(&c))
        .unwrap_or(false)
}

/// Decimal integer first, then a finite float.
pub fn parse_number(value: &str) -> Option<Number> {
    let value = value.trim();
    if let Ok(v) = value.parse::<i64>() {
        return Some(v.into());
    }
    if let Ok(v) = value.parse::<u64>() {
        return Some(v.into());
    }
    // reject the spelled out forms Rust accepts but JSON has no token for
    if value.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    value.parse::<f64>().ok().and_then(Number::from_f64)
}

pub fn parse_int(value: &str) -> Option<i64> {
    let number = parse_number(value)?;
    if let Some(v) = number.as_i64() {
        return Some(v);
    }
    let v = number.as_f64()?.trunc();
    // 2^63 is not an i64, `as` would saturate
    if (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&v) {
        Some(v as i64)
    } else {
        None
    }
}

pub fn parse_double(value: &str) -> Option<f64> {
    parse_number(value)?.as_f64()
}

impl Value {
    /// Stringified scalar payload, or `None` for anything that cannot be
    /// coerced at all (`Absent`, collections and the null sentinel).
    pub(crate) fn scalar_text(&self) -> Option<Cow<'_, str>> {
        let text = match self {
            Self::Scalar(Scalar::String(v)) => Cow::Borrowed(v.as_str()),
            Self::Scalar(v) => Cow::Owned(v.to_string()),
            _ => return None,
        };
        if text == NULL_LITERAL {
            return None;
        }
        Some(text)
    }

    /// Reads this value as `T`. `Absent` never yields anything.
    pub fn coerce<T>(&self) -> Option<T>
    where
        T: Retrievable,
    {
        if self.is_absent() {
            return None;
        }
        T::from_data(self)
    }

    pub fn as_string(&self) -> Option<String> {
        self.scalar_text().map(Cow::into_owned)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(v)) => Some(*v),
            _ => self.scalar_text().map(|v| parse_bool(&v)),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(v)) => Some(*v),
            _ => self.scalar_text().and_then(|v| parse_int(&v)),
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Scalar(Scalar::UInt(v)) => Some(*v),
            _ => {
                let text = self.scalar_text()?;
                let number = parse_number(&text)?;
                number.as_u64().or_else(|| {
                    let v = number.as_f64()?.trunc();
                    (0.0..18_446_744_073_709_551_616.0)
                        .contains(&v)
                        .then_some(v as u64)
                })
            }
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Scalar(Scalar::Float(v)) => Some(*v),
            _ => self.scalar_text().and_then(|v| parse_double(&v)).map(|v| v as f32),
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Double(v)) => Some(*v),
            _ => self.scalar_text().and_then(|v| parse_double(&v)),
        }
    }

    pub fn as_date(&self) -> Option<OffsetDateTime> {
        self.scalar_text().and_then(|v| parse_timestamp(&v))
    }

    pub fn as_url(&self) -> Option<Url> {
        match self {
            Self::Scalar(Scalar::Url(v)) => Some(v.clone()),
            _ => self.scalar_text().and_then(|v| Url::parse(v.trim()).ok()),
        }
    }

    pub fn as_binary(&self) -> Option<Vec<u8>> {
        match self {
            Self::Scalar(Scalar::Binary(v)) => Some(v.clone()),
            _ => self
                .scalar_text()
                .and_then(|v| STANDARD.decode(v.trim()).ok()),
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Scalar(Scalar::Int(v)) => Some((*v).into()),
            Self::Scalar(Scalar::UInt(v)) => Some((*v).into()),
            Self::Scalar(Scalar::Double(v)) => Number::from_f64(*v),
            _ => self.scalar_text().and_then(|v| parse_number(&v)),
        }
    }

    pub fn as_identifier(&self) -> Option<Uuid> {
        match self {
            Self::Scalar(Scalar::Identifier(v)) => Some(*v),
            _ => self.scalar_text().and_then(|v| Uuid::parse_str(v.trim()).ok()),
        }
    }

    /// Stores `value` as a [`TIMESTAMP_FORMAT`] string scalar.
    pub fn from_timestamp(value: OffsetDateTime) -> Self {
        format_timestamp(value)
            .map(Self::scalar)
            .unwrap_or_default()
    }

    pub fn from_binary(value: impl Into<Vec<u8>>) -> Self {
        Self::Scalar(Scalar::Binary(value.into()))
    }
}

impl From<Binary> for Value {
    fn from(v: Binary) -> Self {
        Self::from_binary(v.0)
    }
}
