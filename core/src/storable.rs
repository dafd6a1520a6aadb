use crate::{
    error::*,
    value::data::{Mapping, Value},
};
use indexmap::IndexMap;
use std::{
    any::type_name,
    collections::{BTreeMap, HashMap},
};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

/// Anything that can describe itself as [`Value`] data.
///
/// Flat primitives become scalars; composite types build a mapping or
/// sequence from their parts, so nested types serialize without `Value`
/// knowing their shape.
pub trait Storable {
    fn get_data(&self) -> Value;

    fn serialized_string(&self) -> String {
        self.get_data().to_json_string()
    }

    fn serialized_data(&self) -> Option<Vec<u8>> {
        self.get_data().to_json_bytes()
    }
}

/// Anything that can try to rebuild itself from [`Value`] data.
pub trait Retrievable: Sized {
    fn from_data(data: &Value) -> Option<Self>;

    fn try_from_data(data: &Value) -> Result<Self> {
        Self::from_data(data)
            .ok_or_else(|| Error::FailedToInitializeObject(type_name::<Self>().to_owned()))
    }

    fn from_serialized_string(json: &str) -> Option<Self> {
        Self::from_data(&Value::from_json_str(json).ok()?)
    }

    fn from_serialized_data(json: &[u8]) -> Option<Self> {
        Self::from_data(&Value::from_json_bytes(json).ok()?)
    }
}

/// Raw bytes stored as a base64 scalar rather than a sequence of numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Binary(pub Vec<u8>);

impl From<Vec<u8>> for Binary {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl Value {
    /// Builds data from anything storable. A `Value` comes back unchanged.
    pub fn from_native<T>(value: &T) -> Self
    where
        T: Storable + ?Sized,
    {
        value.get_data()
    }
}

impl Storable for Value {
    fn get_data(&self) -> Value {
        self.clone()
    }
}

impl Retrievable for Value {
    fn from_data(data: &Value) -> Option<Self> {
        Some(data.clone())
    }
}

macro_rules! impl_storable_scalar {
    ($( $type:ty ),*) => {
        $(
            impl Storable for $type {
                fn get_data(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )*
    };
}

impl_storable_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String, Url, Uuid,
    OffsetDateTime, Binary
);

impl Storable for str {
    fn get_data(&self) -> Value {
        Value::from(self)
    }
}

impl Storable for () {
    fn get_data(&self) -> Value {
        Value::Absent
    }
}

macro_rules! impl_retrievable_signed {
    ($( $type:ty ),*) => {
        $(
            impl Retrievable for $type {
                fn from_data(data: &Value) -> Option<Self> {
                    data.as_int().and_then(|v| v.try_into().ok())
                }
            }
        )*
    };
}

macro_rules! impl_retrievable_unsigned {
    ($( $type:ty ),*) => {
        $(
            impl Retrievable for $type {
                fn from_data(data: &Value) -> Option<Self> {
                    data.as_uint().and_then(|v| v.try_into().ok())
                }
            }
        )*
    };
}

impl_retrievable_signed!(i8, i16, i32, i64, isize);
impl_retrievable_unsigned!(u8, u16, u32, u64, usize);

macro_rules! impl_retrievable_with {
    ($type:ty, $method:ident) => {
        impl Retrievable for $type {
            fn from_data(data: &Value) -> Option<Self> {
                data.$method()
            }
        }
    };
}

impl_retrievable_with!(bool, as_bool);
impl_retrievable_with!(f32, as_float);
impl_retrievable_with!(f64, as_double);
impl_retrievable_with!(String, as_string);
impl_retrievable_with!(Url, as_url);
impl_retrievable_with!(Uuid, as_identifier);
impl_retrievable_with!(OffsetDateTime, as_date);

impl Retrievable for Binary {
    fn from_data(data: &Value) -> Option<Self> {
        data.as_binary().map(Self)
    }
}

impl Retrievable for char {
    fn from_data(data: &Value) -> Option<Self> {
        let text = data.as_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl<T> Storable for &T
where
    T: Storable + ?Sized,
{
    fn get_data(&self) -> Value {
        (**self).get_data()
    }
}

impl<T> Storable for Box<T>
where
    T: Storable + ?Sized,
{
    fn get_data(&self) -> Value {
        (**self).get_data()
    }
}

impl<T> Retrievable for Box<T>
where
    T: Retrievable,
{
    fn from_data(data: &Value) -> Option<Self> {
        T::from_data(data).map(Box::new)
    }
}

/// `None` is `Absent`. Inside a collection that leaves an explicit empty
/// slot, so arrays and objects keep their shape.
impl<T> Storable for Option<T>
where
    T: Storable,
{
    fn get_data(&self) -> Value {
        self.as_ref().map(Storable::get_data).unwrap_or_default()
    }
}

impl<T> Retrievable for Option<T>
where
    T: Retrievable,
{
    fn from_data(data: &Value) -> Option<Self> {
        if data.is_absent() {
            return Some(None);
        }
        T::from_data(data).map(Some)
    }
}

impl<T> Storable for [T]
where
    T: Storable,
{
    fn get_data(&self) -> Value {
        Value::Sequence(self.iter().map(Storable::get_data).collect())
    }
}

impl<T> Storable for Vec<T>
where
    T: Storable,
{
    fn get_data(&self) -> Value {
        self.as_slice().get_data()
    }
}

impl<T, const N: usize> Storable for [T; N]
where
    T: Storable,
{
    fn get_data(&self) -> Value {
        self.as_slice().get_data()
    }
}

impl<T> Retrievable for Vec<T>
where
    T: Retrievable,
{
    fn from_data(data: &Value) -> Option<Self> {
        data.as_sequence()?.iter().map(T::from_data).collect()
    }
}

fn mapping_from<'a, T, I>(entries: I) -> Value
where
    T: Storable + 'a,
    I: Iterator<Item = (&'a String, &'a T)>,
{
    Value::Mapping(
        entries
            .map(|(k, v)| (k.to_owned(), v.get_data()))
            .collect::<Mapping>(),
    )
}

macro_rules! impl_map {
    ($( $map:ident ),*) => {
        $(
            impl<T> Storable for $map<String, T>
            where
                T: Storable,
            {
                fn get_data(&self) -> Value {
                    mapping_from(self.iter())
                }
            }

            impl<T> Retrievable for $map<String, T>
            where
                T: Retrievable,
            {
                fn from_data(data: &Value) -> Option<Self> {
                    data.as_mapping()?
                        .iter()
                        .map(|(k, v)| T::from_data(v).map(|v| (k.to_owned(), v)))
                        .collect()
                }
            }
        )*
    };
}

impl_map!(HashMap, BTreeMap, IndexMap);
