use crate::{
    error::*,
    value::{
        data::{Mapping, Value},
        scalar::Scalar,
    },
};
use serde::{
    de::{
        DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor,
    },
    forward_to_deserialize_any, Deserialize,
};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DeserializeMode {
    /// Scalars are handed over with their stored kind only.
    Exact,
    /// Type hints from the target coerce scalars, so `"5"` fills an `i32`.
    #[default]
    Interpret,
}

pub fn from_data<'a, T>(value: &'a Value) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_data(value, Default::default()))
}

pub fn from_data_as<'a, T>(value: &'a Value, mode: DeserializeMode) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_data(value, mode))
}

#[derive(Debug)]
pub struct Deserializer<'de> {
    input: &'de Value,
    mode: DeserializeMode,
}

impl<'de> Deserializer<'de> {
    pub fn from_data(input: &'de Value, mode: DeserializeMode) -> Self {
        Self { input, mode }
    }

    fn interprets(&self) -> bool {
        self.mode == DeserializeMode::Interpret && self.input.is_scalar()
    }
}

macro_rules! impl_deserialize_coerced {
    ($method:ident, $read:ident, $visit:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            if self.interprets() {
                if let Some(v) = self.input.$read() {
                    return visitor.$visit(v);
                }
            }
            self.deserialize_any(visitor)
        }
    };
}

impl<'de> serde::de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::Absent => visitor.visit_unit(),
            Value::Scalar(v) => match v {
                Scalar::Bool(v) => visitor.visit_bool(*v),
                Scalar::Int(v) => visitor.visit_i64(*v),
                Scalar::UInt(v) => visitor.visit_u64(*v),
                Scalar::Float(v) => visitor.visit_f32(*v),
                Scalar::Double(v) => visitor.visit_f64(*v),
                Scalar::String(v) => visitor.visit_borrowed_str(v),
                Scalar::Binary(v) => visitor.visit_borrowed_bytes(v),
                Scalar::Url(v) => visitor.visit_borrowed_str(v.as_str()),
                Scalar::Identifier(v) => visitor.visit_string(v.hyphenated().to_string()),
            },
            Value::Sequence(v) => visitor.visit_seq(SeqDeserializer {
                values: v.as_slice(),
                index: 0,
                mode: self.mode,
            }),
            Value::Mapping(v) => visitor.visit_map(MapDeserializer {
                values: v,
                index: 0,
                mode: self.mode,
            }),
        }
    }

    impl_deserialize_coerced!(deserialize_bool, as_bool, visit_bool);
    impl_deserialize_coerced!(deserialize_i8, as_int, visit_i64);
    impl_deserialize_coerced!(deserialize_i16, as_int, visit_i64);
    impl_deserialize_coerced!(deserialize_i32, as_int, visit_i64);
    impl_deserialize_coerced!(deserialize_i64, as_int, visit_i64);
    impl_deserialize_coerced!(deserialize_u8, as_uint, visit_u64);
    impl_deserialize_coerced!(deserialize_u16, as_uint, visit_u64);
    impl_deserialize_coerced!(deserialize_u32, as_uint, visit_u64);
    impl_deserialize_coerced!(deserialize_u64, as_uint, visit_u64);
    impl_deserialize_coerced!(deserialize_f32, as_float, visit_f32);
    impl_deserialize_coerced!(deserialize_f64, as_double, visit_f64);
    impl_deserialize_coerced!(deserialize_bytes, as_binary, visit_byte_buf);
    impl_deserialize_coerced!(deserialize_byte_buf, as_binary, visit_byte_buf);

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.interprets() && !matches!(self.input, Value::Scalar(Scalar::String(_))) {
            if let Some(v) = self.input.as_string() {
                return visitor.visit_string(v);
            }
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::Absent => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::Scalar(Scalar::String(name)) => visitor.visit_enum(EnumDeserializer {
                name,
                content: None,
                mode: self.mode,
            }),
            Value::Mapping(v) if v.len() == 1 => {
                let (name, content) = v
                    .get_index(0)
                    .ok_or_else(|| Error::type_mismatch("enum", "empty mapping"))?;
                visitor.visit_enum(EnumDeserializer {
                    name,
                    content: Some(content),
                    mode: self.mode,
                })
            }
            _ => Err(Error::type_mismatch("enum", self.input.kind())),
        }
    }

    forward_to_deserialize_any! {
        i128 u128 char unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[derive(Debug)]
pub struct SeqDeserializer<'de> {
    values: &'de [Value],
    index: usize,
    mode: DeserializeMode,
}

impl<'de> SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if let Some(value) = self.values.get(self.index) {
            self.index += 1;
            return seed
                .deserialize(Deserializer::from_data(value, self.mode))
                .map(Some);
        }
        Ok(None)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
pub struct MapDeserializer<'de> {
    values: &'de Mapping,
    index: usize,
    mode: DeserializeMode,
}

impl<'de> MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if let Some((key, _)) = self.values.get_index(self.index) {
            return seed.deserialize(key.as_str().into_deserializer()).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        if let Some((_, value)) = self.values.get_index(self.index) {
            self.index += 1;
            return seed.deserialize(Deserializer::from_data(value, self.mode));
        }
        Err(Error::Message("expected map entry".to_owned()))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
struct EnumDeserializer<'de> {
    name: &'de str,
    content: Option<&'de Value>,
    mode: DeserializeMode,
}

impl<'de> EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let name = seed.deserialize(IntoDeserializer::<Error>::into_deserializer(self.name))?;
        Ok((name, self))
    }
}

impl<'de> VariantAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.content {
            None | Some(Value::Absent) => Ok(()),
            Some(content) => Err(Error::type_mismatch("unit variant", content.kind())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.content {
            Some(content) => seed.deserialize(Deserializer::from_data(content, self.mode)),
            None => Err(Error::type_mismatch("newtype variant", "unit variant")),
        }
    }

    fn tuple_variant<V>(self, _: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Value::Sequence(content)) => visitor.visit_seq(SeqDeserializer {
                values: content,
                index: 0,
                mode: self.mode,
            }),
            Some(content) => Err(Error::type_mismatch("tuple variant", content.kind())),
            None => Err(Error::type_mismatch("tuple variant", "unit variant")),
        }
    }

    fn struct_variant<V>(self, _: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Value::Mapping(content)) => visitor.visit_map(MapDeserializer {
                values: content,
                index: 0,
                mode: self.mode,
            }),
            Some(content) => Err(Error::type_mismatch("struct variant", content.kind())),
            None => Err(Error::type_mismatch("struct variant", "unit variant")),
        }
    }
}

macro_rules! impl_visit {
    ($name:ident, $type:ty) => {
        fn $name<E>(self, value: $type) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.into())
        }
    };
}

#[derive(Copy, Clone)]
pub struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("json-compatible data")
    }

    impl_visit!(visit_bool, bool);
    impl_visit!(visit_i8, i8);
    impl_visit!(visit_i16, i16);
    impl_visit!(visit_i32, i32);
    impl_visit!(visit_i64, i64);
    impl_visit!(visit_u8, u8);
    impl_visit!(visit_u16, u16);
    impl_visit!(visit_u32, u32);
    impl_visit!(visit_u64, u64);
    impl_visit!(visit_f32, f32);
    impl_visit!(visit_f64, f64);
    impl_visit!(visit_char, char);
    impl_visit!(visit_str, &str);
    impl_visit!(visit_string, String);

    fn visit_i128<E>(self, value: i128) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .map(Value::from)
            .map_err(|_| E::custom(format!("integer {} does not fit in 64 bits", value)))
    }

    fn visit_u128<E>(self, value: u128) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(value)
            .map(Value::from)
            .map_err(|_| E::custom(format!("integer {} does not fit in 64 bits", value)))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::from_binary(value))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::from_binary(value))
    }

    fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Absent)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Absent)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_seq<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut result = Vec::with_capacity(access.size_hint().unwrap_or_default());
        while let Some(v) = access.next_element()? {
            result.push(v);
        }
        Ok(Value::Sequence(result))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut result = Mapping::with_capacity(access.size_hint().unwrap_or_default());
        while let Some((k, v)) = access.next_entry::<String, Value>()? {
            result.insert(k, v);
        }
        Ok(Value::Mapping(result))
    }
}
