use crate::{
    error::*,
    value::data::{Mapping, Value},
};
use serde::Serialize;

macro_rules! impl_serialize {
    ($name:ident, $type:ident) => {
        fn $name(self, v: $type) -> Result<Self::Ok> {
            Ok(Value::from(v))
        }
    };
}

/// Converts any `Serialize` type into [`Value`] data.
///
/// Map keys must come out as scalars, anything else fails with
/// [`Error::Parsing`].
pub fn to_data<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    value.serialize(Serializer)
}

impl Value {
    pub fn from_serialize<T>(value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        to_data(value)
    }

    /// Like [`Value::from_serialize`] but any failure gives `Absent`.
    pub fn safe_from_serialize<T>(value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        to_data(value).unwrap_or_else(crate::de::json::absorb)
    }
}

pub struct Serializer;

impl serde::ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSerializer<SeqSerializer>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantSerializer<MapSerializer>;

    impl_serialize!(serialize_bool, bool);
    impl_serialize!(serialize_i8, i8);
    impl_serialize!(serialize_i16, i16);
    impl_serialize!(serialize_i32, i32);
    impl_serialize!(serialize_i64, i64);
    impl_serialize!(serialize_u8, u8);
    impl_serialize!(serialize_u16, u16);
    impl_serialize!(serialize_u32, u32);
    impl_serialize!(serialize_u64, u64);
    impl_serialize!(serialize_f32, f32);
    impl_serialize!(serialize_f64, f64);
    impl_serialize!(serialize_char, char);

    fn serialize_i128(self, v: i128) -> Result<Self::Ok> {
        i64::try_from(v)
            .map(Value::from)
            .map_err(|_| Error::Parsing(format!("integer {} does not fit in 64 bits", v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| Error::Parsing(format!("integer {} does not fit in 64 bits", v)))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Ok(Value::from_binary(v))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Value::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::Absent)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(Value::Absent)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        let mut result = Mapping::with_capacity(1);
        result.insert(variant.to_owned(), value.serialize(self)?);
        Ok(Value::Mapping(result))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(VariantSerializer {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            values: Mapping::with_capacity(len.unwrap_or_default()),
            next_key: None,
        })
    }

    fn serialize_struct(self, _: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(VariantSerializer {
            variant,
            inner: self.serialize_map(Some(len))?,
        })
    }
}

pub struct SeqSerializer {
    values: Vec<Value>,
}

impl serde::ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Sequence(self.values))
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

pub struct MapSerializer {
    values: Mapping,
    next_key: Option<String>,
}

fn key_from(key: Value) -> Result<String> {
    match key {
        Value::Scalar(v) => Ok(v.to_string()),
        key => Err(Error::Parsing(format!(
            "mapping keys must be scalars, found {}",
            key.kind()
        ))),
    }
}

impl serde::ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key_from(key.serialize(Serializer)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Message("map value serialized before its key".to_owned()))?;
        self.values.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Mapping(self.values))
    }
}

impl serde::ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values
            .insert(key.to_owned(), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Mapping(self.values))
    }
}

/// Wraps the variant content into a single-entry mapping keyed by the
/// variant name.
pub struct VariantSerializer<S> {
    variant: &'static str,
    inner: S,
}

impl<S> VariantSerializer<S> {
    fn wrap(variant: &'static str, content: Value) -> Value {
        let mut result = Mapping::with_capacity(1);
        result.insert(variant.to_owned(), content);
        Value::Mapping(result)
    }
}

impl serde::ser::SerializeTupleVariant for VariantSerializer<SeqSerializer> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Self::Ok> {
        let content = serde::ser::SerializeSeq::end(self.inner)?;
        Ok(Self::wrap(self.variant, content))
    }
}

impl serde::ser::SerializeStructVariant for VariantSerializer<MapSerializer> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        let content = serde::ser::SerializeStruct::end(self.inner)?;
        Ok(Self::wrap(self.variant, content))
    }
}
