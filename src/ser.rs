//! Mapping Rust types onto [`Value`] trees through `serde`.

use crate::encode::encode;
use crate::error::EncodeError;
use crate::value::Value;
use bytes::Bytes;
use serde::ser::{self, Impossible, Serialize};
use std::collections::BTreeMap;

/// Converts any `Serialize` type into a [`Value`].
///
/// Struct fields and map entries end up in a dictionary sorted by key bytes,
/// whatever order the type produces them in.
///
/// # Errors
///
/// - [`EncodeError::UnsupportedType`] for floats, `None`, `()` and unit structs
/// - [`EncodeError::NonStringDictionaryKey`] for map keys that are not text or bytes
/// - [`EncodeError::DuplicateDictionaryKey`] when two keys produce the same bytes
/// - [`EncodeError::IntegerOverflow`] for integers outside the `i64` range
///
/// # Examples
///
/// ```
/// use bencodec::{to_value, Value};
/// use std::collections::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("port", 6881);
/// let value = to_value(&map).unwrap();
/// assert_eq!(value.get(b"port"), Some(&Value::Integer(6881)));
///
/// assert!(to_value(&1.5f64).is_err());
/// ```
pub fn to_value<T>(value: &T) -> Result<Value, EncodeError>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

/// Serializes any `Serialize` type straight to bencode bytes.
///
/// # Examples
///
/// ```
/// use bencodec::to_bytes;
///
/// assert_eq!(to_bytes(&("spam", 42, true)).unwrap(), b"l4:spami42ei1ee");
/// ```
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>, EncodeError>
where
    T: Serialize + ?Sized,
{
    encode(&to_value(value)?)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        use ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for item in l {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (key, val) in d {
                    map.serialize_entry(&RawKey(key), val)?;
                }
                map.end()
            }
        }
    }
}

/// Serializes a dictionary key as bytes rather than as a sequence of `u8`.
struct RawKey<'a>(&'a [u8]);

impl Serialize for RawKey<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_bytes(self.0)
    }
}

fn integer<T>(v: T) -> Result<Value, EncodeError>
where
    i64: TryFrom<T>,
{
    i64::try_from(v)
        .map(Value::Integer)
        .map_err(|_| EncodeError::IntegerOverflow)
}

fn insert(map: &mut BTreeMap<Bytes, Value>, key: Bytes, value: Value) -> Result<(), EncodeError> {
    if map.contains_key(&key) {
        return Err(EncodeError::DuplicateDictionaryKey {
            key: String::from_utf8_lossy(&key).into_owned(),
        });
    }
    map.insert(key, value);
    Ok(())
}

fn single_entry(variant: &'static str, value: Value) -> Value {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(variant.as_bytes()), value);
    Value::Dict(dict)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDict;
    type SerializeStruct = SerializeDict;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, EncodeError> {
        integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        integer(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Value, EncodeError> {
        integer(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<Value, EncodeError> {
        Err(EncodeError::UnsupportedType { type_name: "f32" })
    }

    fn serialize_f64(self, _v: f64) -> Result<Value, EncodeError> {
        Err(EncodeError::UnsupportedType { type_name: "f64" })
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        let mut utf8 = [0u8; 4];
        Ok(Value::string(v.encode_utf8(&mut utf8)))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::bytes(v))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Err(EncodeError::UnsupportedType {
            type_name: "Option::None",
        })
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Err(EncodeError::UnsupportedType { type_name: "()" })
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, EncodeError> {
        Err(EncodeError::UnsupportedType { type_name: name })
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        Ok(single_entry(variant, value.serialize(ValueSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, EncodeError> {
        Ok(SerializeList {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeList, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, EncodeError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeDict, EncodeError> {
        Ok(SerializeDict {
            dict: BTreeMap::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeDict, EncodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, EncodeError> {
        Ok(SerializeStructVariant {
            variant,
            dict: BTreeMap::new(),
        })
    }
}

struct SerializeList {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(single_entry(self.variant, Value::List(self.items)))
    }
}

struct SerializeDict {
    dict: BTreeMap<Bytes, Value>,
    next_key: Option<Bytes>,
}

impl ser::SerializeMap for SerializeDict {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| EncodeError::Message("map value serialized before its key".into()))?;
        let value = value.serialize(ValueSerializer)?;
        insert(&mut self.dict, key, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Dict(self.dict))
    }
}

impl ser::SerializeStruct for SerializeDict {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let value = value.serialize(ValueSerializer)?;
        insert(&mut self.dict, Bytes::from_static(key.as_bytes()), value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Dict(self.dict))
    }
}

struct SerializeStructVariant {
    variant: &'static str,
    dict: BTreeMap<Bytes, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let value = value.serialize(ValueSerializer)?;
        insert(&mut self.dict, Bytes::from_static(key.as_bytes()), value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(single_entry(self.variant, Value::Dict(self.dict)))
    }
}

/// Accepts only key shapes that have a byte string form.
struct KeySerializer;

fn key_error(type_name: &'static str) -> EncodeError {
    EncodeError::NonStringDictionaryKey { type_name }
}

impl ser::Serializer for KeySerializer {
    type Ok = Bytes;
    type Error = EncodeError;

    type SerializeSeq = Impossible<Bytes, EncodeError>;
    type SerializeTuple = Impossible<Bytes, EncodeError>;
    type SerializeTupleStruct = Impossible<Bytes, EncodeError>;
    type SerializeTupleVariant = Impossible<Bytes, EncodeError>;
    type SerializeMap = Impossible<Bytes, EncodeError>;
    type SerializeStruct = Impossible<Bytes, EncodeError>;
    type SerializeStructVariant = Impossible<Bytes, EncodeError>;

    fn serialize_str(self, v: &str) -> Result<Bytes, EncodeError> {
        Ok(Bytes::copy_from_slice(v.as_bytes()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Bytes, EncodeError> {
        Ok(Bytes::copy_from_slice(v))
    }

    fn serialize_char(self, v: char) -> Result<Bytes, EncodeError> {
        let mut utf8 = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut utf8))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Bytes, EncodeError> {
        Ok(Bytes::from_static(variant.as_bytes()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Bytes, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Bytes, EncodeError> {
        Err(key_error("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Bytes, EncodeError> {
        Err(key_error("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Bytes, EncodeError> {
        Err(key_error("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Bytes, EncodeError> {
        Err(key_error("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Bytes, EncodeError> {
        Err(key_error("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Bytes, EncodeError> {
        Err(key_error("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Bytes, EncodeError> {
        Err(key_error("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Bytes, EncodeError> {
        Err(key_error("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Bytes, EncodeError> {
        Err(key_error("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Bytes, EncodeError> {
        Err(key_error("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Bytes, EncodeError> {
        Err(key_error("f64"))
    }

    fn serialize_none(self) -> Result<Bytes, EncodeError> {
        Err(key_error("Option::None"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Bytes, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        Err(key_error("Option::Some"))
    }

    fn serialize_unit(self) -> Result<Bytes, EncodeError> {
        Err(key_error("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Bytes, EncodeError> {
        Err(key_error(name))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Bytes, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        Err(key_error(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(key_error("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(key_error("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(key_error(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(key_error(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(key_error("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(key_error(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(key_error(name))
    }
}
