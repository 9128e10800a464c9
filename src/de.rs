//! Mapping decoded [`Value`] trees onto Rust types through `serde`.

use crate::config::{DecodeConfig, TextPolicy};
use crate::decode::Decoder;
use crate::error::DecodeError;
use crate::value::Value;
use bytes::Bytes;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Expected, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::vec;

/// Maps a decoded [`Value`] onto any `DeserializeOwned` type, using
/// [`TextPolicy::Strict`].
///
/// # Examples
///
/// ```
/// use bencodec::{decode, from_value};
/// use std::collections::BTreeMap;
///
/// let value = decode(b"d3:bari42e3:fooi7ee").unwrap();
/// let map: BTreeMap<String, i64> = from_value(value).unwrap();
/// assert_eq!(map["bar"], 42);
/// ```
pub fn from_value<T>(value: Value) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    de::Deserialize::deserialize(ValueDeserializer::new(value, TextPolicy::Strict))
}

/// Decodes `data` and maps the result onto `T` with the default configuration.
///
/// Grammar errors are reported exactly as [`decode`](crate::decode) reports
/// them; type mismatches surface as [`DecodeError::Message`] and non-UTF-8
/// text as [`DecodeError::InvalidText`].
pub fn from_bytes<T>(data: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    from_bytes_with_config(data, DecodeConfig::default())
}

/// Like [`from_bytes`], with explicit depth, key order and text policy.
pub fn from_bytes_with_config<T>(data: &[u8], config: DecodeConfig) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    let value = Decoder::with_config(config).decode(data)?;
    de::Deserialize::deserialize(ValueDeserializer::new(value, config.text))
}

impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a bencode integer, byte string, list or dictionary")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::bytes(v))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        de::Deserialize::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        de::Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            list.push(item);
        }
        Ok(Value::List(list))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut dict = BTreeMap::new();
        while let Some(key) = map.next_key::<Value>()? {
            let key = match key {
                Value::Bytes(b) => b,
                other => {
                    return Err(de::Error::invalid_type(unexpected(&other), &"a byte string key"))
                }
            };
            let value = map.next_value()?;
            if dict.insert(key, value).is_some() {
                return Err(de::Error::custom("duplicate dictionary key"));
            }
        }
        Ok(Value::Dict(dict))
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Integer(i) => Unexpected::Signed(*i),
        Value::Bytes(b) => Unexpected::Bytes(b),
        Value::List(_) => Unexpected::Seq,
        Value::Dict(_) => Unexpected::Map,
    }
}

/// Owned deserializer over a decoded tree; children inherit the text policy.
struct ValueDeserializer {
    value: Value,
    text: TextPolicy,
}

impl ValueDeserializer {
    fn new(value: Value, text: TextPolicy) -> Self {
        Self { value, text }
    }

    fn invalid_type(&self, exp: &dyn Expected) -> DecodeError {
        de::Error::invalid_type(unexpected(&self.value), exp)
    }

    fn deserialize_text<'de, V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Bytes(b) => match String::from_utf8(b.to_vec()) {
                Ok(s) => visitor.visit_string(s),
                Err(e) => match self.text {
                    TextPolicy::Strict => Err(DecodeError::InvalidText),
                    TextPolicy::BytesFallback => visitor.visit_byte_buf(e.into_bytes()),
                },
            },
            _ => Err(self.invalid_type(&visitor)),
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = DecodeError;

    /// Byte strings are offered as text when they are valid UTF-8 and as
    /// raw bytes otherwise.
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let text = self.text;
        match self.value {
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Bytes(b) => match String::from_utf8(b.to_vec()) {
                Ok(s) => visitor.visit_string(s),
                Err(e) => visitor.visit_byte_buf(e.into_bytes()),
            },
            Value::List(l) => visit_list(l, text, visitor),
            Value::Dict(d) => visit_dict(d, text, visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Integer(0) => visitor.visit_bool(false),
            Value::Integer(1) => visitor.visit_bool(true),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_text(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_text(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_text(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Bytes(b) => visitor.visit_byte_buf(b.to_vec()),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    /// Absent struct fields already become `None`, so anything present is `Some`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let text = self.text;
        match self.value {
            Value::List(l) => visit_list(l, text, visitor),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let text = self.text;
        match self.value {
            Value::Dict(d) => visit_dict(d, text, visitor),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let text = self.text;
        let (variant, value) = match self.value {
            Value::Bytes(b) => (b, None),
            Value::Dict(d) if d.len() == 1 => match d.into_iter().next() {
                Some((variant, value)) => (variant, Some(value)),
                None => return Err(de::Error::custom("empty enum dictionary")),
            },
            Value::Dict(_) => {
                return Err(de::Error::invalid_value(
                    Unexpected::Map,
                    &"a dictionary with exactly one entry",
                ))
            }
            other => {
                return Err(de::Error::invalid_type(
                    unexpected(&other),
                    &"a byte string or single-entry dictionary",
                ))
            }
        };
        visitor.visit_enum(EnumDeserializer {
            variant,
            value,
            text,
        })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Bytes(b) => match std::str::from_utf8(&b) {
                Ok(s) => visitor.visit_str(s),
                Err(_) => visitor.visit_bytes(&b),
            },
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 unit unit_struct
    }
}

fn visit_list<'de, V>(
    list: Vec<Value>,
    text: TextPolicy,
    visitor: V,
) -> Result<V::Value, DecodeError>
where
    V: Visitor<'de>,
{
    let len = list.len();
    let mut seq = SeqDeserializer {
        iter: list.into_iter(),
        text,
    };
    let out = visitor.visit_seq(&mut seq)?;
    if seq.iter.len() == 0 {
        Ok(out)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in list"))
    }
}

fn visit_dict<'de, V>(
    dict: BTreeMap<Bytes, Value>,
    text: TextPolicy,
    visitor: V,
) -> Result<V::Value, DecodeError>
where
    V: Visitor<'de>,
{
    let len = dict.len();
    let mut map = MapDeserializer {
        iter: dict.into_iter(),
        value: None,
        text,
    };
    let out = visitor.visit_map(&mut map)?;
    if map.iter.len() == 0 {
        Ok(out)
    } else {
        Err(de::Error::invalid_length(len, &"fewer entries in dictionary"))
    }
}

struct SeqDeserializer {
    iter: vec::IntoIter<Value>,
    text: TextPolicy,
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed
                .deserialize(ValueDeserializer::new(value, self.text))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: btree_map::IntoIter<Bytes, Value>,
    value: Option<Value>,
    text: TextPolicy,
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::Bytes(key), self.text))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value, self.text)),
            None => Err(de::Error::custom("dictionary value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: Bytes,
    value: Option<Value>,
    text: TextPolicy,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = DecodeError;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantDeserializer), DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(
            Value::Bytes(self.variant),
            self.text,
        ))?;
        Ok((
            variant,
            VariantDeserializer {
                value: self.value,
                text: self.text,
            },
        ))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
    text: TextPolicy,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        match self.value {
            None => Ok(()),
            Some(value) => Err(de::Error::invalid_type(unexpected(&value), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value, self.text)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::List(l)) => visit_list(l, self.text, visitor),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"tuple variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Dict(d)) => visit_dict(d, self.text, visitor),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"struct variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}
