use crate::buffer::EncodeBuffer;
use crate::config::EncodeConfig;
use crate::error::EncodeError;
use crate::value::Value;

/// Encodes a bencode value to a byte vector with the default configuration.
///
/// The output is always canonical:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys in ascending byte order)
///
/// # Errors
///
/// Returns [`EncodeError::MaxDepthExceeded`] if the tree nests deeper than
/// [`DEFAULT_ENCODE_MAX_DEPTH`](crate::constants::DEFAULT_ENCODE_MAX_DEPTH).
///
/// # Examples
///
/// ```
/// use bencodec::{encode, Value};
/// use std::collections::BTreeMap;
/// use bytes::Bytes;
///
/// assert_eq!(encode(&Value::Integer(42)).unwrap(), b"i42e");
/// assert_eq!(encode(&Value::string("hello")).unwrap(), b"5:hello");
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
///
/// let mut dict = BTreeMap::new();
/// dict.insert(Bytes::from_static(b"b"), Value::Integer(2));
/// dict.insert(Bytes::from_static(b"a"), Value::Integer(1));
/// assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d1:ai1e1:bi2ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value)
}

/// A configured bencode encoder.
///
/// The encoder holds only its configuration; every call gets its own output
/// buffer, so one encoder can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    config: EncodeConfig,
}

impl Encoder {
    /// Creates an encoder with the default [`EncodeConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with the given settings.
    pub fn with_config(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Returns the settings this encoder was built with.
    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encodes `value`, returning either the complete output or an error;
    /// no partial output is ever returned.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut buf = EncodeBuffer::with_capacity(self.config.initial_capacity);
        match self.encode_value(value, &mut buf, 0) {
            Ok(()) => {
                tracing::trace!(len = buf.len(), "bencode encode finished");
                Ok(buf.finish())
            }
            Err(e) => {
                tracing::debug!(error = %e, "bencode encode failed");
                Err(e)
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<(), EncodeError> {
        match self.config.max_depth {
            Some(max_depth) if depth >= max_depth => {
                Err(EncodeError::MaxDepthExceeded { max_depth })
            }
            _ => Ok(()),
        }
    }

    fn encode_value(
        &self,
        value: &Value,
        buf: &mut EncodeBuffer,
        depth: usize,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Integer(i) => {
                buf.put_u8(b'i');
                buf.put_integer(*i)?;
                buf.put_u8(b'e');
            }
            Value::Bytes(b) => encode_bytes(b, buf)?,
            Value::List(l) => {
                self.enter(depth)?;
                buf.put_u8(b'l');
                for item in l {
                    self.encode_value(item, buf, depth + 1)?;
                }
                buf.put_u8(b'e');
            }
            Value::Dict(d) => {
                self.enter(depth)?;
                buf.put_u8(b'd');
                for (key, val) in d {
                    encode_bytes(key, buf)?;
                    self.encode_value(val, buf, depth + 1)?;
                }
                buf.put_u8(b'e');
            }
        }
        Ok(())
    }
}

fn encode_bytes(data: &[u8], buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
    buf.put_length(data.len())?;
    buf.put_slice(data);
    Ok(())
}
