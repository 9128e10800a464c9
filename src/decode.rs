use crate::config::{DecodeConfig, KeyOrder};
use crate::error::DecodeError;
use crate::value::Value;
use bytes::Bytes;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Decodes exactly one bencode value from `data` with the default configuration.
///
/// # Errors
///
/// Fails if `data` is not a single well-formed, canonical bencode value:
/// malformed integers or lengths, truncated input, dictionary keys out of
/// order, nesting deeper than
/// [`DEFAULT_DECODE_MAX_DEPTH`](crate::constants::DEFAULT_DECODE_MAX_DEPTH),
/// or bytes left over after the value.
///
/// # Examples
///
/// ```
/// use bencodec::{decode, DecodeError, Value};
///
/// assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
/// assert_eq!(decode(b"4:spam").unwrap().as_str(), Some("spam"));
///
/// assert!(matches!(
///     decode(b"i03e"),
///     Err(DecodeError::InvalidInteger { offset: 1, .. })
/// ));
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(data)
}

/// A configured bencode decoder.
///
/// Like [`Encoder`](crate::Encoder) it only holds configuration; the parse
/// cursor lives on the stack of each [`decode`](Decoder::decode) call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    /// Creates a decoder with the default [`DecodeConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given settings.
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Returns the settings this decoder was built with.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes exactly one value; a value followed by anything else is
    /// [`DecodeError::TrailingData`].
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        let mut parser = Parser {
            data,
            pos: 0,
            max_depth: self.config.max_depth,
            key_order: self.config.key_order,
        };

        let result = parser.decode_value(0).and_then(|value| {
            if parser.pos != data.len() {
                return Err(DecodeError::TrailingData { offset: parser.pos });
            }
            Ok(value)
        });

        match &result {
            Ok(_) => tracing::trace!(len = data.len(), "bencode decode finished"),
            Err(e) => tracing::debug!(
                len = data.len(),
                offset = ?e.offset(),
                error = %e,
                "bencode decode failed"
            ),
        }
        result
    }
}

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    max_depth: usize,
    key_order: KeyOrder,
}

impl Parser<'_> {
    fn peek(&self) -> Result<u8, DecodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })
    }

    /// `depth` is the number of containers enclosing the value at the cursor.
    fn enter(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.max_depth {
            return Err(DecodeError::MaxDepthExceeded {
                offset: self.pos,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        match self.peek()? {
            b'i' => self.decode_integer().map(Value::Integer),
            b'l' => self.decode_list(depth),
            b'd' => self.decode_dict(depth),
            b'0'..=b'9' => self.decode_bytes().map(Value::Bytes),
            byte => Err(DecodeError::UnexpectedByte {
                byte,
                offset: self.pos,
            }),
        }
    }

    fn decode_integer(&mut self) -> Result<i64, DecodeError> {
        self.pos += 1;

        let negative = self.data.get(self.pos) == Some(&b'-');
        if negative {
            self.pos += 1;
        }

        // Accumulating towards the sign keeps i64::MIN representable.
        let start = self.pos;
        let mut value: i64 = 0;
        loop {
            match self.peek()? {
                b'e' => break,
                byte @ b'0'..=b'9' => {
                    if self.pos > start && self.data[start] == b'0' {
                        return Err(DecodeError::InvalidInteger {
                            offset: start,
                            reason: "leading zero",
                        });
                    }
                    let digit = i64::from(byte - b'0');
                    value = value
                        .checked_mul(10)
                        .and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        })
                        .ok_or(DecodeError::IntegerOverflow { offset: start })?;
                    self.pos += 1;
                }
                _ => {
                    return Err(DecodeError::InvalidInteger {
                        offset: self.pos,
                        reason: "expected digit or 'e'",
                    })
                }
            }
        }

        if self.pos == start {
            return Err(DecodeError::InvalidInteger {
                offset: start,
                reason: "no digits",
            });
        }
        if negative && value == 0 {
            return Err(DecodeError::InvalidInteger {
                offset: start - 1,
                reason: "negative zero",
            });
        }

        self.pos += 1;
        Ok(value)
    }

    fn decode_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.pos;
        let mut len: usize = 0;
        loop {
            match self.peek()? {
                b':' => break,
                byte @ b'0'..=b'9' => {
                    if self.pos > start && self.data[start] == b'0' {
                        return Err(DecodeError::InvalidLength {
                            offset: start,
                            reason: "leading zero",
                        });
                    }
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(byte - b'0')))
                        .ok_or(DecodeError::InvalidLength {
                            offset: start,
                            reason: "length overflows",
                        })?;
                    self.pos += 1;
                }
                _ => {
                    return Err(DecodeError::InvalidLength {
                        offset: self.pos,
                        reason: "expected digit or ':'",
                    })
                }
            }
        }

        if self.pos == start {
            return Err(DecodeError::InvalidLength {
                offset: start,
                reason: "no digits",
            });
        }
        self.pos += 1;

        // Checked before allocating anything sized by the untrusted prefix.
        if len > self.data.len() - self.pos {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.data.len(),
            });
        }

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(bytes)
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter(depth)?;
        self.pos += 1;

        let mut list = Vec::new();
        while self.peek()? != b'e' {
            list.push(self.decode_value(depth + 1)?);
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter(depth)?;
        self.pos += 1;

        let mut dict = BTreeMap::new();
        // The first ordering fault is held until the dictionary is closed, so
        // truncated or malformed input further on is reported instead.
        let mut misordered: Option<DecodeError> = None;
        loop {
            let key_offset = self.pos;
            match self.peek()? {
                b'e' => break,
                b'0'..=b'9' => {}
                _ => return Err(DecodeError::NonStringDictionaryKey { offset: key_offset }),
            }

            let key = self.decode_bytes()?;

            if misordered.is_none() && self.key_order == KeyOrder::Strict {
                misordered = check_ascending(&dict, &key, key_offset);
            }

            let value = self.decode_value(depth + 1)?;
            if dict.insert(key, value).is_some() && misordered.is_none() {
                misordered = Some(duplicate_key(key_offset));
            }
        }

        self.pos += 1;
        match misordered {
            Some(e) => Err(e),
            None => Ok(Value::Dict(dict)),
        }
    }
}

/// Compares `key` with the greatest key so far, which in a well-ordered
/// dictionary is the previous one.
fn check_ascending(
    dict: &BTreeMap<Bytes, Value>,
    key: &Bytes,
    offset: usize,
) -> Option<DecodeError> {
    let last = dict.keys().next_back()?;
    match key.cmp(last) {
        Ordering::Greater => None,
        Ordering::Equal => Some(duplicate_key(offset)),
        Ordering::Less => Some(DecodeError::InvalidDictionaryKeyOrder {
            offset,
            reason: "keys not in ascending order",
        }),
    }
}

fn duplicate_key(offset: usize) -> DecodeError {
    DecodeError::InvalidDictionaryKeyOrder {
        offset,
        reason: "duplicate key",
    }
}
