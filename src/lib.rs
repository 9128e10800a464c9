//! bencodec - a strict bencode codec ([BEP-3])
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files, tracker
//! responses and DHT messages. This crate converts between bencode bytes and
//! an owned [`Value`] tree, and maps Rust types onto that tree through `serde`.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use bencodec::{decode, Value};
//!
//! let value = decode(b"d3:bari42e3:foo4:spame").unwrap();
//! assert_eq!(value.get(b"bar"), Some(&Value::Integer(42)));
//! assert_eq!(value.get(b"foo").and_then(Value::as_str), Some("spam"));
//! ```
//!
//! ## Encoding bencode data
//!
//! ```
//! use bencodec::{encode, Value};
//! use bytes::Bytes;
//! use std::collections::BTreeMap;
//!
//! let mut dict = BTreeMap::new();
//! dict.insert(Bytes::from_static(b"key"), Value::string("value"));
//! assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d3:key5:valuee");
//! ```
//!
//! ## Typed data
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Peer {
//!     ip: String,
//!     port: u16,
//! }
//!
//! let peer = Peer { ip: "10.0.0.1".into(), port: 6881 };
//! let encoded = bencodec::to_bytes(&peer).unwrap();
//! assert_eq!(encoded, b"d2:ip8:10.0.0.14:porti6881ee");
//! assert_eq!(bencodec::from_bytes::<Peer>(&encoded).unwrap(), peer);
//! ```
//!
//! # Untrusted input
//!
//! The decoder is meant to face attacker-controlled bytes. It accepts only
//! canonical bencode (minimal integers and lengths, strictly ascending
//! dictionary keys), bounds nesting depth, and checks every length prefix
//! against the remaining input before allocating. Every call either returns
//! a complete value or an error; nothing is kept between calls.
//!
//! # Error Handling
//!
//! Encoding and decoding have separate error types, [`EncodeError`] and
//! [`DecodeError`]. Decode errors carry the byte offset where the fault was
//! detected:
//!
//! - [`DecodeError::UnexpectedEnd`] - Input ended unexpectedly
//! - [`DecodeError::InvalidInteger`] - Malformed integer (e.g., leading zeros, `-0`)
//! - [`DecodeError::IntegerOverflow`] - Integer outside the `i64` range
//! - [`DecodeError::InvalidLength`] - Malformed byte string length
//! - [`DecodeError::InvalidDictionaryKeyOrder`] - Unsorted or duplicate keys
//! - [`DecodeError::MaxDepthExceeded`] - Nesting limit exceeded (64 levels by default)
//! - [`DecodeError::TrailingData`] - Extra data after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod buffer;
mod config;
pub mod constants;
mod de;
mod decode;
mod encode;
mod error;
mod ser;
mod value;

pub use config::{DecodeConfig, EncodeConfig, KeyOrder, TextPolicy};
pub use de::{from_bytes, from_bytes_with_config, from_value};
pub use decode::{decode, Decoder};
pub use encode::{encode, Encoder};
pub use error::{DecodeError, EncodeError};
pub use ser::{to_bytes, to_value};
pub use value::Value;
