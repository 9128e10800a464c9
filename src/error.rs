use std::fmt::Display;

use thiserror::Error;

/// Errors produced while turning a value into bencode.
///
/// Encoding never fails for a [`Value`](crate::Value) tree within the
/// configured depth; the remaining variants come from mapping Rust types
/// through [`to_value`](crate::to_value) and [`to_bytes`](crate::to_bytes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The type has no bencode representation.
    #[error(
        "invalid type '{type_name}', bencode only supports integers, bools (as 0/1), \
         strings, bytes, sequences, tuples, maps and structs"
    )]
    UnsupportedType { type_name: &'static str },

    /// A map key that is neither text nor bytes.
    #[error("dictionary key must be a string or bytes, found {type_name}")]
    NonStringDictionaryKey { type_name: &'static str },

    /// Two keys of one map encode to the same bytes.
    #[error("duplicate dictionary key {key:?}")]
    DuplicateDictionaryKey { key: String },

    /// An integer outside the signed 64-bit range.
    #[error("integer does not fit in a signed 64-bit bencode integer")]
    IntegerOverflow,

    #[error("nesting deeper than {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },

    /// Raised by a `Serialize` implementation.
    #[error("{0}")]
    Message(String),

    #[error("failed to write output: {0}")]
    Write(#[from] std::fmt::Error),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}

/// Errors produced while parsing bencode or mapping a decoded value onto a
/// Rust type.
///
/// Grammar errors carry the byte offset at which the fault was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended in the middle of a value.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A value started with a byte that is not `i`, `l`, `d` or a digit.
    #[error("unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("invalid integer at offset {offset}: {reason}")]
    InvalidInteger { offset: usize, reason: &'static str },

    /// A well-formed integer outside the signed 64-bit range.
    #[error("integer out of range at offset {offset}")]
    IntegerOverflow { offset: usize },

    /// A malformed byte string length prefix.
    #[error("invalid byte string length at offset {offset}: {reason}")]
    InvalidLength { offset: usize, reason: &'static str },

    #[error("invalid dictionary at offset {offset}: {reason}")]
    InvalidDictionaryKeyOrder { offset: usize, reason: &'static str },

    #[error("dictionary key at offset {offset} is not a byte string")]
    NonStringDictionaryKey { offset: usize },

    /// Bytes remain after the top-level value.
    #[error("trailing data after value at offset {offset}")]
    TrailingData { offset: usize },

    #[error("nesting deeper than {max_depth} levels at offset {offset}")]
    MaxDepthExceeded { offset: usize, max_depth: usize },

    /// A byte string mapped onto a text type is not valid UTF-8.
    #[error("byte string is not valid UTF-8")]
    InvalidText,

    /// Raised by a `Deserialize` implementation.
    #[error("{0}")]
    Message(String),
}

impl DecodeError {
    /// Returns the input offset the error was detected at.
    ///
    /// Errors raised while mapping an already decoded [`Value`](crate::Value)
    /// onto a Rust type have no offset.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedEnd { offset }
            | DecodeError::UnexpectedByte { offset, .. }
            | DecodeError::InvalidInteger { offset, .. }
            | DecodeError::IntegerOverflow { offset }
            | DecodeError::InvalidLength { offset, .. }
            | DecodeError::InvalidDictionaryKeyOrder { offset, .. }
            | DecodeError::NonStringDictionaryKey { offset }
            | DecodeError::TrailingData { offset }
            | DecodeError::MaxDepthExceeded { offset, .. } => Some(*offset),
            DecodeError::InvalidText | DecodeError::Message(_) => None,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }
}
