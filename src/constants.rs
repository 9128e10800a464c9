//! Codec limits and tuning parameters.
//!
//! These are the defaults behind [`DecodeConfig`](crate::DecodeConfig) and
//! [`EncodeConfig`](crate::EncodeConfig). Callers that need different bounds
//! override them per call through the config structs.

// ============================================================================
// Nesting limits
// ============================================================================

/// Maximum number of nested lists/dictionaries accepted by the decoder.
///
/// Decoder input is untrusted, so the default is kept small enough that the
/// recursive descent never comes near the thread stack limit. Real-world
/// metainfo and DHT payloads rarely nest deeper than 5 levels.
pub const DEFAULT_DECODE_MAX_DEPTH: usize = 64;

/// Maximum number of nested lists/dictionaries the encoder will walk.
///
/// Encoder input is built by the caller, so the ceiling is generous; it only
/// exists so a runaway tree fails with an error instead of overflowing the stack.
pub const DEFAULT_ENCODE_MAX_DEPTH: usize = 512;

// ============================================================================
// Buffers
// ============================================================================

/// Initial capacity of the encode output buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Longest decimal rendering of an `i64` (`-9223372036854775808`).
pub const MAX_INTEGER_DIGITS: usize = 20;
