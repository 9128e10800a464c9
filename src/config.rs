use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_DECODE_MAX_DEPTH, DEFAULT_ENCODE_MAX_DEPTH};

/// How the decoder treats dictionary key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyOrder {
    /// Every key must be strictly greater than the one before it.
    #[default]
    Strict,
    /// Keys may appear in any order and are re-sorted. Duplicates are still
    /// rejected.
    Lenient,
}

/// What happens when a byte string is mapped onto a text type
/// (`String`, `&str`, `char`) and is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextPolicy {
    /// Fail with [`DecodeError::InvalidText`](crate::DecodeError::InvalidText).
    #[default]
    Strict,
    /// Hand the raw bytes to the target type instead. Types that accept
    /// bytes succeed; the rest fail with a type mismatch.
    BytesFallback,
}

/// Decoder settings.
///
/// # Examples
///
/// ```
/// use bencodec::{DecodeConfig, Decoder, KeyOrder};
///
/// let decoder = Decoder::with_config(
///     DecodeConfig::default()
///         .with_max_depth(8)
///         .with_key_order(KeyOrder::Lenient),
/// );
/// let value = decoder.decode(b"d1:bi2e1:ai1ee").unwrap();
/// assert_eq!(value.get(b"a").and_then(|v| v.as_integer()), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum number of nested lists/dictionaries.
    pub max_depth: usize,
    /// See [`KeyOrder`].
    pub key_order: KeyOrder,
    /// Used by [`from_bytes_with_config`](crate::from_bytes_with_config).
    pub text: TextPolicy,
}

impl DecodeConfig {
    /// Sets how many lists/dictionaries may be open at once.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether keys must arrive in ascending order.
    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }

    /// Sets how non-UTF-8 byte strings map onto text types.
    pub fn with_text_policy(mut self, text: TextPolicy) -> Self {
        self.text = text;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DECODE_MAX_DEPTH,
            key_order: KeyOrder::Strict,
            text: TextPolicy::Strict,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Maximum number of nested lists/dictionaries, `None` for no ceiling.
    pub max_depth: Option<usize>,
    /// Capacity the output buffer starts with.
    pub initial_capacity: usize,
}

impl EncodeConfig {
    /// Sets the nesting ceiling; `None` disables it.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the capacity the output buffer starts with.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_ENCODE_MAX_DEPTH),
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}
