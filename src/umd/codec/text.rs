//! Text decoding for metadata values and chapter bodies.

use std::fmt;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_16LE};

/// Caller-supplied byte-to-string function.
pub type DecodeFn = dyn Fn(&[u8]) -> String + Send + Sync;

/// How raw text bytes become strings.
///
/// Either a fixed `encoding_rs` encoding (UTF-16LE unless configured
/// otherwise) or a function supplied by the caller. Chapter titles ignore this
/// setting and are always decoded as UTF-16LE.
#[derive(Clone)]
pub enum TextCodec {
    Encoding(&'static Encoding),
    Custom(Arc<DecodeFn>),
}

impl TextCodec {
    pub fn custom<F>(decode: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        TextCodec::Custom(Arc::new(decode))
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextCodec::Encoding(encoding) => decode_with(*encoding, bytes),
            TextCodec::Custom(decode) => (**decode)(bytes),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TextCodec::Custom(_))
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        TextCodec::Encoding(UTF_16LE)
    }
}

impl fmt::Debug for TextCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextCodec::Encoding(encoding) => f.debug_tuple("Encoding").field(&encoding.name()).finish(),
            TextCodec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Decodes bytes with a fixed encoding, replacing malformed sequences.
pub fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Decodes a chapter title, which is always UTF-16LE.
pub fn decode_title(bytes: &[u8]) -> String {
    decode_with(UTF_16LE, bytes)
}
