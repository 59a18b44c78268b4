//! Codec layer for decompression and text decoding.
//!
//! # Submodules
//!
//! - [`compression`][]: Zlib inflation of content blocks
//! - [`text`][]: Byte-to-string decoding (fixed encoding or caller-supplied)

pub mod compression;
pub mod text;
