//! File format parsing layer for UMD e-book files.
//!
//! This module provides the mid-level parsing layer that bridges between
//! the byte [`Cursor`](crate::umd::cursor::Cursor) and the high-level
//! [`UmdReader`](crate::umd::reader::UmdReader). The sections have no random
//! access and must be parsed in order over the same cursor.
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! ├─────────────────┤
//! │  Metadata       │ ← metadata::parse()
//! │  (9 records)    │
//! ├─────────────────┤
//! │  Offset table   │ ← chapters::parse()
//! │  Title table    │
//! ├─────────────────┤
//! │  Content blocks │ ← content::parse()
//! │  (zlib, with    │
//! │   separators)   │
//! └─────────────────┘
//! ```

pub mod chapters;
pub mod content;
pub mod header;
pub mod metadata;
