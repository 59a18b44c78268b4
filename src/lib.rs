//! # umd-reader
//!
//! A reader for UMD e-book files (text and magazine types).
//! Decodes document metadata, the chapter index, and the zlib-compressed body,
//! with per-chapter text extraction on demand.
pub mod umd;

// Re-export the main types for convenience
pub use umd::{
    codec::text::TextCodec,
    iter::ChapterTexts,
    types::models::{Chapter, MetaType, UmdType},
    ParseOutcome,
    Result,
    UmdDocument,
    UmdError,
    UmdReader,
};
