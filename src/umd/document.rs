//! The parsed UMD document and chapter text extraction.

use std::collections::HashMap;
use std::ops::Range;

use crate::umd::codec::text::TextCodec;
use crate::umd::iter::ChapterTexts;
use crate::umd::types::error::{Result, UmdError};
use crate::umd::types::models::{Chapter, MetaType, UmdType};

/// A fully parsed UMD file.
///
/// The document is immutable once built. Chapter text is decoded on demand
/// from the decompressed body, so [`UmdDocument::text`] can be called any
/// number of times, from any number of threads.
#[derive(Debug, Clone)]
pub struct UmdDocument {
    umd_type: UmdType,
    metadata: HashMap<MetaType, String>,
    chapters: Vec<Chapter>,
    body: Vec<u8>,
    codec: TextCodec,
    partial: bool,
}

impl UmdDocument {
    pub(crate) fn new(
        umd_type: UmdType,
        metadata: HashMap<MetaType, String>,
        chapters: Vec<Chapter>,
        body: Vec<u8>,
        codec: TextCodec,
        partial: bool,
    ) -> Self {
        Self {
            umd_type,
            metadata,
            chapters,
            body,
            codec,
            partial,
        }
    }

    pub fn umd_type(&self) -> UmdType {
        self.umd_type
    }

    /// Returns the metadata value for `key`, or the tag's default when the
    /// file did not provide one.
    pub fn meta(&self, key: MetaType) -> &str {
        self.metadata
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_value())
    }

    /// The metadata values actually present in the file, without defaults.
    pub fn metadata(&self) -> &HashMap<MetaType, String> {
        &self.metadata
    }

    pub fn title(&self) -> &str {
        self.meta(MetaType::Title)
    }

    pub fn author(&self) -> &str {
        self.meta(MetaType::Author)
    }

    pub fn publish_year(&self) -> &str {
        self.meta(MetaType::PublishYear)
    }

    pub fn publish_month(&self) -> &str {
        self.meta(MetaType::PublishMonth)
    }

    pub fn publish_day(&self) -> &str {
        self.meta(MetaType::PublishDay)
    }

    pub fn book_type(&self) -> &str {
        self.meta(MetaType::BookType)
    }

    pub fn publisher(&self) -> &str {
        self.meta(MetaType::Publisher)
    }

    pub fn vendor(&self) -> &str {
        self.meta(MetaType::Vendor)
    }

    pub fn origin_length(&self) -> &str {
        self.meta(MetaType::OriginLength)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, index: usize) -> Result<&Chapter> {
        self.chapters.get(index).ok_or(UmdError::IndexOutOfRange {
            index,
            len: self.chapters.len(),
        })
    }

    /// The decompressed body, before any text decoding.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// Whether content decoding stopped early on a block that failed to
    /// inflate. The body then holds only the blocks before it.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Byte range of a chapter within the body.
    ///
    /// A chapter runs up to the next chapter's offset, the last one to the end
    /// of the body. Offsets past the end of a partial body are clamped, so
    /// such chapters come out short or empty.
    pub fn chapter_range(&self, index: usize) -> Result<Range<usize>> {
        let chapter = self.chapter(index)?;
        let len = self.body.len();
        let end = self
            .chapters
            .get(index + 1)
            .map(|next| next.offset as usize)
            .unwrap_or(len)
            .min(len);
        let start = (chapter.offset as usize).min(end);
        Ok(start..end)
    }

    pub fn chapter_bytes(&self, index: usize) -> Result<&[u8]> {
        let range = self.chapter_range(index)?;
        Ok(&self.body[range])
    }

    /// Decodes the text of chapter `index`.
    pub fn text(&self, index: usize) -> Result<String> {
        let bytes = self.chapter_bytes(index)?;
        Ok(self.codec.decode(bytes))
    }

    /// Decodes the whole body in one piece.
    pub fn full_text(&self) -> String {
        self.codec.decode(&self.body)
    }

    /// Iterates over every chapter together with its decoded text.
    pub fn iter_texts(&self) -> ChapterTexts<'_> {
        ChapterTexts::new(self)
    }
}
