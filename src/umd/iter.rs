//! Iterator over decoded chapter texts.
//!
//! # Example
//! ```no_run
//! # use umd_reader::UmdReader;
//! # let document = UmdReader::open("book.umd").unwrap().parse().unwrap().into_document().unwrap();
//! for (chapter, text) in document.iter_texts() {
//!     println!("{}: {} chars", chapter.title, text.chars().count());
//! }
//! ```

use std::iter::FusedIterator;

use super::document::UmdDocument;
use super::types::models::Chapter;

/// Yields `(chapter, text)` pairs in chapter order.
///
/// Created by [`UmdDocument::iter_texts()`](crate::UmdDocument::iter_texts).
pub struct ChapterTexts<'a> {
    document: &'a UmdDocument,
    index: usize,
}

impl<'a> ChapterTexts<'a> {
    pub(super) fn new(document: &'a UmdDocument) -> Self {
        Self { document, index: 0 }
    }
}

impl<'a> Iterator for ChapterTexts<'a> {
    type Item = (&'a Chapter, String);

    fn next(&mut self) -> Option<Self::Item> {
        let chapter = self.document.chapters().get(self.index)?;
        let text = self.document.text(self.index).ok()?;
        self.index += 1;
        Some((chapter, text))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.document.chapter_count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChapterTexts<'_> {}

impl FusedIterator for ChapterTexts<'_> {}
