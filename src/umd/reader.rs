//! `UmdReader`: opens a UMD source and parses it into a [`UmdDocument`].

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use encoding_rs::Encoding;
use log::info;

use super::codec::text::TextCodec;
use super::cursor::Cursor;
use super::document::UmdDocument;
use super::format::{chapters, content, header, metadata};
use super::types::error::{Result, UmdError};
use super::utils;

/// Outcome of a parse attempt.
///
/// A source that is not a UMD file is an ordinary outcome rather than an
/// error, so callers can probe arbitrary files and fall through to another
/// parser.
#[derive(Debug)]
pub enum ParseOutcome {
    Document(UmdDocument),
    NotUmd,
}

impl ParseOutcome {
    pub fn is_umd(&self) -> bool {
        matches!(self, ParseOutcome::Document(_))
    }

    /// Converts the outcome into a `Result`, mapping `NotUmd` to
    /// [`UmdError::NotUmdFormat`].
    pub fn into_document(self) -> Result<UmdDocument> {
        match self {
            ParseOutcome::Document(document) => Ok(document),
            ParseOutcome::NotUmd => Err(UmdError::NotUmdFormat),
        }
    }
}

/// The main reader for UMD e-book files.
///
/// Text decoding for metadata values and chapter bodies can be configured;
/// chapter titles are always UTF-16LE.
///
/// ```no_run
/// # use umd_reader::UmdReader;
/// let document = UmdReader::open("book.umd")?
///     .with_encoding_label("utf-16le")
///     .parse()?
///     .into_document()?;
/// println!("{} by {}", document.title(), document.author());
/// # Ok::<(), umd_reader::UmdError>(())
/// ```
#[derive(Debug)]
pub struct UmdReader<R> {
    cursor: Cursor<R>,
    codec: TextCodec,
}

impl UmdReader<BufReader<File>> {
    /// Opens a UMD file from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening UMD file: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> UmdReader<R> {
    /// Wraps a byte source. Text decodes as UTF-16LE unless configured otherwise.
    pub fn new(source: R) -> Self {
        Self {
            cursor: Cursor::new(source),
            codec: TextCodec::default(),
        }
    }

    /// Decodes metadata values and chapter text with a caller-supplied function.
    ///
    /// Takes precedence over any configured encoding.
    pub fn with_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.codec = TextCodec::custom(decode);
        self
    }

    /// Sets the default encoding. Has no effect once a decoder is set.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        if !self.codec.is_custom() {
            self.codec = TextCodec::Encoding(encoding);
        }
        self
    }

    /// Sets the default encoding from a label such as `"gbk"` or `"utf-8"`.
    pub fn with_encoding_label(self, label: &str) -> Self {
        let encoding = utils::parse_encoding(label);
        self.with_encoding(encoding)
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// Checks the magic signature without parsing, restoring the position.
    pub fn is_umd(&mut self) -> Result<bool> {
        let mark = self.cursor.mark()?;
        let matched = header::check_magic(&mut self.cursor);
        self.cursor.rewind(mark)?;
        matched
    }

    /// Parses the whole file from the start of the source.
    ///
    /// Every call re-reads the source and builds a fresh document.
    ///
    /// # Errors
    /// Returns an error if a record is truncated or malformed. A content block
    /// that fails to inflate is not an error: the document keeps the body
    /// decoded so far and reports [`UmdDocument::is_partial`].
    pub fn parse(&mut self) -> Result<ParseOutcome> {
        self.cursor.seek(0)?;

        let Some(umd_type) = header::parse(&mut self.cursor)? else {
            return Ok(ParseOutcome::NotUmd);
        };
        let metadata = metadata::parse(&mut self.cursor, &self.codec)?;
        let chapters = chapters::parse(&mut self.cursor)?;
        let section = content::parse(&mut self.cursor)?;

        info!(
            "UMD file parsed: type={:?}, {} metadata records, {} chapters, {} body bytes{}",
            umd_type,
            metadata.len(),
            chapters.len(),
            section.body.len(),
            if section.partial { " (partial)" } else { "" }
        );

        Ok(ParseOutcome::Document(UmdDocument::new(
            umd_type,
            metadata,
            chapters,
            section.body,
            self.codec.clone(),
            section.partial,
        )))
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }
}
