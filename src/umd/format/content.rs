//! # Content Section Decoding
//!
//! The content section is a run of zlib-compressed blocks whose inflated
//! output is concatenated into one body buffer. Chapter offsets index into
//! that buffer.
//!
//! ```text
//! Block:
//! [1 byte ] Marker '$' (0x24)
//! [4 bytes] Reserved
//! [4 bytes] Length field L, compressed length = L - 9
//! [N bytes] Zlib stream
//!
//! Separator (optional, between blocks):
//! [1 byte ] Marker '#' (0x23)
//! [2 bytes] Flag (0x0A or 0xF1)
//! [6 or 18 bytes] Reserved
//! ```
//!
//! Whether the next record is a block, a separator or the start of the next
//! file section is only known after reading its marker, so the decoder keeps a
//! [`Mark`] before every marker read and rewinds to it when the section ends.
//!
//! A block that fails to inflate ends the section early. The body decoded so
//! far is kept and the section is flagged as partial.

use std::io::{Read, Seek};

use log::{debug, trace, warn};

use crate::umd::codec::compression;
use crate::umd::cursor::{Cursor, Mark};
use crate::umd::types::error::{Result, UmdError};

const BLOCK_MARKER: u8 = b'$';
const SEPARATOR_MARKER: u8 = b'#';
const BLOCK_LENGTH_BIAS: u32 = 9;

/// Separator records recognized between content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    /// Flag 0x0A, followed by 6 reserved bytes.
    Short,
    /// Flag 0xF1, followed by 18 reserved bytes.
    Long,
}

impl SeparatorKind {
    pub fn from_flag(flag: u16) -> Option<Self> {
        match flag {
            0x0A => Some(Self::Short),
            0xF1 => Some(Self::Long),
            _ => None,
        }
    }

    pub fn reserved_len(&self) -> u64 {
        match self {
            SeparatorKind::Short => 6,
            SeparatorKind::Long => 18,
        }
    }
}

/// States of the content decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentState {
    /// Expecting the first block marker. Only a block may start the section.
    ExpectBlock(Mark),
    /// A block or separator has been consumed; the next marker decides.
    ExpectMarker(Mark),
    /// A block marker was read; the block body follows.
    Block,
    /// A separator marker was read; the flag decides whether it is understood.
    PeekSeparator(Mark),
    End,
}

/// Result of decoding the content section.
#[derive(Debug, Default)]
pub struct ContentSection {
    pub body: Vec<u8>,
    pub blocks: usize,
    pub separators: usize,
    /// Set when a block failed to inflate and the body is only a prefix.
    pub partial: bool,
}

/// Drives the content state machine over a cursor.
pub struct ContentDecoder<'a, R> {
    cursor: &'a mut Cursor<R>,
    section: ContentSection,
    state: ContentState,
}

impl<'a, R: Read + Seek> ContentDecoder<'a, R> {
    pub fn new(cursor: &'a mut Cursor<R>) -> Result<Self> {
        let start = cursor.mark()?;
        Ok(Self {
            cursor,
            section: ContentSection::default(),
            state: ContentState::ExpectBlock(start),
        })
    }

    pub fn state(&self) -> ContentState {
        self.state
    }

    /// Performs one transition and returns the new state.
    pub fn step(&mut self) -> Result<ContentState> {
        self.state = match self.state {
            ContentState::ExpectBlock(mark) => match self.cursor.try_read_u8()? {
                Some(BLOCK_MARKER) => ContentState::Block,
                other => self.finish_at(mark, other)?,
            },
            ContentState::ExpectMarker(mark) => match self.cursor.try_read_u8()? {
                Some(BLOCK_MARKER) => ContentState::Block,
                Some(SEPARATOR_MARKER) => ContentState::PeekSeparator(mark),
                other => self.finish_at(mark, other)?,
            },
            ContentState::Block => self.decode_block()?,
            ContentState::PeekSeparator(mark) => self.skip_separator(mark)?,
            ContentState::End => ContentState::End,
        };
        Ok(self.state)
    }

    /// Runs the state machine to completion.
    pub fn run(mut self) -> Result<ContentSection> {
        while self.step()? != ContentState::End {}
        Ok(self.section)
    }

    fn finish_at(&mut self, mark: Mark, marker: Option<u8>) -> Result<ContentState> {
        match marker {
            Some(byte) => trace!("Content section ends at marker {:#04x}", byte),
            None => trace!("Content section ends at end of stream"),
        }
        self.cursor.rewind(mark)?;
        Ok(ContentState::End)
    }

    /// Consumes a separator after its `#` marker. A flag that is not
    /// recognized, or a separator cut off by end of stream, ends the section.
    fn skip_separator(&mut self, mark: Mark) -> Result<ContentState> {
        let flag = match self.cursor.read_u16_le("separator flag") {
            Ok(flag) => flag,
            Err(UmdError::TruncatedStream { .. }) => {
                debug!("Separator flag cut off by end of stream, ending content section");
                self.cursor.rewind(mark)?;
                return Ok(ContentState::End);
            }
            Err(e) => return Err(e),
        };
        let Some(kind) = SeparatorKind::from_flag(flag) else {
            debug!("Unrecognized separator flag {:#06x}, ending content section", flag);
            self.cursor.rewind(mark)?;
            return Ok(ContentState::End);
        };

        trace!("Skipping {:?} separator (flag {:#06x})", kind, flag);
        match self.cursor.skip(kind.reserved_len(), "separator reserved bytes") {
            Ok(()) => {
                self.section.separators += 1;
                Ok(ContentState::ExpectMarker(self.cursor.mark()?))
            }
            Err(UmdError::TruncatedStream { needed, .. }) => {
                debug!("{:?} separator is {} bytes short, ending content section", kind, needed);
                self.cursor.rewind(mark)?;
                Ok(ContentState::End)
            }
            Err(e) => Err(e),
        }
    }

    fn decode_block(&mut self) -> Result<ContentState> {
        self.cursor.skip(4, "block reserved bytes")?;
        let field = self.cursor.read_u32_le("block length")?;
        let compressed_len = field.checked_sub(BLOCK_LENGTH_BIAS).ok_or_else(|| {
            UmdError::MalformedRecord(format!(
                "content block {} declares length {} (minimum {})",
                self.section.blocks, field, BLOCK_LENGTH_BIAS
            ))
        })?;
        let payload = self.cursor.read_exact(compressed_len as usize, "compressed block")?;

        match compression::inflate(&payload) {
            Ok(data) => {
                trace!(
                    "Block {}: {} bytes -> {} bytes at body offset {}",
                    self.section.blocks,
                    payload.len(),
                    data.len(),
                    self.section.body.len()
                );
                self.section.body.extend_from_slice(&data);
                self.section.blocks += 1;
                Ok(ContentState::ExpectMarker(self.cursor.mark()?))
            }
            Err(e) => {
                warn!(
                    "Block {} could not be inflated, keeping {} decoded bytes: {}",
                    self.section.blocks,
                    self.section.body.len(),
                    e
                );
                self.section.partial = true;
                Ok(ContentState::End)
            }
        }
    }
}

pub fn parse<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<ContentSection> {
    let section = ContentDecoder::new(cursor)?.run()?;
    debug!(
        "Content section: {} blocks, {} separators, {} body bytes{}",
        section.blocks,
        section.separators,
        section.body.len(),
        if section.partial { " (partial)" } else { "" }
    );
    Ok(section)
}
