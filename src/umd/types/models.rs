//! Core data structures for UMD format components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Document type and metadata tag enumerations
//! - Chapter index entries

use std::fmt;

/// Document type code stored in the UMD header.
///
/// Codes other than 1 and 2 are kept as [`UmdType::Unrecognized`] so the
/// lookup is total and callers can still inspect the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UmdType {
    Text,
    Magazine,
    Unrecognized(u8),
}

impl UmdType {
    /// Returns the raw type code as stored in the file.
    pub fn code(&self) -> u8 {
        match self {
            UmdType::Text => 1,
            UmdType::Magazine => 2,
            UmdType::Unrecognized(code) => *code,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, UmdType::Unrecognized(_))
    }
}

impl From<u8> for UmdType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Text,
            2 => Self::Magazine,
            other => Self::Unrecognized(other),
        }
    }
}

/// Tag identifying a metadata record in the UMD header section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaType {
    Title,
    Author,
    PublishYear,
    PublishMonth,
    PublishDay,
    BookType,
    Publisher,
    Vendor,
    OriginLength,
    /// A tag value outside the known set, carrying the raw tag.
    Unrecognized(u16),
}

impl MetaType {
    /// All recognized tags, in stream order.
    ///
    /// The metadata section carries no record count, so its length is what
    /// determines how many records the reader consumes.
    pub const KNOWN: [MetaType; 9] = [
        MetaType::Title,
        MetaType::Author,
        MetaType::PublishYear,
        MetaType::PublishMonth,
        MetaType::PublishDay,
        MetaType::BookType,
        MetaType::Publisher,
        MetaType::Vendor,
        MetaType::OriginLength,
    ];

    /// Returns the numeric tag as stored in the file.
    pub fn tag(&self) -> u16 {
        match self {
            MetaType::Title => 0x02,
            MetaType::Author => 0x03,
            MetaType::PublishYear => 0x04,
            MetaType::PublishMonth => 0x05,
            MetaType::PublishDay => 0x06,
            MetaType::BookType => 0x07,
            MetaType::Publisher => 0x08,
            MetaType::Vendor => 0x09,
            MetaType::OriginLength => 0x0B,
            MetaType::Unrecognized(tag) => *tag,
        }
    }

    /// Value reported for this tag when the file did not provide one.
    pub fn default_value(&self) -> &'static str {
        match self {
            MetaType::PublishYear => "2022",
            MetaType::PublishMonth | MetaType::PublishDay => "01",
            _ => "Unknown",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MetaType::Unrecognized(_))
    }
}

impl From<u16> for MetaType {
    fn from(tag: u16) -> Self {
        Self::KNOWN
            .iter()
            .copied()
            .find(|known| known.tag() == tag)
            .unwrap_or(Self::Unrecognized(tag))
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaType::Unrecognized(tag) => write!(f, "Unrecognized({:#06x})", tag),
            known => write!(f, "{:?}", known),
        }
    }
}

/// A single entry of the chapter index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    /// Byte offset into the decompressed body where this chapter begins.
    pub offset: u32,
}
