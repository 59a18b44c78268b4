//! Chapter index parsing.
//!
//! # Section Structure
//! ```text
//! Offset table:
//! [1 byte ] Marker
//! [2 bytes] Signature (unused)
//! [11 bytes] Reserved
//! [4 bytes] Length field L, chapter count = (L - 9) / 4
//! [4 bytes x count] Chapter offsets into the decompressed body
//!
//! Title table:
//! [1 byte ] Marker
//! [2 bytes] Signature (unused)
//! [11 bytes] Reserved
//! [4 bytes] Total title length (unused)
//! per chapter: [1 byte] title length, [N bytes] UTF-16LE title
//! ```

use std::io::{Read, Seek};

use log::{debug, trace};

use crate::umd::codec::text;
use crate::umd::cursor::Cursor;
use crate::umd::types::error::{Result, UmdError};
use crate::umd::types::models::Chapter;

const OFFSET_TABLE_BIAS: u32 = 9;
const OFFSET_WIDTH: u32 = 4;

pub fn parse<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Vec<Chapter>> {
    let offsets = parse_offsets(cursor)?;
    debug!("Chapter offset table: {} entries", offsets.len());

    cursor.skip(1, "title table marker")?;
    cursor.skip(2, "title table signature")?;
    cursor.skip(11, "title table reserved bytes")?;
    cursor.skip(4, "title table length")?;

    let mut chapters = Vec::with_capacity(offsets.len());
    for (index, offset) in offsets.into_iter().enumerate() {
        let title_len = cursor.read_u8("chapter title length")?;
        let title_bytes = cursor.read_exact(title_len as usize, "chapter title")?;
        let title = text::decode_title(&title_bytes);
        trace!("Chapter {}: offset={}, title='{}'", index, offset, title);
        chapters.push(Chapter { title, offset });
    }

    Ok(chapters)
}

fn parse_offsets<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Vec<u32>> {
    cursor.skip(1, "offset table marker")?;
    let signature = cursor.read_u16_le("offset table signature")?;
    cursor.skip(11, "offset table reserved bytes")?;

    let field = cursor.read_u32_le("offset table length")?;
    let count = chapter_count(field)?;
    trace!("Offset table signature={:#06x}, length field={}, chapters={}", signature, field, count);

    let mut offsets: Vec<u32> = Vec::with_capacity(count.min(4096) as usize);
    for index in 0..count {
        let offset = cursor.read_u32_le("chapter offset")?;
        if let Some(&previous) = offsets.last() {
            if offset < previous {
                return Err(UmdError::MalformedRecord(format!(
                    "chapter {} offset {} precedes chapter {} offset {}",
                    index,
                    offset,
                    index - 1,
                    previous
                )));
            }
        }
        offsets.push(offset);
    }
    Ok(offsets)
}

/// Number of chapters described by an offset table length field.
fn chapter_count(field: u32) -> Result<u32> {
    let table_len = field.checked_sub(OFFSET_TABLE_BIAS).ok_or_else(|| {
        UmdError::MalformedRecord(format!(
            "offset table length {} is below the {} byte minimum",
            field, OFFSET_TABLE_BIAS
        ))
    })?;
    if table_len % OFFSET_WIDTH != 0 {
        return Err(UmdError::MalformedRecord(format!(
            "offset table length {} does not describe whole 4-byte offsets",
            field
        )));
    }
    Ok(table_len / OFFSET_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn section(offsets: &[u32], titles: &[&str]) -> Vec<u8> {
        let mut buf = vec![b'#', 0x83, 0x00];
        buf.extend_from_slice(&[0; 11]);
        buf.extend_from_slice(&(offsets.len() as u32 * 4 + 9).to_le_bytes());
        for offset in offsets {
            buf.extend_from_slice(&offset.to_le_bytes());
        }
        let encoded: Vec<Vec<u8>> = titles.iter().map(|t| utf16le(t)).collect();
        let total: usize = encoded.iter().map(|t| t.len() + 1).sum();
        buf.extend_from_slice(&[b'#', 0x84, 0x00]);
        buf.extend_from_slice(&[0; 11]);
        buf.extend_from_slice(&(total as u32 + 9).to_le_bytes());
        for title in encoded {
            buf.push(title.len() as u8);
            buf.extend(title);
        }
        buf
    }

    #[test]
    fn test_parse_chapters() {
        let mut buf = section(&[0, 120, 120, 4000], &["序", "第一回", "第二回", "Epilogue"]);
        buf.push(b'$');
        let mut cursor = Cursor::new(IoCursor::new(buf));
        let chapters = parse(&mut cursor).unwrap();

        assert_eq!(chapters.len(), 4);
        assert_eq!(chapters[0], Chapter { title: "序".to_string(), offset: 0 });
        assert_eq!(chapters[1].title, "第一回");
        assert_eq!(chapters[2].offset, 120);
        assert_eq!(chapters[3].title, "Epilogue");
        assert_eq!(chapters[3].offset, 4000);
        assert_eq!(cursor.try_read_u8().unwrap(), Some(b'$'));
    }

    #[test]
    fn test_parse_empty_index() {
        let mut cursor = Cursor::new(IoCursor::new(section(&[], &[])));
        assert!(parse(&mut cursor).unwrap().is_empty());
    }

    #[test]
    fn test_chapter_count() {
        assert_eq!(chapter_count(9).unwrap(), 0);
        assert_eq!(chapter_count(13).unwrap(), 1);
        assert_eq!(chapter_count(49).unwrap(), 10);
        assert!(matches!(chapter_count(8), Err(UmdError::MalformedRecord(_))));
        assert!(matches!(chapter_count(11), Err(UmdError::MalformedRecord(_))));
    }

    #[test]
    fn test_decreasing_offsets_are_malformed() {
        let mut cursor = Cursor::new(IoCursor::new(section(&[0, 50, 10], &["a", "b", "c"])));
        assert!(matches!(parse(&mut cursor), Err(UmdError::MalformedRecord(_))));
    }

    #[test]
    fn test_missing_titles_are_truncation() {
        let mut buf = section(&[0, 10], &["a", "b"]);
        buf.truncate(buf.len() - 3);
        let mut cursor = Cursor::new(IoCursor::new(buf));
        assert!(matches!(parse(&mut cursor), Err(UmdError::TruncatedStream { .. })));
    }
}
