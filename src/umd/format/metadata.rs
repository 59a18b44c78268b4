//! Metadata section parsing.
//!
//! # Record Structure
//! ```text
//! [1 byte ] Marker ('#', not verified)
//! [2 bytes] Tag (little-endian u16, see MetaType)
//! [1 byte ] Reserved
//! [1 byte ] Record length, content length + 5
//! [N bytes] Content
//! ```
//!
//! The section has no record count. The reader consumes exactly one record per
//! recognized [`MetaType`], which assumes every file carries the full set.

use std::collections::HashMap;
use std::io::{Read, Seek};

use log::{debug, trace, warn};

use crate::umd::codec::text::TextCodec;
use crate::umd::cursor::Cursor;
use crate::umd::types::error::{Result, UmdError};
use crate::umd::types::models::MetaType;

/// Bytes counted by a metadata record's length field beyond its content.
const RECORD_LENGTH_BIAS: u8 = 5;

pub fn parse<R: Read + Seek>(
    cursor: &mut Cursor<R>,
    codec: &TextCodec,
) -> Result<HashMap<MetaType, String>> {
    let mut metadata = HashMap::with_capacity(MetaType::KNOWN.len());

    for _ in 0..MetaType::KNOWN.len() {
        let (meta_type, value) = parse_record(cursor, codec)?;
        if meta_type.is_recognized() {
            debug!("Metadata {}: '{}'", meta_type, value);
        } else {
            warn!("Unrecognized metadata tag {:#06x}, keeping value '{}'", meta_type.tag(), value);
        }
        metadata.insert(meta_type, value);
    }

    Ok(metadata)
}

fn parse_record<R: Read + Seek>(
    cursor: &mut Cursor<R>,
    codec: &TextCodec,
) -> Result<(MetaType, String)> {
    cursor.skip(1, "metadata marker")?;
    let meta_type = MetaType::from(cursor.read_u16_le("metadata tag")?);
    cursor.skip(1, "metadata reserved byte")?;

    let record_len = cursor.read_u8("metadata length")?;
    let content_len = record_len.checked_sub(RECORD_LENGTH_BIAS).ok_or_else(|| {
        UmdError::MalformedRecord(format!(
            "metadata record {} declares length {} (minimum {})",
            meta_type, record_len, RECORD_LENGTH_BIAS
        ))
    })?;
    trace!("Metadata record {}: {} content bytes", meta_type, content_len);

    let content = cursor.read_exact(content_len as usize, "metadata content")?;
    Ok((meta_type, codec.decode(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn record(tag: u16, content: &[u8]) -> Vec<u8> {
        let mut buf = vec![b'#'];
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.push(0);
        buf.push(content.len() as u8 + 5);
        buf.extend_from_slice(content);
        buf
    }

    fn full_section(values: &[(u16, &str)]) -> Vec<u8> {
        values.iter().flat_map(|(tag, v)| record(*tag, &utf16le(v))).collect()
    }

    const SAMPLE: [(u16, &str); 9] = [
        (2, "红楼梦"),
        (3, "曹雪芹"),
        (4, "1791"),
        (5, "12"),
        (6, "24"),
        (7, "小说"),
        (8, "程伟元"),
        (9, "umd-maker"),
        (0x0B, "12345"),
    ];

    #[test]
    fn test_parse_full_section() {
        let mut buf = full_section(&SAMPLE);
        buf.push(b'#');
        let mut cursor = Cursor::new(IoCursor::new(buf));
        let metadata = parse(&mut cursor, &TextCodec::default()).unwrap();

        assert_eq!(metadata.len(), 9);
        assert_eq!(metadata[&MetaType::Title], "红楼梦");
        assert_eq!(metadata[&MetaType::Author], "曹雪芹");
        assert_eq!(metadata[&MetaType::Vendor], "umd-maker");
        assert_eq!(metadata[&MetaType::OriginLength], "12345");
        // Exactly nine records consumed; the trailing marker is untouched.
        assert_eq!(cursor.try_read_u8().unwrap(), Some(b'#'));
    }

    #[test]
    fn test_unrecognized_tag_does_not_replace_known_entries() {
        let mut values = SAMPLE;
        values[8] = (0x0A, "garbage");
        let mut cursor = Cursor::new(IoCursor::new(full_section(&values)));
        let metadata = parse(&mut cursor, &TextCodec::default()).unwrap();

        assert_eq!(metadata[&MetaType::Unrecognized(0x0A)], "garbage");
        assert!(!metadata.contains_key(&MetaType::OriginLength));
        assert_eq!(metadata[&MetaType::Title], "红楼梦");
    }

    #[test]
    fn test_custom_decoder_applies_to_values() {
        let mut cursor = Cursor::new(IoCursor::new(full_section(&SAMPLE)));
        let codec = TextCodec::custom(|bytes| format!("len={}", bytes.len()));
        let metadata = parse(&mut cursor, &codec).unwrap();
        assert_eq!(metadata[&MetaType::PublishYear], "len=8");
    }

    #[test]
    fn test_empty_value() {
        let mut buf = record(2, &[]);
        buf.extend(full_section(&SAMPLE[1..]));
        let mut cursor = Cursor::new(IoCursor::new(buf));
        let metadata = parse(&mut cursor, &TextCodec::default()).unwrap();
        assert_eq!(metadata[&MetaType::Title], "");
    }

    #[test]
    fn test_length_below_bias_is_malformed() {
        let mut buf = vec![b'#', 2, 0, 0, 3];
        buf.extend_from_slice(&[0; 8]);
        let mut cursor = Cursor::new(IoCursor::new(buf));
        assert!(matches!(
            parse(&mut cursor, &TextCodec::default()),
            Err(UmdError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_missing_records_are_truncation() {
        let mut cursor = Cursor::new(IoCursor::new(full_section(&SAMPLE[..4])));
        assert!(matches!(
            parse(&mut cursor, &TextCodec::default()),
            Err(UmdError::TruncatedStream { .. })
        ));
    }
}
