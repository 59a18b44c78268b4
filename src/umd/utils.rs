//! Low-level byte decoding utilities

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::{Encoding, UTF_16LE};
use log::warn;

/// Decode a 2-byte little-endian unsigned integer.
pub fn to_u16(bytes: [u8; 2]) -> u16 {
    LittleEndian::read_u16(&bytes)
}

/// Decode a 4-byte little-endian unsigned integer.
pub fn to_u32(bytes: [u8; 4]) -> u32 {
    LittleEndian::read_u32(&bytes)
}

/// Render a signature as the concatenation of each byte's lowercase hex form.
///
/// Bytes are not zero-padded, so `[0x0a, 0xff]` becomes `"aff"`. The UMD magic
/// contains no byte below 0x10, so comparing against it is unaffected.
pub fn signature_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:x}", b)).collect()
}

/// Resolve an encoding label to an `encoding_rs` encoding.
///
/// GBK and GB2312 are normalized to GB18030. Unknown labels fall back to
/// UTF-16LE, the native text encoding of UMD files.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    let label = label.trim();
    let normalized = if label.eq_ignore_ascii_case("GBK") || label.eq_ignore_ascii_case("GB2312") {
        "GB18030"
    } else {
        label
    };
    Encoding::for_label(normalized.as_bytes()).unwrap_or_else(|| {
        warn!("Unknown encoding label '{}', falling back to UTF-16LE", label);
        UTF_16LE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_integers() {
        assert_eq!(to_u16([0x0A, 0x00]), 10);
        assert_eq!(to_u16([0xF1, 0x00]), 241);
        assert_eq!(to_u16([0x34, 0x12]), 0x1234);
        assert_eq!(to_u32([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
        assert_eq!(to_u32([0xFF, 0xFF, 0xFF, 0xFF]), u32::MAX);
    }

    #[test]
    fn test_signature_hex() {
        assert_eq!(signature_hex(&[0x89, 0x9b, 0x9a, 0xde]), "899b9ade");
        assert_eq!(signature_hex(&[0x0a, 0xff]), "aff");
        assert_eq!(signature_hex(&[]), "");
    }

    #[test]
    fn test_parse_encoding() {
        assert_eq!(parse_encoding("utf-8"), encoding_rs::UTF_8);
        assert_eq!(parse_encoding("GBK"), encoding_rs::GB18030);
        assert_eq!(parse_encoding("gb2312"), encoding_rs::GB18030);
        assert_eq!(parse_encoding("utf-16le"), UTF_16LE);
        assert_eq!(parse_encoding("no-such-charset"), UTF_16LE);
    }
}
