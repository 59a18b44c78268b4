//! UMD file header validation.
//!
//! # Header Structure
//! ```text
//! [4 bytes] Magic signature (hex 899b9ade)
//! [5 bytes] Reserved
//! [1 byte ] Document type code (1 = text, 2 = magazine)
//! [2 bytes] Reserved
//! ```

use std::io::{Read, Seek};

use log::{debug, info, trace};

use crate::umd::cursor::Cursor;
use crate::umd::types::error::{Result, UmdError};
use crate::umd::types::models::UmdType;
use crate::umd::utils;

/// Hex rendering of the four magic bytes every UMD file starts with.
pub const UMD_MAGIC: &str = "899b9ade";

/// Reads the magic signature and reports whether it matches.
///
/// A source shorter than the signature is simply not a UMD file.
pub fn check_magic<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<bool> {
    let signature = match cursor.read_array::<4>("magic signature") {
        Ok(bytes) => bytes,
        Err(UmdError::TruncatedStream { .. }) => {
            debug!("Source shorter than the UMD magic signature");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    let hex = utils::signature_hex(&signature);
    trace!("File signature: {}", hex);
    Ok(hex == UMD_MAGIC)
}

/// Validates the header and returns the document type.
///
/// Returns `Ok(None)` when the magic signature does not match; the cursor is
/// then left just past the bytes that were inspected.
pub fn parse<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Option<UmdType>> {
    info!("Parsing UMD header");

    if !check_magic(cursor)? {
        debug!("Magic signature mismatch, not a UMD file");
        return Ok(None);
    }

    cursor.skip(5, "header reserved bytes")?;
    let umd_type = UmdType::from(cursor.read_u8("document type")?);
    cursor.skip(2, "header reserved bytes")?;

    debug!("Document type: {:?} (code {})", umd_type, umd_type.code());
    Ok(Some(umd_type))
}
