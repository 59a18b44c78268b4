//! Decompression of UMD content blocks.
//!
//! Every content block is an independent zlib stream. The inflated size is not
//! stored anywhere in the container, so the output grows until the stream
//! reports its end.

use flate2::{Decompress, FlushDecompress, Status};
use log::trace;

use crate::umd::types::error::{Result, UmdError};

const MIN_GROWTH: usize = 1024;

/// Inflates a complete zlib stream.
///
/// # Errors
/// Returns [`UmdError::DecompressionError`] if the stream is corrupt or ends
/// before the zlib end-of-stream marker.
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>> {
    trace!("Inflating zlib block: {} bytes compressed", payload.len());

    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(payload.len().saturating_mul(4).max(MIN_GROWTH));

    loop {
        if output.len() == output.capacity() {
            output.reserve(output.capacity().max(MIN_GROWTH));
        }

        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let input = &payload[before_in as usize..];

        let status = inflater
            .decompress_vec(input, &mut output, FlushDecompress::None)
            .map_err(|e| UmdError::DecompressionError(format!("Zlib decompression failed: {}", e)))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if inflater.total_in() == before_in && inflater.total_out() == before_out {
                    return Err(UmdError::DecompressionError(format!(
                        "Zlib stream ended early after {} of {} input bytes",
                        before_in,
                        payload.len()
                    )));
                }
            }
        }
    }

    trace!("Inflated {} bytes -> {} bytes", payload.len(), output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_inflate_small_block() {
        let compressed = zlib(b"hello umd");
        assert_eq!(inflate(&compressed).unwrap(), b"hello umd");
    }

    #[test]
    fn test_inflate_grows_output() {
        // Highly compressible input inflates far beyond the initial capacity.
        let data = vec![b'x'; 200_000];
        let compressed = zlib(&data);
        assert!(compressed.len() < 1_000);
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_inflate_empty_stream() {
        let compressed = zlib(b"");
        assert!(inflate(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_inflate_rejects_garbage() {
        assert!(matches!(
            inflate(&[0xFF; 16]),
            Err(UmdError::DecompressionError(_))
        ));
    }

    #[test]
    fn test_inflate_rejects_truncated_stream() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let compressed = zlib(&data);
        let cut = &compressed[..compressed.len() / 2];
        assert!(matches!(inflate(cut), Err(UmdError::DecompressionError(_))));
    }
}
