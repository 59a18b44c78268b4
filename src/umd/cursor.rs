//! Sequential read/seek cursor over a UMD byte source.
//!
//! Every section parser reads through a [`Cursor`], which turns short reads
//! into [`UmdError::TruncatedStream`] and offers the mark/rewind operation the
//! content section needs for its one-byte lookahead.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use crate::umd::types::error::{Result, UmdError};
use crate::umd::utils;

const MAX_PREALLOC: usize = 64 * 1024;

/// A captured cursor position that can be restored with [`Cursor::rewind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(u64);

impl Mark {
    pub fn position(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct Cursor<R> {
    inner: R,
}

impl<R: Read + Seek> Cursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize, context: &'static str) -> Result<Vec<u8>> {
        // Lengths come from the file; grow as data actually arrives.
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        if read < len {
            return Err(UmdError::TruncatedStream {
                context,
                needed: (len - read) as u64,
            });
        }
        Ok(buf)
    }

    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| truncated(e, context, N as u64))?;
        Ok(buf)
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        self.read_array::<1>(context).map(|[b]| b)
    }

    pub fn read_u16_le(&mut self, context: &'static str) -> Result<u16> {
        self.read_array::<2>(context).map(utils::to_u16)
    }

    pub fn read_u32_le(&mut self, context: &'static str) -> Result<u32> {
        self.read_array::<4>(context).map(utils::to_u32)
    }

    /// Reads a single byte, returning `None` at end of stream.
    pub fn try_read_u8(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Advances `len` bytes without keeping them.
    pub fn skip(&mut self, len: u64, context: &'static str) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        if skipped < len {
            return Err(UmdError::TruncatedStream {
                context,
                needed: len - skipped,
            });
        }
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn mark(&mut self) -> Result<Mark> {
        Ok(Mark(self.position()?))
    }

    pub fn rewind(&mut self, mark: Mark) -> Result<()> {
        self.seek(mark.0)
    }
}

fn truncated(err: io::Error, context: &'static str, needed: u64) -> UmdError {
    if err.kind() == ErrorKind::UnexpectedEof {
        UmdError::TruncatedStream { context, needed }
    } else {
        UmdError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    fn cursor(bytes: &[u8]) -> Cursor<IoCursor<Vec<u8>>> {
        Cursor::new(IoCursor::new(bytes.to_vec()))
    }

    #[test]
    fn test_read_exact_and_integers() {
        let mut c = cursor(&[1, 2, 3, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(c.read_exact(3, "test").unwrap(), vec![1, 2, 3]);
        assert_eq!(c.read_u16_le("test").unwrap(), 0x1234);
        assert_eq!(c.read_u32_le("test").unwrap(), 0x1234_5678);
        assert_eq!(c.position().unwrap(), 9);
        assert_eq!(c.try_read_u8().unwrap(), None);
    }

    #[test]
    fn test_short_reads_are_truncation() {
        let mut c = cursor(&[1, 2]);
        assert!(matches!(
            c.read_exact(5, "block"),
            Err(UmdError::TruncatedStream { context: "block", needed: 3 })
        ));

        let mut c = cursor(&[1]);
        assert!(matches!(
            c.read_u32_le("length"),
            Err(UmdError::TruncatedStream { needed: 4, .. })
        ));

        let mut c = cursor(&[1, 2, 3]);
        assert!(matches!(
            c.skip(10, "reserved"),
            Err(UmdError::TruncatedStream { needed: 7, .. })
        ));
    }

    #[test]
    fn test_mark_and_rewind() {
        let mut c = cursor(&[10, 20, 30, 40]);
        c.skip(1, "test").unwrap();
        let mark = c.mark().unwrap();
        assert_eq!(mark.position(), 1);
        assert_eq!(c.read_u8("test").unwrap(), 20);
        assert_eq!(c.read_u8("test").unwrap(), 30);
        c.rewind(mark).unwrap();
        assert_eq!(c.read_u8("test").unwrap(), 20);
        c.seek(3).unwrap();
        assert_eq!(c.try_read_u8().unwrap(), Some(40));
    }
}
