//! The sequential byte-reader contract the driver consumes (spec.md section
//! 6): `size`, `eof`, `get`, `rewind`. Kept generic over `Read + Seek` the
//! same way the teacher generalizes `td0`/`lzw` over `Read + Seek` /
//! `Write + Seek` rather than hard-coding `std::fs::File`, so tests can feed
//! a `Cursor<&[u8]>` without touching the filesystem.

use std::io::{Read, Seek, SeekFrom};

pub trait ByteReader {
    fn size(&self) -> u64;
    fn eof(&self) -> bool;
    /// Next byte, or `None` at end of stream.
    fn get(&mut self) -> Option<u8>;
    /// Seek back to the start of the stream; must replay the same bytes.
    fn rewind(&mut self);
}

/// `ByteReader` over any `Read + Seek`, e.g. `std::fs::File` or
/// `std::io::Cursor<&[u8]>`.
pub struct FileByteReader<R> {
    inner: R,
    size: u64,
    pos: u64,
}

impl<R: Read + Seek> FileByteReader<R> {
    pub fn new(mut inner: R) -> std::io::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, size, pos: 0 })
    }
}

impl<R: Read + Seek> ByteReader for FileByteReader<R> {
    fn size(&self) -> u64 {
        self.size
    }

    fn eof(&self) -> bool {
        self.pos >= self.size
    }

    fn get(&mut self) -> Option<u8> {
        if self.eof() {
            return None;
        }
        let mut buf = [0u8; 1];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.pos += 1;
                Some(buf[0])
            }
            Err(_) => None,
        }
    }

    fn rewind(&mut self) {
        if self.inner.seek(SeekFrom::Start(0)).is_ok() {
            self.pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_and_rewinds() {
        let mut r = FileByteReader::new(Cursor::new(b"abc".to_vec())).unwrap();
        assert_eq!(r.size(), 3);
        assert_eq!(r.get(), Some(b'a'));
        assert_eq!(r.get(), Some(b'b'));
        assert_eq!(r.get(), Some(b'c'));
        assert!(r.eof());
        assert_eq!(r.get(), None);
        r.rewind();
        assert!(!r.eof());
        assert_eq!(r.get(), Some(b'a'));
    }
}
