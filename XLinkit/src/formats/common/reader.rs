//! Endian-aware seekable reader over an in-memory buffer
//!
//! Every XLNK table is addressed by absolute or base-relative offsets, so the
//! reader is random-access and carries the name of the section it is decoding
//! so that failures can say where they happened.

use crate::error::{Error, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::ops::{Deref, DerefMut};

/// Byte order of every multi-byte value in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

macro_rules! read_endian {
    ($name:ident, $ty:ty, $method:ident) => {
        #[doc = concat!("Read a `", stringify!($ty), "` in the configured byte order.")]
        pub fn $name(&mut self) -> Result<$ty> {
            let offset = self.position();
            let value = match self.endian {
                Endianness::Little => self.cursor.$method::<LittleEndian>(),
                Endianness::Big => self.cursor.$method::<BigEndian>(),
            };
            value.map_err(|_| self.eof(offset))
        }
    };
}

/// Seekable reader with a configurable byte order.
#[derive(Debug)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    endian: Endianness,
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8], endian: Endianness) -> Self {
        Self {
            cursor: Cursor::new(data),
            endian,
            section: "header",
        }
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Label subsequent reads with `section`.
    pub fn enter_section(&mut self, section: &'static str) {
        self.section = section;
    }

    /// Seek to an absolute position. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.len() {
            return Err(self.malformed(pos));
        }
        self.cursor.set_position(pos);
        Ok(())
    }

    pub fn skip(&mut self, count: u64) -> Result<()> {
        let target = self.position().saturating_add(count);
        self.seek(target)
    }

    /// Advance to the next multiple of `alignment` (absolute).
    pub fn align(&mut self, alignment: u64) -> Result<()> {
        let pos = self.position();
        let rem = pos % alignment;
        if rem != 0 {
            self.seek(pos + (alignment - rem))?;
        }
        Ok(())
    }

    /// Seek to `pos` and return a guard that restores the current position
    /// when dropped, whether the reads through it succeed or fail.
    pub fn temporary_seek(&mut self, pos: u64) -> Result<SeekGuard<'_, 'a>> {
        let restore = self.position();
        self.seek(pos)?;
        Ok(SeekGuard { reader: self, restore })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.position();
        self.cursor.read_u8().map_err(|_| self.eof(offset))
    }

    read_endian!(read_u16, u16, read_u16);
    read_endian!(read_i16, i16, read_i16);
    read_endian!(read_u32, u32, read_u32);
    read_endian!(read_i32, i32, read_i32);
    read_endian!(read_u64, u64, read_u64);
    read_endian!(read_f32, f32, read_f32);

    pub fn read_u16s(&mut self, count: usize) -> Result<Vec<u16>> {
        (0..count).map(|_| self.read_u16()).collect()
    }

    pub fn read_u32s(&mut self, count: usize) -> Result<Vec<u32>> {
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Read a 4-byte magic and compare it with `expected`.
    pub fn read_signature(&mut self, expected: [u8; 4]) -> Result<()> {
        let offset = self.position();
        let mut found = [0u8; 4];
        self.cursor.read_exact(&mut found).map_err(|_| self.eof(offset))?;
        if found != expected {
            return Err(Error::SignatureMismatch { expected, found });
        }
        Ok(())
    }

    /// Read a zero-terminated UTF-8 string. A string running into the end of
    /// the buffer without a terminator ends there.
    pub fn read_cstring(&mut self) -> Result<String> {
        let start = self.position();
        let data = *self.cursor.get_ref();
        let Some(rest) = data.get(start as usize..).filter(|rest| !rest.is_empty()) else {
            return Err(self.malformed(start));
        };

        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let text = String::from_utf8_lossy(&rest[..len]).into_owned();

        // Step over the terminator when there is one
        let consumed = (len + 1).min(rest.len()) as u64;
        self.cursor.set_position(start + consumed);
        Ok(text)
    }

    fn eof(&self, offset: u64) -> Error {
        Error::UnexpectedEof {
            section: self.section,
            offset,
        }
    }

    pub(crate) fn malformed(&self, offset: u64) -> Error {
        Error::MalformedOffset {
            section: self.section,
            offset,
            len: self.len(),
        }
    }
}

/// Restores the reader position on drop.
#[derive(Debug)]
pub struct SeekGuard<'r, 'a> {
    reader: &'r mut ByteReader<'a>,
    restore: u64,
}

impl<'a> Deref for SeekGuard<'_, 'a> {
    type Target = ByteReader<'a>;

    fn deref(&self) -> &Self::Target {
        self.reader
    }
}

impl DerefMut for SeekGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reader
    }
}

impl Drop for SeekGuard<'_, '_> {
    fn drop(&mut self) {
        self.reader.cursor.set_position(self.restore);
    }
}
