//! Name table resolution
//!
//! Strings live in zero-terminated blobs; records refer to them by a 32-bit
//! byte offset from the blob start.

use crate::error::Result;
use crate::formats::common::ByteReader;

/// A string blob anchored at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTable {
    base: u64,
}

impl NameTable {
    #[must_use]
    pub fn new(base: u64) -> Self {
        Self { base }
    }

    /// Read a 32-bit offset at the cursor and resolve it. The cursor ends up
    /// just past the offset.
    pub fn read_ref(&self, reader: &mut ByteReader<'_>) -> Result<String> {
        let offset = reader.read_u32()?;
        self.resolve(reader, offset)
    }

    /// Resolve `offset` without moving the cursor.
    pub fn resolve(&self, reader: &mut ByteReader<'_>, offset: u32) -> Result<String> {
        let address = self.base + u64::from(offset);
        if address >= reader.len() {
            return Err(reader.malformed(address));
        }
        let mut guard = reader.temporary_seek(address)?;
        guard.read_cstring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::common::Endianness;

    fn sample() -> Vec<u8> {
        // offset word (4), then blob at 4: "Foo\0Bar\0"
        let mut data = 4u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"Foo\0Bar\0");
        data
    }

    #[test]
    fn test_resolve_keeps_cursor() {
        let data = sample();
        let mut reader = ByteReader::new(&data, Endianness::Little);
        let names = NameTable::new(4);
        assert_eq!(names.resolve(&mut reader, 4).unwrap(), "Bar");
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_ref_advances_past_offset() {
        let data = sample();
        let mut reader = ByteReader::new(&data, Endianness::Little);
        let names = NameTable::new(0);
        // Offset 4 from base 0 points at "Foo"
        assert_eq!(names.read_ref(&mut reader).unwrap(), "Foo");
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_past_end_is_malformed() {
        let data = sample();
        let mut reader = ByteReader::new(&data, Endianness::Little);
        reader.enter_section("condition table");
        let names = NameTable::new(4);
        let err = names.resolve(&mut reader, 100).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedOffset { section: "condition table", offset: 104, len: 12 }
        ));
    }
}
