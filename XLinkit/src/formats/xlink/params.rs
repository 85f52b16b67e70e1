//! Sparse parameter resolution
//!
//! A parameter block is a presence mask followed by one reference word per
//! set bit. Each reference word packs a 24-bit offset (low bits) and an 8-bit
//! type tag (high byte). Numeric overrides live in the direct value table,
//! string overrides in the name table. Fields without an override, and
//! overrides that cannot be resolved, take the schema default.

use super::NO_OFFSET;
use super::names::NameTable;
use super::param_define::{ParamDefine, ParamSchema, ParamType, ParamValue};
use crate::error::Result;
use crate::formats::common::{ByteReader, count_set_bits_through, count_set_bits_through_64};

/// Width of the presence mask at the start of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskWidth {
    /// Trigger override blocks
    Bits32,
    /// Asset param blocks
    Bits64,
}

/// Reference word tag: value in the direct value table
const TAG_DIRECT: u32 = 0;
/// Reference word tag: string in the name table
const TAG_STRING: u32 = 1;
/// Reserved encoding
const TAG_RESERVED: u32 = 4;
const TAG_MAX: u32 = 5;

/// Resolves parameter blocks of one category against its schema.
#[derive(Debug, Clone, Copy)]
pub struct ParamResolver<'s> {
    fields: &'s [ParamDefine],
    block_base: u64,
    direct_values: u64,
    names: NameTable,
    width: MaskWidth,
}

impl<'s> ParamResolver<'s> {
    #[must_use]
    pub fn new(
        fields: &'s [ParamDefine],
        block_base: u64,
        direct_values: u64,
        names: NameTable,
        width: MaskWidth,
    ) -> Self {
        Self {
            fields,
            block_base,
            direct_values,
            names,
            width,
        }
    }

    /// One value per schema field, in field order.
    ///
    /// The cursor is restored afterwards. Only reading the mask and the
    /// reference words can fail; bad overrides fall back to defaults.
    pub fn resolve(&self, reader: &mut ByteReader<'_>, block_offset: u32) -> Result<Vec<ParamValue>> {
        if block_offset == NO_OFFSET {
            return Ok(ParamSchema::defaults(self.fields));
        }

        let mut reader = reader.temporary_seek(self.block_base + u64::from(block_offset))?;
        let mask = match self.width {
            MaskWidth::Bits32 => u64::from(reader.read_u32()?),
            MaskWidth::Bits64 => reader.read_u64()?,
        };
        let anchor = reader.position();

        let mut values = Vec::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            let index = index as u32;
            let value = match self.slot(mask, index) {
                Some(slot) => {
                    reader.seek(anchor + 4 * u64::from(slot) - 4)?;
                    let reference = reader.read_u32()?;
                    self.read_override(&mut reader, field, reference)
                }
                None => None,
            };

            values.push(value.unwrap_or_else(|| {
                tracing::trace!("Param '{}' uses default", field.name);
                field.default_value.clone()
            }));
        }

        Ok(values)
    }

    /// Physical slot of field `index`, if its presence bit is set.
    fn slot(&self, mask: u64, index: u32) -> Option<u32> {
        match self.width {
            MaskWidth::Bits32 => {
                let mask = mask as u32;
                let bit = 1u32.checked_shl(index)?;
                (mask & bit != 0).then(|| count_set_bits_through(mask, index))
            }
            MaskWidth::Bits64 => {
                let bit = 1u64.checked_shl(index)?;
                (mask & bit != 0).then(|| count_set_bits_through_64(mask, index))
            }
        }
    }

    /// Decode one reference word. `None` means "use the default".
    fn read_override(
        &self,
        reader: &mut ByteReader<'_>,
        field: &ParamDefine,
        reference: u32,
    ) -> Option<ParamValue> {
        let offset = reference & 0x00FF_FFFF;
        let tag = reference >> 24;

        if tag > TAG_MAX || tag == TAG_RESERVED {
            tracing::trace!("Param '{}' has reserved reference tag {}", field.name, tag);
            return None;
        }

        let direct = self.direct_values + u64::from(offset) * 4;
        if direct > reader.len() {
            tracing::trace!("Param '{}' direct value {:#x} past end of file", field.name, direct);
            return None;
        }

        match field.param_type {
            ParamType::UInt => read_direct(reader, direct, ByteReader::read_u32).map(ParamValue::UInt),
            ParamType::Float => read_direct(reader, direct, ByteReader::read_f32).map(ParamValue::Float),
            ParamType::Bool => read_direct(reader, direct, ByteReader::read_u32).map(|v| ParamValue::Bool(v != 0)),
            ParamType::String => self.read_name(reader, offset),
            ParamType::Enum => match tag {
                TAG_DIRECT => read_direct(reader, direct, ByteReader::read_u32).map(ParamValue::UInt),
                TAG_STRING => self.read_name(reader, offset),
                _ => None,
            },
            ParamType::Unknown => None,
        }
    }

    fn read_name(&self, reader: &mut ByteReader<'_>, offset: u32) -> Option<ParamValue> {
        self.names.resolve(reader, offset).ok().map(ParamValue::String)
    }
}

fn read_direct<'a, T>(
    reader: &mut ByteReader<'a>,
    address: u64,
    read: impl FnOnce(&mut ByteReader<'a>) -> Result<T>,
) -> Option<T> {
    reader.seek(address).ok()?;
    read(reader).ok()
}
