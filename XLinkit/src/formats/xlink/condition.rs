//! Condition table records
//!
//! A condition decides whether an asset inside a container plays. Random and
//! blend containers (kinds 1 and 2) store a weight; switch containers (kind 0)
//! compare the watched property against a value.

use super::names::NameTable;
use crate::error::{Error, Result};
use crate::formats::common::ByteReader;
use serde::{Deserialize, Serialize};

/// Local enum index meaning "the value is a name table offset"
pub const NO_LOCAL_ENUM: i16 = -1;

/// Value a switch condition compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Int(u32),
    Name(String),
}

/// One decoded condition record.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionRecord {
    /// Kinds 1 and 2
    Weight { kind: u32, weight: f32 },
    /// Kind 0
    Compare {
        /// Stored as-is; interpretation is left to the consumer
        property_type: u32,
        compare_type: u32,
        value: ConditionValue,
        local_enum_index: i16,
        is_solved: bool,
        is_global: bool,
    },
}

impl ConditionRecord {
    /// Read the record at the cursor. The leading word is the kind of the
    /// container that owns the asset.
    pub fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        let offset = reader.position();
        let kind = reader.read_u32()?;

        match kind {
            1 | 2 => Ok(ConditionRecord::Weight {
                kind,
                weight: reader.read_f32()?,
            }),
            0 => {
                let property_type = reader.read_u32()?;
                let compare_type = reader.read_u32()?;
                let raw_value = reader.read_u32()?;
                let local_enum_index = reader.read_i16()?;
                let is_solved = reader.read_u8()? == 1;
                let is_global = reader.read_u8()? == 1;

                let value = if local_enum_index == NO_LOCAL_ENUM {
                    ConditionValue::Name(names.resolve(reader, raw_value)?)
                } else {
                    ConditionValue::Int(raw_value)
                };

                Ok(ConditionRecord::Compare {
                    property_type,
                    compare_type,
                    value,
                    local_enum_index,
                    is_solved,
                    is_global,
                })
            }
            _ => Err(Error::UnknownContainerKind { kind, offset }),
        }
    }
}
