//! Parameter define table
//!
//! The schema for every sparse parameter block. Field order inside a category
//! is the bit order of the presence masks that refer to it.

use super::names::NameTable;
use crate::error::{Error, Result};
use crate::formats::common::{ByteReader, float};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of one raw define record: name offset, type tag, default slot
pub const PARAM_DEFINE_SIZE: u64 = 12;

/// Primitive type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    UInt = 0,
    Float = 1,
    Bool = 2,
    Enum = 3,
    String = 4,
    Unknown = 5,
}

impl ParamType {
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(ParamType::UInt),
            1 => Some(ParamType::Float),
            2 => Some(ParamType::Bool),
            3 => Some(ParamType::Enum),
            4 => Some(ParamType::String),
            5 => Some(ParamType::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ParamType::UInt => "UInt",
            ParamType::Float => "Float",
            ParamType::Bool => "Bool",
            ParamType::Enum => "Enum",
            ParamType::String => "String",
            ParamType::Unknown => "Unknown",
        }
    }
}

/// A resolved parameter value.
///
/// Serialized untagged so the interchange text carries plain scalars.
/// Non-finite floats use the marker object from [`float`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    UInt(u32),
    Float(#[serde(with = "float")] f32),
    Bool(bool),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::UInt(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::String(v) => write!(f, "\"{v}\""),
        }
    }
}

/// One field of a parameter category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParamDefine {
    pub name: String,
    #[serde(rename = "Type")]
    pub param_type: ParamType,
    pub default_value: ParamValue,
}

impl ParamDefine {
    /// Read one 12-byte define record. Strings resolve against `names`, the
    /// table's own string blob.
    pub fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        let name_offset = reader.read_u32()?;
        let tag_offset = reader.position();
        let tag = reader.read_u32()?;
        let param_type = ParamType::from_tag(tag).ok_or(Error::UnknownParamType {
            tag,
            offset: tag_offset,
        })?;

        let default_value = match param_type {
            // Integer defaults are stored signed; keep the raw bits
            ParamType::UInt | ParamType::Enum | ParamType::Unknown => {
                ParamValue::UInt(reader.read_i32()? as u32)
            }
            ParamType::Bool => ParamValue::Bool(reader.read_i32()? != 0),
            ParamType::Float => ParamValue::Float(reader.read_f32()?),
            ParamType::String => {
                let offset = reader.read_u32()?;
                ParamValue::String(names.resolve(reader, offset)?)
            }
        };

        let name = names.resolve(reader, name_offset)?;

        Ok(Self {
            name,
            param_type,
            default_value,
        })
    }
}

/// The three parameter categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParamSchema {
    /// Parsed but not referenced by the decoded entries
    pub user_params: Vec<ParamDefine>,
    pub asset_params: Vec<ParamDefine>,
    pub trigger_params: Vec<ParamDefine>,
}

impl ParamSchema {
    /// Read the table at the cursor. Leaves the cursor at the end of the
    /// section as given by its size word, which may include padding.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        reader.enter_section("param define table");
        let section_start = reader.position();

        let section_size = reader.read_u32()?;
        let num_user = reader.read_u32()?;
        let num_asset = reader.read_u32()?;
        let _reserved = reader.read_u32()?;
        let num_trigger = reader.read_u32()?;

        let total = u64::from(num_user) + u64::from(num_asset) + u64::from(num_trigger);
        let names = NameTable::new(reader.position() + total * PARAM_DEFINE_SIZE);

        let user_params = read_defines(reader, names, num_user)?;
        let asset_params = read_defines(reader, names, num_asset)?;
        let trigger_params = read_defines(reader, names, num_trigger)?;

        reader.seek(section_start + u64::from(section_size))?;

        tracing::debug!(
            "Param define table: {} user, {} asset, {} trigger params",
            user_params.len(),
            asset_params.len(),
            trigger_params.len()
        );

        Ok(Self {
            user_params,
            asset_params,
            trigger_params,
        })
    }

    /// Defaults of a category in field order.
    #[must_use]
    pub fn defaults(fields: &[ParamDefine]) -> Vec<ParamValue> {
        fields.iter().map(|f| f.default_value.clone()).collect()
    }
}

fn read_defines(reader: &mut ByteReader<'_>, names: NameTable, count: u32) -> Result<Vec<ParamDefine>> {
    (0..count).map(|_| ParamDefine::read(reader, names)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endianness;

    fn put(data: &mut Vec<u8>, v: u32) {
        data.extend_from_slice(&v.to_le_bytes());
    }

    /// Schema with one user, one asset and one trigger param, plus 8 bytes of padding
    fn sample_schema() -> Vec<u8> {
        let mut records = Vec::new();
        // user: "Mode" uint default -1
        put(&mut records, 0);
        put(&mut records, 0);
        put(&mut records, u32::MAX);
        // asset: "Volume" float default 1.0
        put(&mut records, 5);
        put(&mut records, 1);
        put(&mut records, 1.0f32.to_bits());
        // trigger: "Bone" string default "Root"
        put(&mut records, 12);
        put(&mut records, 4);
        put(&mut records, 17);

        let blob = b"Mode\0Volume\0Bone\0Root\0";

        let mut data = Vec::new();
        let size = 20 + records.len() + blob.len() + 8;
        put(&mut data, size as u32);
        put(&mut data, 1);
        put(&mut data, 1);
        put(&mut data, 0xDEAD);
        put(&mut data, 1);
        data.extend_from_slice(&records);
        data.extend_from_slice(blob);
        data.extend_from_slice(&[0; 8]);
        // trailing byte after the section
        data.push(0xAA);
        data
    }

    #[test]
    fn test_read_schema() {
        let data = sample_schema();
        let mut reader = ByteReader::new(&data, Endianness::Little);
        let schema = ParamSchema::read(&mut reader).unwrap();

        assert_eq!(schema.user_params[0].name, "Mode");
        assert_eq!(schema.user_params[0].default_value, ParamValue::UInt(u32::MAX));
        assert_eq!(schema.asset_params[0].name, "Volume");
        assert_eq!(schema.asset_params[0].default_value, ParamValue::Float(1.0));
        assert_eq!(schema.trigger_params[0].param_type, ParamType::String);
        assert_eq!(schema.trigger_params[0].default_value, ParamValue::String("Root".into()));

        // Cursor lands after the padding, on the trailing byte
        assert_eq!(reader.position(), data.len() as u64 - 1);
    }

    #[test]
    fn test_unknown_type_tag() {
        let mut data = sample_schema();
        // asset record type tag lives at 20 + 12 + 4
        data[36..40].copy_from_slice(&9u32.to_le_bytes());
        let mut reader = ByteReader::new(&data, Endianness::Little);
        let err = ParamSchema::read(&mut reader).unwrap_err();
        assert!(matches!(err, Error::UnknownParamType { tag: 9, offset: 36 }));
    }

    #[test]
    fn test_name_past_end_is_malformed() {
        let mut data = sample_schema();
        // user record name offset
        data[20..24].copy_from_slice(&0x1000u32.to_le_bytes());
        let mut reader = ByteReader::new(&data, Endianness::Little);
        let err = ParamSchema::read(&mut reader).unwrap_err();
        assert!(matches!(err, Error::MalformedOffset { section: "param define table", .. }));
    }
}
