//! XLNK file header and decode options

use super::XLNK_SIGNATURE;
use crate::error::{Error, Result};
use crate::formats::common::{ByteReader, Endianness};
use std::fmt;
use std::str::FromStr;

/// Known on-disk layouts of the per-user header.
///
/// The layouts only differ in the size of the block between the local
/// property references and the sorted asset index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderVariant {
    /// ELink, generic layout
    ELinkNormal,
    /// SLink, generic layout (Mario Kart 8)
    SLinkNormal,
    /// SLink, Breath of the Wild
    SLinkBotw,
    /// ELink, Breath of the Wild
    #[default]
    ELinkBotw,
}

impl HeaderVariant {
    pub const ALL: [HeaderVariant; 4] = [
        HeaderVariant::ELinkNormal,
        HeaderVariant::SLinkNormal,
        HeaderVariant::SLinkBotw,
        HeaderVariant::ELinkBotw,
    ];

    /// Bytes skipped after the local property references.
    #[must_use]
    pub fn user_header_skip(self) -> u64 {
        match self {
            HeaderVariant::ELinkNormal | HeaderVariant::ELinkBotw => 4,
            HeaderVariant::SLinkBotw => 32,
            HeaderVariant::SLinkNormal => 40,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HeaderVariant::ELinkNormal => "elink",
            HeaderVariant::SLinkNormal => "slink",
            HeaderVariant::SLinkBotw => "slink-botw",
            HeaderVariant::ELinkBotw => "elink-botw",
        }
    }
}

impl fmt::Display for HeaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HeaderVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "elink" | "elink-normal" => Ok(HeaderVariant::ELinkNormal),
            "slink" | "slink-normal" => Ok(HeaderVariant::SLinkNormal),
            "slink-botw" => Ok(HeaderVariant::SLinkBotw),
            "elink-botw" => Ok(HeaderVariant::ELinkBotw),
            _ => Err(Error::UnsupportedHeaderVariant(s.to_string())),
        }
    }
}

/// Options controlling how an XLNK file is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XLinkReadOptions {
    /// Per-user header layout.
    pub variant: HeaderVariant,
    /// Byte order of the whole file. Not auto-detected.
    pub endianness: Endianness,
}

impl XLinkReadOptions {
    #[must_use]
    pub fn new(variant: HeaderVariant, endianness: Endianness) -> Self {
        Self { variant, endianness }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: HeaderVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }
}

/// The fixed 17-field header following the XLNK magic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XLinkHeader {
    pub file_size: u32,
    pub version: u32,
    pub num_res_param: u32,
    pub num_res_asset_param: u32,
    pub num_res_trigger_overwrite_param: u32,
    /// Base of the trigger override parameter blocks
    pub trigger_overwrite_param_table_pos: u32,
    pub local_property_name_ref_table_pos: u32,
    pub num_local_property_name_ref_table: u32,
    pub num_local_property_enum_name_ref_table: u32,
    pub num_direct_value_table: u32,
    pub num_random_table: u32,
    pub num_curve_table: u32,
    pub num_curve_point_table: u32,
    pub ex_region_pos: u32,
    pub num_user: u32,
    /// Base of the condition records
    pub condition_table_pos: u32,
    /// Base of the global name table
    pub name_table_pos: u32,
}

impl XLinkHeader {
    /// Size of the magic plus the 17 header words.
    pub const SIZE: u64 = 4 + 17 * 4;

    /// Read the magic and header fields from the start of the file.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        reader.enter_section("header");
        reader.seek(0)?;
        reader.read_signature(XLNK_SIGNATURE)?;

        Ok(Self {
            file_size: reader.read_u32()?,
            version: reader.read_u32()?,
            num_res_param: reader.read_u32()?,
            num_res_asset_param: reader.read_u32()?,
            num_res_trigger_overwrite_param: reader.read_u32()?,
            trigger_overwrite_param_table_pos: reader.read_u32()?,
            local_property_name_ref_table_pos: reader.read_u32()?,
            num_local_property_name_ref_table: reader.read_u32()?,
            num_local_property_enum_name_ref_table: reader.read_u32()?,
            num_direct_value_table: reader.read_u32()?,
            num_random_table: reader.read_u32()?,
            num_curve_table: reader.read_u32()?,
            num_curve_point_table: reader.read_u32()?,
            ex_region_pos: reader.read_u32()?,
            num_user: reader.read_u32()?,
            condition_table_pos: reader.read_u32()?,
            name_table_pos: reader.read_u32()?,
        })
    }
}
