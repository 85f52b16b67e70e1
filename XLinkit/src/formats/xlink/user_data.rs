//! User data table
//!
//! Each user (an actor or resource that owns effects/sounds) has a header with
//! its asset call table, containers, action slots, properties and triggers.
//! Records are fixed-layout and link to each other through index ranges.

use super::header::HeaderVariant;
use super::names::NameTable;
use crate::error::{Error, Result};
use crate::formats::common::ByteReader;

/// A fixed-layout record read in bulk by [`read_section_list`].
pub trait Section: Sized {
    /// Label used in error messages.
    const SECTION: &'static str;

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self>;
}

/// Read `count` consecutive records of type `T`.
pub fn read_section_list<T: Section>(
    reader: &mut ByteReader<'_>,
    names: NameTable,
    count: u32,
) -> Result<Vec<T>> {
    reader.enter_section(T::SECTION);
    (0..count).map(|_| T::read(reader, names)).collect()
}

/// An entry of the asset call table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCallRecord {
    pub name: String,
    pub asset_id: i16,
    pub flag: u16,
    pub scratch0: i32,
    /// Index into the call table, -1 for roots
    pub parent_index: i32,
    pub scratch1: i32,
    pub name_hash: u32,
    /// Relative to the asset param table, `NO_OFFSET` for defaults
    pub param_start_pos: u32,
    /// Relative to the condition table, `NO_OFFSET` for none
    pub condition_pos: u32,
}

impl Section for AssetCallRecord {
    const SECTION: &'static str = "asset call table";

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        Ok(Self {
            name: names.read_ref(reader)?,
            asset_id: reader.read_i16()?,
            flag: reader.read_u16()?,
            scratch0: reader.read_i32()?,
            parent_index: reader.read_i32()?,
            scratch1: reader.read_i32()?,
            name_hash: reader.read_u32()?,
            param_start_pos: reader.read_u32()?,
            condition_pos: reader.read_u32()?,
        })
    }
}

/// Groups a range of call table entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub kind: u32,
    pub children_start: i32,
    /// Inclusive
    pub children_end: i32,
    /// Only set for switch containers (kind 0)
    pub watch_property_name: Option<String>,
    pub watch_property_id: Option<i32>,
    pub id: Option<i32>,
}

impl ContainerRecord {
    #[must_use]
    pub fn contains(&self, asset_index: usize) -> bool {
        let index = asset_index as i64;
        index >= i64::from(self.children_start) && index <= i64::from(self.children_end)
    }
}

impl Section for ContainerRecord {
    const SECTION: &'static str = "container table";

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        let kind = reader.read_u32()?;
        let children_start = reader.read_i32()?;
        let children_end = reader.read_i32()?;

        let (watch_property_name, watch_property_id, id) = if kind == 0 {
            (
                Some(names.read_ref(reader)?),
                Some(reader.read_i32()?),
                Some(reader.read_i32()?),
            )
        } else {
            (None, None, None)
        };

        Ok(Self {
            kind,
            children_start,
            children_end,
            watch_property_name,
            watch_property_id,
            id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSlotRecord {
    pub name: String,
    /// Inclusive range into the action table
    pub start: u16,
    pub end: u16,
}

impl Section for ActionSlotRecord {
    const SECTION: &'static str = "action slot table";

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        Ok(Self {
            name: names.read_ref(reader)?,
            start: reader.read_u16()?,
            end: reader.read_u16()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub name: String,
    /// Inclusive range into the action trigger table
    pub trigger_start: u32,
    pub trigger_end: u32,
}

impl Section for ActionRecord {
    const SECTION: &'static str = "action table";

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        Ok(Self {
            name: names.read_ref(reader)?,
            trigger_start: reader.read_u32()?,
            trigger_end: reader.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    pub name: String,
    pub is_global: u32,
    /// Inclusive range into the property trigger table
    pub trigger_start: u32,
    pub trigger_end: u32,
}

impl Section for PropertyRecord {
    const SECTION: &'static str = "property table";

    fn read(reader: &mut ByteReader<'_>, names: NameTable) -> Result<Self> {
        Ok(Self {
            name: names.read_ref(reader)?,
            is_global: reader.read_u32()?,
            trigger_start: reader.read_u32()?,
            trigger_end: reader.read_u32()?,
        })
    }
}

/// Fields shared by every trigger kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBase {
    pub guid: u32,
    pub asset_ctb_pos: u32,
    pub flag: u32,
    /// Relative to the trigger override param table, `NO_OFFSET` for defaults
    pub override_param_pos: u32,
}

/// Common view over the three trigger record kinds.
pub trait TriggerRecord {
    fn base(&self) -> &TriggerBase;

    /// Start and end frame, for action triggers.
    fn frames(&self) -> Option<(u32, u32)> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTriggerRecord {
    pub base: TriggerBase,
    pub start_frame: u32,
    pub end_frame: u32,
}

impl Section for ActionTriggerRecord {
    const SECTION: &'static str = "action trigger table";

    fn read(reader: &mut ByteReader<'_>, _names: NameTable) -> Result<Self> {
        let guid = reader.read_u32()?;
        let asset_ctb_pos = reader.read_u32()?;
        let start_frame = reader.read_u32()?;
        let end_frame = reader.read_u32()?;
        let flag = reader.read_u32()?;
        let override_param_pos = reader.read_u32()?;
        Ok(Self {
            base: TriggerBase {
                guid,
                asset_ctb_pos,
                flag,
                override_param_pos,
            },
            start_frame,
            end_frame,
        })
    }
}

impl TriggerRecord for ActionTriggerRecord {
    fn base(&self) -> &TriggerBase {
        &self.base
    }

    fn frames(&self) -> Option<(u32, u32)> {
        Some((self.start_frame, self.end_frame))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTriggerRecord {
    pub base: TriggerBase,
    pub condition: u32,
}

impl Section for PropertyTriggerRecord {
    const SECTION: &'static str = "property trigger table";

    fn read(reader: &mut ByteReader<'_>, _names: NameTable) -> Result<Self> {
        let guid = reader.read_u32()?;
        let asset_ctb_pos = reader.read_u32()?;
        let condition = reader.read_u32()?;
        let flag = reader.read_u32()?;
        let override_param_pos = reader.read_u32()?;
        Ok(Self {
            base: TriggerBase {
                guid,
                asset_ctb_pos,
                flag,
                override_param_pos,
            },
            condition,
        })
    }
}

impl TriggerRecord for PropertyTriggerRecord {
    fn base(&self) -> &TriggerBase {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlwaysTriggerRecord {
    pub base: TriggerBase,
}

impl Section for AlwaysTriggerRecord {
    const SECTION: &'static str = "always trigger table";

    fn read(reader: &mut ByteReader<'_>, _names: NameTable) -> Result<Self> {
        Ok(Self {
            base: TriggerBase {
                guid: reader.read_u32()?,
                asset_ctb_pos: reader.read_u32()?,
                flag: reader.read_u32()?,
                override_param_pos: reader.read_u32()?,
            },
        })
    }
}

impl TriggerRecord for AlwaysTriggerRecord {
    fn base(&self) -> &TriggerBase {
        &self.base
    }
}

/// Raw tables of one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDataHeader {
    /// CRC32 of the user name
    pub hash: u32,
    pub is_setup: u32,
    pub num_random_container: u32,
    pub local_property_names: Vec<String>,
    /// Call table indices in compile order
    pub sorted_asset_ids: Vec<u16>,
    pub asset_calls: Vec<AssetCallRecord>,
    pub containers: Vec<ContainerRecord>,
    pub action_slots: Vec<ActionSlotRecord>,
    pub actions: Vec<ActionRecord>,
    pub action_triggers: Vec<ActionTriggerRecord>,
    pub properties: Vec<PropertyRecord>,
    pub property_triggers: Vec<PropertyTriggerRecord>,
    pub always_triggers: Vec<AlwaysTriggerRecord>,
}

impl UserDataHeader {
    /// Read a header starting at the cursor.
    pub fn read(reader: &mut ByteReader<'_>, names: NameTable, variant: HeaderVariant) -> Result<Self> {
        reader.enter_section("user data header");
        let start = reader.position();

        let is_setup = reader.read_u32()?;
        let num_local_property = reader.read_u32()?;
        let num_call_table = reader.read_u32()?;
        let num_asset = reader.read_u32()?;
        let num_random_container = reader.read_u32()?;
        let num_action_slot = reader.read_u32()?;
        let num_action = reader.read_u32()?;
        let num_action_trigger = reader.read_u32()?;
        let num_property = reader.read_u32()?;
        let num_property_trigger = reader.read_u32()?;
        let num_always_trigger = reader.read_u32()?;
        let trigger_table_pos = reader.read_u32()?;

        let num_container = num_call_table.checked_sub(num_asset).ok_or_else(|| Error::InvalidCount {
            section: "user data header",
            message: format!("call table count {num_call_table} is below asset count {num_asset}"),
        })?;

        let local_property_names = (0..num_local_property)
            .map(|_| names.read_ref(reader))
            .collect::<Result<Vec<_>>>()?;

        reader.skip(variant.user_header_skip())?;

        let sorted_asset_ids = reader.read_u16s(num_call_table as usize)?;
        reader.align(4)?;

        let asset_calls = read_section_list(reader, names, num_call_table)?;
        let containers = read_section_list(reader, names, num_container)?;

        reader.enter_section("user data header");
        reader.seek(start + u64::from(trigger_table_pos))?;

        let action_slots = read_section_list(reader, names, num_action_slot)?;
        let actions = read_section_list(reader, names, num_action)?;
        let action_triggers = read_section_list(reader, names, num_action_trigger)?;
        let properties = read_section_list(reader, names, num_property)?;
        let property_triggers = read_section_list(reader, names, num_property_trigger)?;
        let always_triggers = read_section_list(reader, names, num_always_trigger)?;

        Ok(Self {
            hash: 0,
            is_setup,
            num_random_container,
            local_property_names,
            sorted_asset_ids,
            asset_calls,
            containers,
            action_slots,
            actions,
            action_triggers,
            properties,
            property_triggers,
            always_triggers,
        })
    }

    /// First container, in stored order, whose range covers `asset_index`.
    #[must_use]
    pub fn get_container(&self, asset_index: usize) -> Option<&ContainerRecord> {
        self.containers.iter().find(|c| c.contains(asset_index))
    }
}

/// Read the user hash list and the header behind each offset. The cursor
/// ends after the offset list, where the param define table starts.
pub fn read_user_data_table(
    reader: &mut ByteReader<'_>,
    names: NameTable,
    num_user: u32,
    variant: HeaderVariant,
) -> Result<Vec<UserDataHeader>> {
    reader.enter_section("user data table");
    let hashes = reader.read_u32s(num_user as usize)?;

    let mut users = Vec::with_capacity(hashes.len());
    for hash in hashes {
        reader.enter_section("user data table");
        let offset = reader.read_u32()?;
        let mut guard = reader.temporary_seek(u64::from(offset))?;
        let mut user = UserDataHeader::read(&mut guard, names, variant)?;
        user.hash = hash;
        users.push(user);
    }

    Ok(users)
}
