//! XLNK file reading
//!
//! Decoding is one forward pass over the section layout:
//! header, user data table, parameter define table, local property name
//! tables, then one [`UserEntry`] per user data header. Parameter blocks,
//! conditions and names are reached through offsets from there.

use super::condition::ConditionRecord;
use super::document::{
    Action, ActionSlot, AssetEntry, ConditionEntry, Property, TriggerEntry, UserEntry, XLinkDocument,
};
use super::header::{XLinkHeader, XLinkReadOptions};
use super::names::NameTable;
use super::param_define::{ParamDefine, ParamSchema, ParamValue};
use super::params::{MaskWidth, ParamResolver};
use super::user_data::{ContainerRecord, TriggerRecord, UserDataHeader, read_user_data_table};
use super::NO_OFFSET;
use crate::error::{Error, Result};
use crate::formats::common::{ByteReader, name_dictionary};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Read and decode an XLNK file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any decode error
/// from [`parse_xlink_bytes`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_xlink<P: AsRef<Path>>(path: P, options: &XLinkReadOptions) -> Result<XLinkDocument> {
    let data = fs::read(path)?;
    parse_xlink_bytes(&data, options)
}

/// Decode XLNK data from bytes
///
/// # Errors
///
/// Returns [`Error::SignatureMismatch`] if the data does not start with
/// `XLNK`, and a structural error naming the section and byte offset if any
/// table is truncated or points outside the data.
///
/// [`Error::SignatureMismatch`]: crate::Error::SignatureMismatch
pub fn parse_xlink_bytes(data: &[u8], options: &XLinkReadOptions) -> Result<XLinkDocument> {
    let mut reader = ByteReader::new(data, options.endianness);

    let header = XLinkHeader::read(&mut reader)?;
    tracing::info!(
        "XLNK version {}, {} users, {} bytes",
        header.version,
        header.num_user,
        data.len()
    );

    let names = NameTable::new(u64::from(header.name_table_pos));
    let users = read_user_data_table(&mut reader, names, header.num_user, options.variant)?;

    let schema = ParamSchema::read(&mut reader)?;
    let asset_param_base = reader.position();

    reader.enter_section("local property name table");
    reader.seek(u64::from(header.local_property_name_ref_table_pos))?;
    let local_property_names = read_name_refs(&mut reader, names, header.num_local_property_name_ref_table)?;
    let local_enum_names = read_name_refs(&mut reader, names, header.num_local_property_enum_name_ref_table)?;
    let direct_value_base = reader.position();

    tracing::debug!(
        "Asset params at {:#x}, direct values at {:#x}, {} local properties, {} local enums",
        asset_param_base,
        direct_value_base,
        local_property_names.len(),
        local_enum_names.len()
    );

    let assembler = Assembler {
        names,
        condition_base: u64::from(header.condition_table_pos),
        asset_fields: &schema.asset_params,
        trigger_fields: &schema.trigger_params,
        asset_params: ParamResolver::new(
            &schema.asset_params,
            asset_param_base,
            direct_value_base,
            names,
            MaskWidth::Bits64,
        ),
        trigger_params: ParamResolver::new(
            &schema.trigger_params,
            u64::from(header.trigger_overwrite_param_table_pos),
            direct_value_base,
            names,
            MaskWidth::Bits32,
        ),
    };

    let entries = users
        .iter()
        .map(|user| assembler.user_entry(&mut reader, user))
        .collect::<Result<Vec<_>>>()?;

    Ok(XLinkDocument {
        header,
        schema,
        local_property_names,
        local_enum_names,
        entries,
    })
}

fn read_name_refs(reader: &mut ByteReader<'_>, names: NameTable, count: u32) -> Result<Vec<String>> {
    (0..count).map(|_| names.read_ref(reader)).collect()
}

/// Shared state for turning user data headers into entries.
struct Assembler<'s> {
    names: NameTable,
    condition_base: u64,
    asset_fields: &'s [ParamDefine],
    trigger_fields: &'s [ParamDefine],
    asset_params: ParamResolver<'s>,
    trigger_params: ParamResolver<'s>,
}

impl Assembler<'_> {
    fn user_entry(&self, reader: &mut ByteReader<'_>, user: &UserDataHeader) -> Result<UserEntry> {
        let name = name_dictionary().name_or_hash(user.hash);
        tracing::debug!(
            "User '{}': {} asset calls, {} containers, {} actions, {} properties",
            name,
            user.asset_calls.len(),
            user.containers.len(),
            user.actions.len(),
            user.properties.len()
        );

        let assets = self.asset_tree(reader, user)?;

        reader.enter_section("trigger param table");
        let action_triggers = self.solve_triggers(reader, &user.action_triggers)?;
        let property_triggers = self.solve_triggers(reader, &user.property_triggers)?;
        let always_triggers = self.solve_triggers(reader, &user.always_triggers)?;

        let mut actions = Vec::with_capacity(user.actions.len());
        for action in &user.actions {
            let triggers = inclusive_range(
                &action_triggers,
                action.trigger_start,
                action.trigger_end,
                "action trigger table",
            )?;
            actions.push((action.name.as_str(), Action { triggers: triggers.to_vec() }));
        }

        let mut action_slots = IndexMap::with_capacity(user.action_slots.len());
        for slot in &user.action_slots {
            let mut grouped = IndexMap::new();
            for (action_name, action) in
                inclusive_range(&actions, u32::from(slot.start), u32::from(slot.end), "action table")?
            {
                insert_unique(&mut grouped, action_name, action.clone(), "action");
            }
            insert_unique(&mut action_slots, &slot.name, ActionSlot { actions: grouped }, "action slot");
        }

        let mut properties = IndexMap::with_capacity(user.properties.len());
        for property in &user.properties {
            let triggers = inclusive_range(
                &property_triggers,
                property.trigger_start,
                property.trigger_end,
                "property trigger table",
            )?;
            let entry = Property {
                is_global: property.is_global != 0,
                triggers: triggers.to_vec(),
            };
            insert_unique(&mut properties, &property.name, entry, "property");
        }

        Ok(UserEntry {
            name,
            hash: user.hash,
            assets,
            action_slots,
            properties,
            always_triggers,
        })
    }

    /// Decode every asset in sorted order, then attach each to its parent.
    fn asset_tree(&self, reader: &mut ByteReader<'_>, user: &UserDataHeader) -> Result<Vec<AssetEntry>> {
        let len = user.asset_calls.len();
        let mut flat: Vec<Option<AssetEntry>> = vec![None; len];
        let mut order = Vec::with_capacity(user.sorted_asset_ids.len());

        for &sorted in &user.sorted_asset_ids {
            let index = usize::from(sorted);
            let Some(call) = user.asset_calls.get(index) else {
                return Err(index_error("sorted asset table", i64::from(sorted), len));
            };

            reader.enter_section("asset param table");
            let values = self.asset_params.resolve(reader, call.param_start_pos)?;

            let condition = if call.condition_pos == NO_OFFSET {
                None
            } else {
                let record = self.read_condition(reader, call.condition_pos)?;
                user.get_container(index).map(|container| condition_entry(container, record))
            };

            flat[index] = Some(AssetEntry {
                name: call.name.clone(),
                parent_index: call.parent_index,
                parameters: named_values(self.asset_fields, values),
                condition,
                children: Vec::new(),
            });
            order.push(index);
        }

        let mut roots = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
        for &index in &order {
            let parent = user.asset_calls[index].parent_index;
            if parent == -1 {
                roots.push(index);
                continue;
            }
            match usize::try_from(parent).ok().filter(|&p| p < len) {
                Some(parent) => children[parent].push(index),
                None => return Err(index_error("asset call table", i64::from(parent), len)),
            }
        }

        let assets: Vec<AssetEntry> = roots
            .into_iter()
            .filter_map(|root| take_subtree(&mut flat, &children, root))
            .collect();

        let orphaned = flat.iter().filter(|a| a.is_some()).count();
        if orphaned > 0 {
            tracing::warn!("Dropped {} assets not reachable from any root", orphaned);
        }

        Ok(assets)
    }

    /// The record is read even when no container claims the asset.
    fn read_condition(&self, reader: &mut ByteReader<'_>, condition_pos: u32) -> Result<ConditionRecord> {
        reader.enter_section("condition table");
        let mut guard = reader.temporary_seek(self.condition_base + u64::from(condition_pos))?;
        ConditionRecord::read(&mut guard, self.names)
    }

    fn solve_triggers<T: TriggerRecord>(
        &self,
        reader: &mut ByteReader<'_>,
        records: &[T],
    ) -> Result<Vec<TriggerEntry>> {
        records
            .iter()
            .map(|record| -> Result<TriggerEntry> {
                let base = record.base();
                let values = self.trigger_params.resolve(reader, base.override_param_pos)?;
                let (start_frame, end_frame) = match record.frames() {
                    Some((start, end)) => (Some(start as f32), Some(end as f32)),
                    None => (None, None),
                };
                Ok(TriggerEntry {
                    name: base.guid.to_string(),
                    start_frame,
                    end_frame,
                    parameters: named_values(self.trigger_fields, values),
                })
            })
            .collect()
    }
}

/// Merge a condition record with the container that owns the asset.
fn condition_entry(container: &ContainerRecord, record: ConditionRecord) -> ConditionEntry {
    let mut entry = ConditionEntry {
        kind: container.kind,
        id: container.id,
        ..ConditionEntry::default()
    };

    match record {
        ConditionRecord::Weight { weight, .. } => entry.weight = Some(weight),
        ConditionRecord::Compare {
            property_type,
            compare_type,
            value,
            is_solved,
            is_global,
            ..
        } => {
            entry.name.clone_from(&container.watch_property_name);
            entry.watch_property_id = container.watch_property_id;
            entry.value = Some(value);
            entry.property_type = Some(property_type);
            entry.compare_type = Some(compare_type);
            entry.is_solved = is_solved;
            entry.is_global = is_global;
        }
    }

    entry
}

/// Move `index` and its descendants out of `flat`, depth first. Entries
/// already taken (duplicates, cycles) are skipped.
fn take_subtree(flat: &mut [Option<AssetEntry>], children: &[Vec<usize>], index: usize) -> Option<AssetEntry> {
    let root = flat[index].take()?;
    // (asset, its index, next child to visit)
    let mut stack = vec![(root, index, 0)];
    while let Some((_, node, next)) = stack.last_mut() {
        if let Some(&child) = children[*node].get(*next) {
            *next += 1;
            if let Some(asset) = flat[child].take() {
                stack.push((asset, child, 0));
            }
            continue;
        }
        let (done, _, _) = stack.pop()?;
        match stack.last_mut() {
            Some((parent, _, _)) => parent.children.push(done),
            None => return Some(done),
        }
    }
    None
}

fn named_values(fields: &[ParamDefine], values: Vec<ParamValue>) -> IndexMap<String, ParamValue> {
    fields.iter().map(|f| f.name.clone()).zip(values).collect()
}

/// Inclusive `[start, end]` slice of `items`. A reversed range is empty.
fn inclusive_range<'a, T>(items: &'a [T], start: u32, end: u32, section: &'static str) -> Result<&'a [T]> {
    if start > end {
        return Ok(&[]);
    }
    let (first, last) = (start as usize, end as usize);
    if last >= items.len() {
        return Err(Error::InvalidIndexRange {
            section,
            start: i64::from(start),
            end: i64::from(end),
            len: items.len(),
        });
    }
    Ok(&items[first..=last])
}

fn index_error(section: &'static str, index: i64, len: usize) -> Error {
    Error::InvalidIndexRange {
        section,
        start: index,
        end: index,
        len,
    }
}

/// Insert keeping the first value for a repeated key.
fn insert_unique<V>(map: &mut IndexMap<String, V>, key: &str, value: V, kind: &str) {
    if map.contains_key(key) {
        tracing::warn!("Duplicate {} name '{}', keeping the first", kind, key);
        return;
    }
    map.insert(key.to_string(), value);
}
