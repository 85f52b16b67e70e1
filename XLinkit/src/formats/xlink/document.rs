//! Decoded XLink document
//!
//! Key names follow the established XLink JSON dumps (PascalCase). Maps keep
//! file order so that exported text is stable and round-trips.

use super::condition::ConditionValue;
use super::header::XLinkHeader;
use super::param_define::{ParamSchema, ParamValue};
use crate::formats::common::float;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fully decoded XLNK file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XLinkDocument {
    pub header: XLinkHeader,
    pub schema: ParamSchema,
    /// Global local-property names
    pub local_property_names: Vec<String>,
    /// Global local-property enum names
    pub local_enum_names: Vec<String>,
    /// One entry per user data header, in table order
    pub entries: Vec<UserEntry>,
}

impl XLinkDocument {
    /// Find an entry by its resolved name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&UserEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// The effects/sounds linked to one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserEntry {
    pub name: String,
    /// CRC32 of the name as stored in the file
    #[serde(default)]
    pub hash: u32,
    /// Root assets in sorted order
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub action_slots: IndexMap<String, ActionSlot>,
    #[serde(default)]
    pub properties: IndexMap<String, Property>,
    #[serde(default)]
    pub always_triggers: Vec<TriggerEntry>,
}

impl UserEntry {
    /// Number of assets in every tree.
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets.iter().map(AssetEntry::subtree_len).sum()
    }

    #[must_use]
    pub fn trigger_count(&self) -> usize {
        let action_triggers: usize = self
            .action_slots
            .values()
            .flat_map(|slot| slot.actions.values())
            .map(|action| action.triggers.len())
            .sum();
        let property_triggers: usize = self.properties.values().map(|p| p.triggers.len()).sum();
        action_triggers + property_triggers + self.always_triggers.len()
    }
}

/// An effect or sound asset and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetEntry {
    pub name: String,
    pub parent_index: i32,
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionEntry>,
    #[serde(default)]
    pub children: Vec<AssetEntry>,
}

impl AssetEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, parent_index: i32) -> Self {
        Self {
            name: name.into(),
            parent_index,
            parameters: IndexMap::new(),
            condition: None,
            children: Vec::new(),
        }
    }

    /// This asset plus all descendants.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut len = 0;
        let mut pending = vec![self];
        while let Some(asset) = pending.pop() {
            len += 1;
            pending.extend(&asset.children);
        }
        len
    }
}

// Parent chains can be tens of thousands deep; unlink children before they
// drop so teardown does not recurse per level.
impl Drop for AssetEntry {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut asset) = pending.pop() {
            pending.append(&mut asset.children);
        }
    }
}

/// Condition under which an asset in a container is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionEntry {
    /// Kind of the owning container
    #[serde(rename = "Type")]
    pub kind: u32,
    /// Watched property of a switch container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
    #[serde(rename = "WatchPropertyID", default, skip_serializing_if = "Option::is_none")]
    pub watch_property_id: Option<i32>,
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_type: Option<u32>,
    /// Random/blend weight
    #[serde(default, skip_serializing_if = "Option::is_none", with = "float::option")]
    pub weight: Option<f32>,
    #[serde(default)]
    pub is_solved: bool,
    #[serde(default)]
    pub is_global: bool,
}

/// A group of actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionSlot {
    #[serde(default)]
    pub actions: IndexMap<String, Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    #[serde(default)]
    pub triggers: Vec<TriggerEntry>,
}

/// A watched property and the triggers fired by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub triggers: Vec<TriggerEntry>,
}

/// A trigger with its resolved override parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerEntry {
    /// Trigger GUID in decimal
    pub name: String,
    /// Action triggers only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_frame: Option<f32>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
}
