//! XLink (`.belnk`/`.bslnk`) asset link format
//!
//! Binds named users (actors, objects, UI screens) to the effect and sound
//! assets they spawn, with per-asset parameter overrides, selection
//! conditions and the triggers that fire them. Decoding produces an
//! [`XLinkDocument`] whose entries export to JSON.

pub mod condition;
pub mod document;
pub mod header;
pub mod json;
pub mod names;
pub mod param_define;
pub mod params;
mod reader;
pub mod user_data;

pub use condition::{ConditionRecord, ConditionValue};
pub use document::{
    Action, ActionSlot, AssetEntry, ConditionEntry, Property, TriggerEntry, UserEntry, XLinkDocument,
};
pub use header::{HeaderVariant, XLinkHeader, XLinkReadOptions};
pub use json::{export_entries, parse_user_entry, read_user_entry, serialize_user_entry, write_user_entry};
pub use param_define::{ParamDefine, ParamSchema, ParamType, ParamValue};
pub use reader::{parse_xlink_bytes, read_xlink};

/// "XLNK" magic
pub const XLNK_SIGNATURE: [u8; 4] = *b"XLNK";

/// Offset value meaning "nothing stored" (no overrides, no condition)
pub const NO_OFFSET: u32 = u32::MAX;
