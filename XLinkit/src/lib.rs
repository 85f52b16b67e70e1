//! # XLinkit
//!
//! A pure-Rust decoder for XLink (`XLNK`) asset link files, the binary
//! tables that bind game actors to the effects and sounds they trigger.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlinkit::prelude::*;
//!
//! let options = XLinkReadOptions::default().with_variant(HeaderVariant::SLinkBotw);
//! let doc = read_xlink("Sound.bslnk", &options)?;
//! for entry in &doc.entries {
//!     println!("{}: {} assets", entry.name, entry.asset_count());
//! }
//!
//! // One JSON file per user entry
//! export_entries(&doc, "Sound/")?;
//! # Ok::<(), xlinkit::Error>(())
//! ```
//!
//! Files from big-endian consoles need
//! `options.with_endianness(Endianness::Big)`; the byte order is not detected.
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `xlinkit` command-line binary

pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{Endianness, hash_name, lookup_name};
    pub use crate::formats::xlink::{
        Action, ActionSlot, AssetEntry, ConditionEntry, ConditionValue, HeaderVariant, ParamSchema,
        ParamType, ParamValue, Property, TriggerEntry, UserEntry, XLinkDocument, XLinkHeader, XLinkReadOptions,
        export_entries, parse_user_entry, parse_xlink_bytes, read_user_entry, read_xlink,
        serialize_user_entry, write_user_entry,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
