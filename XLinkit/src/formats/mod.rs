//! File format handlers
//!
//! `common` holds the byte reader, bit counting and the name dictionary
//! shared by the format modules.

pub mod common;
pub mod xlink;

// Re-export main document types
pub use xlink::{
    AssetEntry, HeaderVariant, UserEntry, XLinkDocument, XLinkReadOptions, parse_xlink_bytes, read_xlink,
};
