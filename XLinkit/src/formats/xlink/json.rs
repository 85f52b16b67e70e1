//! JSON export and import of user entries
//!
//! One file per user entry, shaped like existing XLink JSON dumps so the
//! output can be diffed against them.

use super::document::{UserEntry, XLinkDocument};
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize a user entry to indented JSON
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn serialize_user_entry(entry: &UserEntry) -> Result<String> {
    Ok(serde_json::to_string_pretty(entry)?)
}

/// Write a user entry to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_user_entry<P: AsRef<Path>>(entry: &UserEntry, path: P) -> Result<()> {
    let json = serialize_user_entry(entry)?;
    fs::write(path, json)?;
    Ok(())
}

/// Parse a user entry from a JSON string
///
/// Asset trees nest two JSON levels per asset, so the default recursion
/// limit is lifted and the stack grows on demand instead.
///
/// # Errors
/// Returns an error if the JSON is malformed.
pub fn parse_user_entry(content: &str) -> Result<UserEntry> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let entry = UserEntry::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(entry)
}

/// Read a user entry from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid JSON.
pub fn read_user_entry<P: AsRef<Path>>(path: P) -> Result<UserEntry> {
    let content = fs::read_to_string(path)?;
    parse_user_entry(&content)
}

/// Write every entry of `doc` as `<name>.json` into `dir`, creating it if
/// needed. Returns the written paths in entry order.
///
/// # Errors
/// Returns an error if the directory cannot be created or a file fails to write.
pub fn export_entries<P: AsRef<Path>>(doc: &XLinkDocument, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(doc.entries.len());
    for entry in &doc.entries {
        let path = dir.join(format!("{}.json", file_stem(&entry.name)));
        write_user_entry(entry, &path)?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }

    tracing::info!("Exported {} entries to {}", written.len(), dir.display());
    Ok(written)
}

/// Entry names are free text; keep them inside the output directory.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
