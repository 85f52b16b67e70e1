//! CLI command for exporting XLink entries to JSON

use std::path::{Path, PathBuf};

use super::DecodeArgs;
use crate::formats::xlink::export_entries;

pub fn execute(file: &Path, output: Option<&Path>, decode: &DecodeArgs, quiet: bool) -> anyhow::Result<()> {
    let destination = match output {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(file)?,
    };

    let doc = decode.decode(file)?;
    let written = export_entries(&doc, &destination)?;

    if !quiet {
        println!(
            "Extracted {} entries from {} to {}",
            written.len(),
            file.display(),
            destination.display()
        );
        for path in &written {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

/// `Sound.bslnk` → `Sound/` next to the input
fn default_output_dir(file: &Path) -> anyhow::Result<PathBuf> {
    let Some(stem) = file.file_stem() else {
        anyhow::bail!("Cannot derive an output directory from {}", file.display());
    };
    Ok(file.with_file_name(stem))
}
