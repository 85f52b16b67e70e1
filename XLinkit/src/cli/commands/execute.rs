//! Command execution implementations

use super::Commands;
use super::{extract, hash, inspect};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Extract {
                file,
                output,
                decode,
                quiet,
            } => extract::execute(file, output.as_deref(), decode, *quiet),
            Commands::Inspect {
                files,
                decode,
                schema,
            } => inspect::execute(files, decode, *schema),
            Commands::Hash { names } => {
                hash::execute(names);
                Ok(())
            }
        }
    }
}
