use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::formats::common::Endianness;
use crate::formats::xlink::{HeaderVariant, XLinkDocument, XLinkReadOptions, read_xlink};

pub mod execute;
pub mod extract;
pub mod hash;
pub mod inspect;

/// Per-user header layout given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantArg(pub HeaderVariant);

impl FromStr for VariantArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<HeaderVariant>().map(VariantArg).map_err(|_| {
            let valid = HeaderVariant::ALL.map(HeaderVariant::name).join(", ");
            format!("Invalid variant '{s}'. Valid values: {valid}")
        })
    }
}

/// Options shared by every command that decodes a file
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Header layout (elink, slink, elink-botw, slink-botw)
    #[arg(short, long, default_value = "elink-botw")]
    pub variant: VariantArg,

    /// Read the file as big-endian (Wii U)
    #[arg(long)]
    pub big_endian: bool,

    /// Newline-delimited word list used to name user entries
    #[arg(long)]
    pub names: Option<PathBuf>,
}

impl DecodeArgs {
    pub fn options(&self) -> XLinkReadOptions {
        let endianness = if self.big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        };
        XLinkReadOptions::new(self.variant.0, endianness)
    }

    /// Install the word list, if any, then decode `path`.
    pub fn decode(&self, path: &Path) -> anyhow::Result<XLinkDocument> {
        if let Some(names) = &self.names {
            let words = std::fs::read_to_string(names)?;
            if !crate::formats::common::init_name_dictionary(&words) {
                tracing::warn!("Name dictionary already built, ignoring {}", names.display());
            }
        }
        Ok(read_xlink(path, &self.options())?)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an XLink file and write one JSON file per user entry
    Extract {
        /// Source XLink file
        file: PathBuf,

        /// Output directory (defaults to the file name without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        decode: DecodeArgs,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print header counts and entry summaries
    Inspect {
        /// XLink file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        decode: DecodeArgs,

        /// Also print the parameter schemas
        #[arg(long)]
        schema: bool,
    },

    /// Print the CRC32 hash of user names
    Hash {
        /// Names to hash
        #[arg(required = true)]
        names: Vec<String>,
    },
}
