//! `xlinkit` command line: extract user entries of an XLNK file to JSON,
//! summarize its tables, or hash user names.

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "xlinkit", version)]
#[command(
    about = "XLinkit: XLink (ELink/SLink) asset link decoder",
    long_about = "Decode XLink asset link files (XLNK) used by ELink effect and SLink sound \
                  tables. `extract` writes one JSON file per user entry, `inspect` prints the \
                  header and per-user counts, `hash` prints the CRC32 of user names."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the XLinkit CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Logs go to stderr; `inspect` and `hash` own stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
