//! `cdb`: inspect record files without knowing their record type.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod inspect;

#[derive(Debug, Parser)]
#[command(name = "cdb", version, about = "Inspect fixed-schema record files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the key count and each stored field name and size.
    Header {
        file: PathBuf,
    },
    /// Print the header plus record size, record count and trailing bytes.
    Inspect {
        file: PathBuf,
    },
    /// Print every record as per-field hex, sliced by the stored sizes.
    Dump {
        file: PathBuf,
        /// Stop after this many records.
        #[arg(long)]
        limit: Option<u64>,
    },
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Header { file } => {
            let summary = inspect::summarize(&file)?;
            inspect::write_header(&summary, &mut out)?;
        }
        Command::Inspect { file } => {
            let summary = inspect::summarize(&file)?;
            inspect::write_summary(&summary, &mut out)?;
        }
        Command::Dump { file, limit } => {
            inspect::dump(&file, limit, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}
