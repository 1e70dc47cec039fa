use crate::core::report::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "placer")]
#[command(about = "Picks the next place from a roster, favouring the ones furthest behind")]
pub struct CliConfig {
    /// Directory holding the roster and records
    #[arg(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file (defaults to placer.toml in the directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible selection
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Select the next place and record it (the default)
    Next {
        /// Show the selection without writing a placement file
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the running total of every place
    Summary {
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
    /// Print the place named by a placement file
    Print { path: Option<PathBuf> },
    /// Print the most recent placement
    Peek,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Next { dry_run: false })
    }
}
