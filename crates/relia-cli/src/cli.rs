use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Supply-reliability indices (SAIDI / SAIFI / ASAI) for 10 kV feeders
#[derive(Parser, Debug)]
#[command(name = "relia", author, version, about, long_about = None)]
pub struct Cli {
    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute indices for a feeder workbook and write the result tables
    Calc {
        /// Workbook directory holding one CSV per sheet
        input: PathBuf,
        /// Output directory (default: <input>_可靠性计算结果 next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Settings file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Load a workbook and print feeder structure statistics
    Inspect {
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Settings file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a commented settings template
    Init {
        #[arg(default_value = "relia.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
