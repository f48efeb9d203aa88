//! Command-line argument definitions for the rill CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output format,
//! configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the rill flowchart generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input script
    #[arg(help = "Path to the input script file")]
    pub input: String,

    /// Path to the output file; written to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "dot")]
    pub format: OutputFormat,

    /// Render `input()` assignments and `print()` calls as input/output boxes
    #[arg(long)]
    pub io_nodes: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Supported output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Graphviz DOT text
    Dot,
    /// JSON graph description
    Json,
}
