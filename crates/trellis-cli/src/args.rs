//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout re-derivation and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Trellis diagram exporter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram model (JSON)
    #[arg(help = "Path to the input model file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Re-run container layout and routing before exporting
    #[arg(long)]
    pub relayout: bool,

    /// Also write the exported model back as JSON
    #[arg(long)]
    pub model_output: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
