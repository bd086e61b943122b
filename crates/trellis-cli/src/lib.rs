//! Trellis CLI library
//!
//! This module contains the core CLI logic for exporting Trellis diagram
//! models to SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::fs;

use log::info;

use trellis::TrellisError;

/// Run the Trellis CLI application
///
/// Reads the model JSON named by `args.input`, optionally re-derives its
/// layout, and writes the resulting SVG to `args.output`. When
/// `args.model_output` is set, the exported model is written there as JSON.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON or invalid models
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TrellisError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        relayout = args.relayout;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let (model, exported) = trellis::render_json(&source, &app_config, args.relayout)?;
    exported.write_to(&args.output)?;
    info!(output_file = args.output; "SVG exported successfully");

    if let Some(path) = &args.model_output {
        fs::write(path, model.to_json()?)?;
        info!(model_file = path; "Model written");
    }

    Ok(())
}
