//! CLI logic for the rill flowchart generator.
//!
//! This module contains the core CLI logic for the rill flowchart
//! generator.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use rill::{FlowchartBuilder, RillError};

/// Run the rill CLI application
///
/// This function processes the input script through the rill pipeline and
/// writes the resulting diagram description to stdout, or to `--output`
/// when given. File output is only written once the whole pipeline has
/// succeeded, so a failing run never leaves a partial diagram behind.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `RillError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), RillError> {
    info!(
        input_path = args.input,
        format:? = args.format;
        "Processing script"
    );

    // Load configuration; command-line switches win over the file
    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.io_nodes {
        app_config.parser.detect_io = true;
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process the script using the FlowchartBuilder API
    let builder = FlowchartBuilder::new(app_config);
    let program = builder.parse(&source)?;
    let rendered = match args.format {
        OutputFormat::Dot => builder.render_dot(&program)?,
        OutputFormat::Json => builder.render_json(&program)?,
    };

    // Write output
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Diagram description written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
