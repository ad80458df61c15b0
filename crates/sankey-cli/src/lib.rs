//! CLI logic for the Sankey chart tool.
//!
//! This module reads a chart file, renders it with the configured settings
//! and writes the SVG output.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use sankey::{ChartBuilder, SankeyError};

use error_adapter::warning_reportables;

/// Run the Sankey CLI application
///
/// This function processes the input file through the Sankey pipeline
/// and writes the resulting SVG to the output file. Parse warnings are
/// logged and do not stop the run.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SankeyError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SankeyError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing chart"
    );

    // Load configuration and apply command-line overrides
    let mut app_config = config::load_config(args.config.as_ref())?;
    config::apply_overrides(&mut app_config, args);

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let builder = ChartBuilder::new(app_config);
    let mut output = builder.parse(&source)?;

    if !output.warnings.is_empty() {
        let reporter = miette::GraphicalReportHandler::new();
        for reportable in warning_reportables(&output.warnings, &source) {
            let mut writer = String::new();
            if reporter.render_report(&mut writer, &reportable).is_ok() {
                warn!("{writer}");
            }
        }
    }

    let svg = builder.render_svg(&mut output.graph)?;

    // Write output file
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
