//! `gno-deploy analyze` command implementation.

use std::path::Path;

use gno_deploy::{Analyzer, OutputFormat, report};

use super::display::print_warning_summary;

/// Run the analyze command.
pub fn run(
    path: &Path,
    config: Option<&Path>,
    format: &str,
    detailed: bool,
) -> Result<(), gno_deploy::Error> {
    let format: OutputFormat = format.parse()?;
    let mut config = super::load_config(path, config)?;
    if detailed {
        config.report_external_references = true;
    }

    let analysis = Analyzer::new(config).analyze_path(path)?;
    let rendered = report::render(&analysis, format, detailed)?;

    print!("{rendered}");
    if format == OutputFormat::Json {
        println!();
    }
    print_warning_summary(&analysis.diagnostics);

    Ok(())
}
