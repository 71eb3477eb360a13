//! `gno-deploy order` command implementation.

use std::path::Path;

use gno_deploy::{Analyzer, OutputFormat, report};

use super::display::print_warning_summary;

/// Run the order command.
pub fn run(path: &Path, config: Option<&Path>, format: &str) -> Result<(), gno_deploy::Error> {
    let format: OutputFormat = format.parse()?;
    let config = super::load_config(path, config)?;

    let analysis = Analyzer::new(config).analyze_path(path)?;
    let rendered = report::render_order(&analysis.order, format)?;

    print!("{rendered}");
    if format == OutputFormat::Json {
        println!();
    }
    print_warning_summary(&analysis.diagnostics);

    Ok(())
}
