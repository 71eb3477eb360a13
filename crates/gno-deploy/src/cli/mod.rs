//! CLI command implementations.

mod display;

pub mod analyze;
pub mod cycles;
pub mod order;

use std::path::Path;

use gno_deploy::AnalyzerConfig;

/// Resolve the configuration for a run.
///
/// An explicit `--config` file wins; otherwise `gno-deploy.yaml` in `root`
/// is used if present.
fn load_config(root: &Path, explicit: Option<&Path>) -> Result<AnalyzerConfig, gno_deploy::Error> {
    match explicit {
        Some(path) => AnalyzerConfig::load(path),
        None => AnalyzerConfig::load_or_default(root),
    }
}
