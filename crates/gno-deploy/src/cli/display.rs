//! Common display utilities for CLI commands.

use colored::Colorize;
use gno_deploy::{Diagnostics, Severity};

/// Print a one-line warning summary to stderr when diagnostics need attention.
///
/// Reports on stdout are left untouched so they can be piped.
pub fn print_warning_summary(diagnostics: &Diagnostics) {
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    if warnings == 0 {
        return;
    }

    eprintln!(
        "{}: {} diagnostic{} need attention",
        "warning".yellow().bold(),
        warnings,
        if warnings == 1 { "" } else { "s" }
    );
}
