//! Report export in JSON and text form.
//!
//! Export is pure formatting; nothing here mutates the analysis.
//!
//! Submodules:
//! - [`json`]: machine-readable report for deployment pipelines
//! - [`text`]: human-readable report, with an optional detailed mode

pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::Analysis;
use crate::error::{Error, Result};
use crate::order::DeploymentOrder;

pub use json::{order_to_json, to_json};
pub use text::{order_to_text, to_text};

/// Supported report formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Line-oriented human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!(
                "unsupported output format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render the full analysis in the requested format.
///
/// `detailed` only affects text output; JSON always carries every field.
pub fn render(analysis: &Analysis, format: OutputFormat, detailed: bool) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(analysis),
        OutputFormat::Text => Ok(to_text(analysis, detailed)),
    }
}

/// Render only the deployment order in the requested format.
pub fn render_order(order: &DeploymentOrder, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => order_to_json(order),
        OutputFormat::Text => Ok(order_to_text(order)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analyzer, AnalyzerConfig, SourceFile};

    fn analysis(sources: &[(&str, &str)]) -> Analysis {
        let sources: Vec<SourceFile> = sources
            .iter()
            .map(|(path, content)| SourceFile::new(*path, *content))
            .collect();
        Analyzer::new(AnalyzerConfig::default())
            .analyze_sources(&sources)
            .expect("analysis should succeed")
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("json".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!("TEXT".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn json_has_every_top_level_key() {
        let analysis = analysis(&[
            ("a/a.gno", "package a\nimport (\n\t\"b\"\n\t\"strings\"\n)\n"),
            ("b/b.gno", "package b\n"),
        ]);
        let json = to_json(&analysis).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        for key in ["packages", "edges", "metrics", "order", "diagnostics"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["packages"][0]["name"], "a");
        assert_eq!(value["packages"][0]["files"][0], "a/a.gno");
        assert_eq!(value["packages"][0]["externalReferences"][0], "strings");
        assert_eq!(value["edges"][0]["from"], "a");
        assert_eq!(value["edges"][0]["to"], "b");
        assert_eq!(value["metrics"]["a"]["ce"], 1);
        assert_eq!(value["metrics"]["b"]["ca"], 1);
        assert_eq!(value["order"], serde_json::json!(["b", "a"]));
        assert_eq!(value["diagnostics"], serde_json::json!([]));
    }

    #[test]
    fn json_diagnostics_use_package_or_file_key() {
        let analysis = analysis(&[
            ("a/a.gno", "package a\nimport \"b\"\n"),
            ("b/b.gno", "package b\nimport \"a\"\n"),
        ]);
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&analysis).expect("json")).expect("valid json");

        assert_eq!(value["order"], serde_json::json!([["a", "b"]]));
        let diagnostic = &value["diagnostics"][0];
        assert_eq!(diagnostic["severity"], "warning");
        assert_eq!(diagnostic["packageOrFile"], "a, b");
        assert!(
            diagnostic["message"]
                .as_str()
                .is_some_and(|m| m.contains("cyclic"))
        );
    }

    #[test]
    fn summary_text_omits_import_lists() {
        let analysis = analysis(&[
            ("a/a.gno", "package a\nimport \"b\"\n"),
            ("b/b.gno", "package b\n"),
        ]);
        let text = to_text(&analysis, false);

        assert!(text.contains("Package: a"));
        assert!(text.contains("Instability: 1.00"));
        assert!(!text.contains("Imports:"));
        assert!(!text.contains("Afferent coupling"));
        assert!(text.contains("  1. b\n  2. a\n"));
        assert!(text.contains("Diagnostics (0):\n  (none)"));
    }

    #[test]
    fn detailed_text_lists_imports_and_coupling_numbers() {
        let analysis = analysis(&[
            ("a/a.gno", "package a\nimport (\n\t\"b\"\n\t\"strings\"\n)\n"),
            ("b/b.gno", "package b\n"),
        ]);
        let text = to_text(&analysis, true);

        assert!(text.contains("Afferent coupling (Ca): 0"));
        assert!(text.contains("Efferent coupling (Ce): 1"));
        assert!(text.contains("    - b\n"));
        assert!(text.contains("    - strings (external)"));
        assert!(text.contains("    - a/a.gno"));
    }

    #[test]
    fn cyclic_group_renders_as_parenthesized_cluster() {
        let analysis = analysis(&[
            ("x/x.gno", "package x\nimport \"y\"\n"),
            ("y/y.gno", "package y\nimport \"x\"\n"),
        ]);
        let text = render_order(&analysis.order, OutputFormat::Text).expect("text");
        assert!(text.contains("1. (x, y) [cyclic group]"));
    }

    #[test]
    fn json_output_is_byte_identical_across_runs() {
        let sources = [
            ("c/c.gno", "package c\n"),
            ("b/b.gno", "package b\nimport \"c\"\n"),
            ("a/a.gno", "package a\nimport \"b\"\n"),
        ];
        let first = to_json(&analysis(&sources)).expect("json");
        let second = to_json(&analysis(&sources)).expect("json");
        assert_eq!(first, second);
    }
}
