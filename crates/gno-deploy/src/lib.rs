//! # gno-deploy: Dependency Analysis and Deployment Ordering
//!
//! gno-deploy reads Gno (or Go) source files, builds the package dependency
//! graph from their import declarations, computes coupling metrics, and
//! produces a deployment order in which every package comes after the
//! packages it imports. It is meant for pipelines that push several
//! interdependent packages to a chain, where deploying a package before its
//! dependencies fails silently.
//!
//! ## Pipeline
//!
//! ```text
//! scanner (parallel) -> registry -> graph -> { coupling, order } -> report
//! ```
//!
//! - **Cycles are input, not errors** - mutually dependent packages become
//!   one deployment group, flagged in the result
//! - **Deterministic** - identical input gives byte-identical JSON, however
//!   scanning was scheduled
//! - **Per-run context** - an [`Analyzer`] holds no state between runs
//!
//! ## Quick Start
//!
//! ```
//! use gno_deploy::{Analyzer, AnalyzerConfig, SourceFile};
//!
//! let sources = vec![
//!     SourceFile::new("r/app/app.gno", "package app\nimport \"avl\"\n"),
//!     SourceFile::new("p/avl/avl.gno", "package avl\n"),
//! ];
//!
//! let analysis = Analyzer::new(AnalyzerConfig::default()).analyze_sources(&sources)?;
//! assert_eq!(analysis.order.flatten(), vec!["avl", "app"]);
//! assert_eq!(analysis.metrics.get("app").map(|m| m.ce), Some(1));
//! # Ok::<(), gno_deploy::Error>(())
//! ```

pub mod config;
pub mod coupling;
pub mod diagnostics;
pub mod discovery;
mod error;
pub mod graph;
pub mod order;
pub mod parallel;
pub mod registry;
pub mod report;
pub mod scanner;
mod types;

pub use config::AnalyzerConfig;
pub use coupling::{CouplingMetrics, CouplingReport};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, ImportResolution};
pub use order::{DeploymentOrder, DeploymentStep};
pub use report::OutputFormat;
pub use types::{DependencyEdge, Language, Package, SourceFile};

use std::path::Path;

use tracing::info;

/// Everything one analysis run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Local packages and their import edges
    pub graph: DependencyGraph,
    /// Ca/Ce/I per package
    pub metrics: CouplingReport,
    /// Deployment sequence, cyclic groups included
    pub order: DeploymentOrder,
    /// Non-fatal findings from every stage
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// Whether the deployment order contains a cyclic group.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.order.has_cycles()
    }
}

/// Analysis context for one run.
///
/// Holds only configuration; every call builds and discards its own
/// registry and graph.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer with the given configuration.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze already-loaded source files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPackages`] if no file declares a package, or
    /// [`Error::Parser`] if the grammar cannot be loaded.
    pub fn analyze_sources(&self, sources: &[SourceFile]) -> Result<Analysis> {
        self.run(sources, Diagnostics::new())
    }

    /// Discover, read, and analyze the sources under `root`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is inaccessible, nothing under it is readable, or no
    /// package is declared.
    pub fn analyze_path(&self, root: &Path) -> Result<Analysis> {
        let discovered = discovery::discover_sources(root, &self.config)?;
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(discovered.diagnostics);
        self.run(&discovered.sources, diagnostics)
    }

    fn run(&self, sources: &[SourceFile], mut diagnostics: Diagnostics) -> Result<Analysis> {
        let scan = parallel::scan_sources(sources)?;
        diagnostics.extend(scan.diagnostics);
        if scan.registry.is_empty() {
            return Err(Error::NoPackages);
        }

        let (graph, graph_diagnostics) = DependencyGraph::build(
            scan.registry.all_packages(),
            self.config.report_external_references,
        );
        diagnostics.extend(graph_diagnostics);

        let metrics = coupling::analyze(&graph);
        let (order, order_diagnostics) = order::order(&graph);
        diagnostics.extend(order_diagnostics);
        diagnostics.sort();

        info!(
            packages = graph.len(),
            edges = graph.edge_count(),
            cyclic_groups = order.cyclic_groups().count(),
            diagnostics = diagnostics.len(),
            "Analysis complete"
        );

        Ok(Analysis {
            graph,
            metrics,
            order,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_packages_is_fatal() {
        let sources = vec![SourceFile::new("x.gno", "// nothing declared\n")];
        let result = Analyzer::default().analyze_sources(&sources);
        assert!(matches!(result, Err(Error::NoPackages)));
    }

    #[test]
    fn empty_input_is_fatal() {
        let result = Analyzer::default().analyze_sources(&[]);
        assert!(matches!(result, Err(Error::NoPackages)));
    }

    #[test]
    fn skipped_files_are_reported_alongside_a_valid_graph() {
        let sources = vec![
            SourceFile::new("a/a.gno", "package a\n"),
            SourceFile::new("a/doc.gno", "// Package a does things.\n"),
        ];
        let analysis = Analyzer::default()
            .analyze_sources(&sources)
            .expect("analysis should succeed");

        assert_eq!(analysis.graph.len(), 1);
        assert_eq!(
            analysis
                .diagnostics
                .of_kind(DiagnosticKind::MissingPackageClause)
                .count(),
            1
        );
    }

    #[test]
    fn broken_package_clause_never_becomes_a_package() {
        let sources = vec![
            SourceFile::new("a/a.gno", "package\nimport \"b\"\n"),
            SourceFile::new("b/b.gno", "package b\n"),
        ];
        let analysis = Analyzer::default()
            .analyze_sources(&sources)
            .expect("analysis should succeed");

        assert_eq!(analysis.order.flatten(), vec!["b"]);
        assert!(analysis.graph.package("import").is_none());
        let skipped: Vec<_> = analysis
            .diagnostics
            .of_kind(DiagnosticKind::MalformedPackageClause)
            .collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].subject, "a/a.gno");
    }

    #[test]
    fn self_import_is_flagged_and_ignored() {
        let sources = vec![SourceFile::new("a/a.gno", "package A\nimport \"A\"\n")];
        let analysis = Analyzer::default()
            .analyze_sources(&sources)
            .expect("analysis should succeed");

        let metrics = analysis.metrics.get("A").expect("metrics for A");
        assert!(metrics.is_isolated());
        assert_eq!(analysis.order.flatten(), vec!["A"]);
        assert!(!analysis.has_cycles());
        assert_eq!(
            analysis.diagnostics.of_kind(DiagnosticKind::SelfImport).count(),
            1
        );
    }

    #[test]
    fn external_reference_diagnostics_follow_config() {
        let sources = vec![SourceFile::new("a/a.gno", "package a\nimport \"strings\"\n")];

        let quiet = Analyzer::default().analyze_sources(&sources).expect("analysis");
        assert!(quiet.diagnostics.is_empty());

        let config = AnalyzerConfig {
            report_external_references: true,
            ..AnalyzerConfig::default()
        };
        let verbose = Analyzer::new(config).analyze_sources(&sources).expect("analysis");
        assert_eq!(
            verbose
                .diagnostics
                .of_kind(DiagnosticKind::ExternalReference)
                .count(),
            1
        );
        assert!(!verbose.diagnostics.has_warnings());
    }
}
