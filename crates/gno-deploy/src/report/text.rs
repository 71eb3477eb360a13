//! Plain-text rendering of an analysis.
//!
//! Output carries no ANSI styling so it stays byte-stable; callers that want
//! colour add it around this text.

use std::fmt;

use crate::Analysis;
use crate::order::{DeploymentOrder, DeploymentStep};

/// Human-readable report, rendered through `Display`.
pub struct TextReport<'a> {
    analysis: &'a Analysis,
    detailed: bool,
}

impl<'a> TextReport<'a> {
    /// Wrap an analysis for rendering.
    #[must_use]
    pub fn new(analysis: &'a Analysis, detailed: bool) -> Self {
        Self { analysis, detailed }
    }

    fn write_packages(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = &self.analysis.graph;
        for package in graph.packages() {
            writeln!(f, "Package: {}", package.name)?;
            let Some(metrics) = self.analysis.metrics.get(&package.name) else {
                writeln!(f)?;
                continue;
            };
            writeln!(f, "  Instability: {:.2}", metrics.instability)?;

            if self.detailed {
                writeln!(f, "  Afferent coupling (Ca): {}", metrics.ca)?;
                writeln!(f, "  Efferent coupling (Ce): {}", metrics.ce)?;
                writeln!(f, "  Files:")?;
                for file in &package.files {
                    writeln!(f, "    - {}", file.display())?;
                }
                writeln!(f, "  Imports:")?;
                if package.imports.is_empty() {
                    writeln!(f, "    (none)")?;
                }
                for import in &package.imports {
                    if package.external_references.contains(import) {
                        writeln!(f, "    - {import} (external)")?;
                    } else if import == &package.name {
                        writeln!(f, "    - {import} (self)")?;
                    } else {
                        writeln!(f, "    - {import}")?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_diagnostics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagnostics = &self.analysis.diagnostics;
        writeln!(f, "Diagnostics ({}):", diagnostics.len())?;
        if diagnostics.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for diagnostic in diagnostics {
            writeln!(
                f,
                "  [{}] {}: {}",
                diagnostic.severity, diagnostic.subject, diagnostic.message
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        writeln!(
            f,
            "Analyzed {} packages, {} dependency edges",
            analysis.graph.len(),
            analysis.graph.edge_count()
        )?;
        if let Some((name, metrics)) = analysis.metrics.by_instability().first() {
            writeln!(f, "Most unstable: {name} ({:.2})", metrics.instability)?;
        }
        writeln!(f)?;

        self.write_packages(f)?;
        write!(f, "{}", OrderText(&analysis.order))?;
        writeln!(f)?;
        self.write_diagnostics(f)
    }
}

/// Numbered deployment order listing.
pub struct OrderText<'a>(pub &'a DeploymentOrder);

impl fmt::Display for OrderText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployment order:")?;
        if self.0.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for (i, step) in self.0.steps().iter().enumerate() {
            match step {
                DeploymentStep::Package(name) => writeln!(f, "  {}. {name}", i + 1)?,
                DeploymentStep::Group(names) => {
                    writeln!(f, "  {}. ({}) [cyclic group]", i + 1, names.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

/// Render the full analysis as text.
#[must_use]
pub fn to_text(analysis: &Analysis, detailed: bool) -> String {
    TextReport::new(analysis, detailed).to_string()
}

/// Render only the deployment order as text.
#[must_use]
pub fn order_to_text(order: &DeploymentOrder) -> String {
    OrderText(order).to_string()
}
