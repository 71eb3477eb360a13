//! JSON rendering of an analysis.
//!
//! Field order is fixed by struct declaration order and every map is a
//! `BTreeMap`, so identical input always renders to identical bytes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Analysis;
use crate::coupling::CouplingMetrics;
use crate::diagnostics::{Diagnostic, Severity};
use crate::error::Result;
use crate::order::DeploymentOrder;
use crate::types::{DependencyEdge, Package};

#[derive(Serialize)]
struct JsonReport<'a> {
    packages: Vec<JsonPackage<'a>>,
    edges: Vec<JsonEdge<'a>>,
    metrics: BTreeMap<&'a str, &'a CouplingMetrics>,
    order: &'a DeploymentOrder,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPackage<'a> {
    name: &'a str,
    files: Vec<String>,
    imports: Vec<&'a str>,
    external_references: Vec<&'a str>,
}

impl<'a> From<&'a Package> for JsonPackage<'a> {
    fn from(package: &'a Package) -> Self {
        Self {
            name: &package.name,
            files: package
                .files
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            imports: package.imports.iter().map(String::as_str).collect(),
            external_references: package
                .external_references
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonEdge<'a> {
    from: &'a str,
    to: &'a str,
}

impl<'a> From<&'a DependencyEdge> for JsonEdge<'a> {
    fn from(edge: &'a DependencyEdge) -> Self {
        Self {
            from: &edge.from,
            to: &edge.to,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic<'a> {
    severity: Severity,
    package_or_file: &'a str,
    message: &'a str,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity,
            package_or_file: &diagnostic.subject,
            message: &diagnostic.message,
        }
    }
}

/// Render the full analysis as pretty-printed JSON.
pub fn to_json(analysis: &Analysis) -> Result<String> {
    let edges = analysis.graph.edges();
    let report = JsonReport {
        packages: analysis.graph.packages().map(JsonPackage::from).collect(),
        edges: edges.iter().map(JsonEdge::from).collect(),
        metrics: analysis.metrics.iter().collect(),
        order: &analysis.order,
        diagnostics: analysis.diagnostics.iter().map(JsonDiagnostic::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render only the deployment order as JSON.
pub fn order_to_json(order: &DeploymentOrder) -> Result<String> {
    Ok(serde_json::to_string_pretty(order)?)
}
