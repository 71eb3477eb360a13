//! Afferent/efferent coupling and instability per package.
//!
//! # Metrics
//!
//! - **Ca (Afferent Coupling)**: number of packages that import this package
//! - **Ce (Efferent Coupling)**: number of packages this package imports
//! - **Instability (I)**: `Ce / (Ca + Ce)`, from 0 (stable) to 1 (unstable)
//!
//! A package with no coupling at all has `I = 0`. Self-imports are not
//! counted on either side.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::graph::DependencyGraph;

/// Coupling numbers for one package.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CouplingMetrics {
    /// Afferent coupling
    pub ca: usize,
    /// Efferent coupling
    pub ce: usize,
    /// `ce / (ca + ce)`, or `0.0` for an isolated package
    pub instability: f64,
}

impl CouplingMetrics {
    /// Compute metrics from raw coupling counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Package counts are far below 2^52
    pub fn new(ca: usize, ce: usize) -> Self {
        let total = ca + ce;
        let instability = if total == 0 {
            0.0
        } else {
            ce as f64 / total as f64
        };
        Self { ca, ce, instability }
    }

    /// Whether the package neither imports nor is imported by anything.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.ca == 0 && self.ce == 0
    }
}

/// Metrics for every package, keyed by name in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CouplingReport {
    metrics: BTreeMap<String, CouplingMetrics>,
}

impl CouplingReport {
    /// Metrics for one package.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CouplingMetrics> {
        self.metrics.get(name)
    }

    /// Iterate in lexical package order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CouplingMetrics)> {
        self.metrics.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// Number of packages covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no package is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Packages ordered most unstable first, ties broken by name.
    #[must_use]
    pub fn by_instability(&self) -> Vec<(&str, &CouplingMetrics)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.instability
                .total_cmp(&a.1.instability)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

/// Compute coupling metrics for every package in the graph.
#[must_use]
pub fn analyze(graph: &DependencyGraph) -> CouplingReport {
    let inner = graph.inner();
    let metrics = inner
        .node_indices()
        .map(|index| {
            let ca = distinct_neighbors(graph, index, Direction::Incoming);
            let ce = distinct_neighbors(graph, index, Direction::Outgoing);
            (inner[index].name.clone(), CouplingMetrics::new(ca, ce))
        })
        .collect();

    CouplingReport { metrics }
}

fn distinct_neighbors(graph: &DependencyGraph, index: NodeIndex, direction: Direction) -> usize {
    let mut neighbors: Vec<NodeIndex> = graph
        .inner()
        .neighbors_directed(index, direction)
        .filter(|&other| other != index)
        .collect();
    neighbors.sort_unstable();
    neighbors.dedup();
    neighbors.len()
}
