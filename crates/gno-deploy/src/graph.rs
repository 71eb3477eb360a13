//! Package dependency graph.
//!
//! ## Edge Direction
//!
//! Edges point from **dependent -> dependency**: `a -> b` means package `a`
//! imports package `b`, so `b` must be deployed first.
//!
//! ## Identity
//!
//! Nodes are inserted in lexical name order, so `NodeIndex` order and name
//! order agree. Algorithms that break ties by index therefore break them by
//! name, and two runs over the same input build the same graph.
//!
//! The graph is an immutable snapshot once [`DependencyGraph::build`]
//! returns; coupling analysis and ordering only read it.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostic;
use crate::types::{DependencyEdge, Package};

/// How an import path relates to the packages of this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// The import names a package declared in the input.
    Local(String),
    /// Standard library or off-workspace import.
    External(String),
}

/// Directed graph of local packages and their imports.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<Package, ()>,
    node_map: HashMap<String, NodeIndex>,
    self_imports: BTreeSet<String>,
}

impl DependencyGraph {
    /// Build the graph from finalized packages.
    ///
    /// Returns the graph together with the diagnostics raised while
    /// resolving imports. External references only produce diagnostics when
    /// `report_external` is set.
    #[must_use]
    pub fn build(packages: Vec<Package>, report_external: bool) -> (Self, Vec<Diagnostic>) {
        let mut packages = packages;
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        let mut graph = DiGraph::with_capacity(packages.len(), 0);
        let mut node_map = HashMap::with_capacity(packages.len());
        for package in packages {
            let name = package.name.clone();
            let index = graph.add_node(package);
            node_map.insert(name, index);
        }

        let mut diagnostics = Vec::new();
        let mut self_imports = BTreeSet::new();

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for from in indices {
            let mut external = BTreeSet::new();
            let mut targets = BTreeSet::new();

            for import in &graph[from].imports {
                match resolve(&node_map, import) {
                    ImportResolution::Local(name) => {
                        targets.insert(node_map[&name]);
                    }
                    ImportResolution::External(path) => {
                        external.insert(path);
                    }
                }
            }

            let from_name = graph[from].name.clone();
            for to in targets {
                if to == from {
                    warn!(package = %from_name, "Package imports itself");
                    self_imports.insert(from_name.clone());
                    diagnostics.push(Diagnostic::self_import(&from_name));
                }
                graph.add_edge(from, to, ());
            }

            if report_external {
                diagnostics.extend(
                    external
                        .iter()
                        .map(|path| Diagnostic::external_reference(&from_name, path)),
                );
            }
            graph[from].external_references = external;
        }

        debug!(
            packages = graph.node_count(),
            edges = graph.edge_count(),
            self_imports = self_imports.len(),
            "Built dependency graph"
        );

        (
            Self {
                graph,
                node_map,
                self_imports,
            },
            diagnostics,
        )
    }

    /// Classify an import path against the packages in this graph.
    #[must_use]
    pub fn resolve_import(&self, import: &str) -> ImportResolution {
        resolve(&self.node_map, import)
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All packages in lexical name order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    /// Look up a package by name.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.node_map.get(name).map(|&index| &self.graph[index])
    }

    /// All edges, self-loops included, sorted by `(from, to)`.
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_references()
            .map(|edge| DependencyEdge {
                from: self.graph[edge.source()].name.clone(),
                to: self.graph[edge.target()].name.clone(),
            })
            .collect();
        edges.sort();
        edges
    }

    /// Number of edges, self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Packages that `name` imports, excluding itself, in lexical order.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Packages that import `name`, excluding itself, in lexical order.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Packages that import themselves, in lexical order.
    pub fn self_imports(&self) -> impl Iterator<Item = &str> {
        self.self_imports.iter().map(String::as_str)
    }

    /// Whether `name` imports itself.
    #[must_use]
    pub fn has_self_import(&self, name: &str) -> bool {
        self.self_imports.contains(name)
    }

    /// The underlying petgraph graph.
    #[must_use]
    pub fn inner(&self) -> &DiGraph<Package, ()> {
        &self.graph
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&index) = self.node_map.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(index, direction)
            .filter(|&other| other != index)
            .map(|other| self.graph[other].name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

fn resolve(node_map: &HashMap<String, NodeIndex>, import: &str) -> ImportResolution {
    if node_map.contains_key(import) {
        ImportResolution::Local(import.to_string())
    } else {
        ImportResolution::External(import.to_string())
    }
}
