//! Deployment ordering that tolerates dependency cycles.
//!
//! The order always contains every package exactly once, with dependencies
//! before dependents.
//!
//! # Algorithm
//!
//! 1. Compute strongly connected components once, with petgraph's
//!    `kosaraju_scc` (iterative DFS, no recursion depth limit).
//! 2. Run Kahn's algorithm over packages. A package is ready when all of its
//!    dependencies are placed; among ready packages the lexically smallest
//!    goes first.
//! 3. When nothing is ready but packages remain, the residue is cyclic. Every
//!    multi-member component tracks how many of its external dependencies are
//!    still unplaced; the lexically smallest component whose count is zero is
//!    placed atomically as one group, members in lexical order, and Kahn's
//!    loop resumes.
//!
//! A multi-member component is always wholly placed or wholly unplaced, so
//! the components from step 1 stay valid for the whole run. Self-imports
//! are ignored.
//!
//! # Edge Direction Reminder
//!
//! Graph edges point from **dependent -> dependency**. A package's remaining
//! in-degree for Kahn's loop is therefore its count of unplaced *outgoing*
//! edges, and placing a package releases its *incoming* neighbors.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostic;
use crate::graph::DependencyGraph;

/// One position in the deployment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeploymentStep {
    /// A package with no unresolved cycle.
    Package(String),
    /// Mutually dependent packages, lexically ordered, deployed together.
    Group(Vec<String>),
}

impl DeploymentStep {
    /// Package names covered by this step.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Package(name) => std::slice::from_ref(name),
            Self::Group(names) => names,
        }
    }

    /// Whether this step is a cyclic group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// Ordered deployment sequence for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentOrder {
    steps: Vec<DeploymentStep>,
}

impl DeploymentOrder {
    /// Steps in deployment order.
    #[must_use]
    pub fn steps(&self) -> &[DeploymentStep] {
        &self.steps
    }

    /// Whether any step is a cyclic group.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.steps.iter().any(DeploymentStep::is_group)
    }

    /// The cyclic groups, in deployment order.
    pub fn cyclic_groups(&self) -> impl Iterator<Item = &[String]> {
        self.steps.iter().filter_map(|step| match step {
            DeploymentStep::Group(names) => Some(names.as_slice()),
            DeploymentStep::Package(_) => None,
        })
    }

    /// Packages taking part in any cycle, in deployment order.
    #[must_use]
    pub fn cyclic_packages(&self) -> Vec<&str> {
        self.cyclic_groups()
            .flat_map(|group| group.iter().map(String::as_str))
            .collect()
    }

    /// All package names with groups expanded in place.
    #[must_use]
    pub fn flatten(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.names().iter().map(String::as_str))
            .collect()
    }

    /// Flat position of a package, if present.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.flatten().iter().position(|&n| n == name)
    }

    /// Number of packages (not steps).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.iter().map(|step| step.names().len()).sum()
    }

    /// Whether the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Marker for packages outside any multi-member component.
const NO_GROUP: usize = usize::MAX;

/// Bookkeeping for Kahn's loop with group fallback.
struct Sorter<'g> {
    graph: &'g DependencyGraph,
    /// Unplaced dependencies per node (self-loops excluded)
    remaining: Vec<usize>,
    placed: Vec<bool>,
    /// Index into `groups` for nodes in a multi-member component
    group_of: Vec<usize>,
    /// Multi-member components, members sorted by index (= lexically)
    groups: Vec<Vec<NodeIndex>>,
    /// Unplaced dependencies outside the component, per group
    group_remaining: Vec<usize>,
    ready: BTreeSet<NodeIndex>,
    /// Groups with no unplaced external dependency, keyed by first member
    eligible_groups: BTreeSet<(NodeIndex, usize)>,
    steps: Vec<DeploymentStep>,
}

impl<'g> Sorter<'g> {
    fn new(graph: &'g DependencyGraph) -> Self {
        let inner = graph.inner();
        let count = inner.node_count();

        let mut group_of = vec![NO_GROUP; count];
        let mut groups = Vec::new();
        for mut component in kosaraju_scc(inner) {
            if component.len() < 2 {
                continue;
            }
            component.sort_unstable();
            for &node in &component {
                group_of[node.index()] = groups.len();
            }
            groups.push(component);
        }

        let mut remaining = vec![0; count];
        let mut group_remaining = vec![0; groups.len()];
        for edge in inner.edge_references() {
            let (from, to) = (edge.source(), edge.target());
            if from == to {
                continue;
            }
            remaining[from.index()] += 1;
            let group = group_of[from.index()];
            if group != NO_GROUP && group_of[to.index()] != group {
                group_remaining[group] += 1;
            }
        }

        let ready = inner
            .node_indices()
            .filter(|node| remaining[node.index()] == 0)
            .collect();
        let eligible_groups = group_remaining
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(group, _)| (groups[group][0], group))
            .collect();

        Self {
            graph,
            remaining,
            placed: vec![false; count],
            group_of,
            groups,
            group_remaining,
            ready,
            eligible_groups,
            steps: Vec::new(),
        }
    }

    fn name(&self, node: NodeIndex) -> String {
        self.graph.inner()[node].name.clone()
    }

    /// Mark `node` placed and release its dependents.
    fn place(&mut self, node: NodeIndex) {
        self.placed[node.index()] = true;
        let own_group = self.group_of[node.index()];

        let dependents: Vec<NodeIndex> = self
            .graph
            .inner()
            .edges_directed(node, Direction::Incoming)
            .map(|edge| edge.source())
            .filter(|&source| source != node)
            .collect();

        for dependent in dependents {
            let i = dependent.index();
            self.remaining[i] -= 1;
            if self.remaining[i] == 0 && !self.placed[i] && self.group_of[i] == NO_GROUP {
                self.ready.insert(dependent);
            }

            let group = self.group_of[i];
            if group != NO_GROUP && group != own_group {
                self.group_remaining[group] -= 1;
                if self.group_remaining[group] == 0 {
                    self.eligible_groups.insert((self.groups[group][0], group));
                }
            }
        }
    }

    fn run(mut self) -> Vec<DeploymentStep> {
        loop {
            if let Some(node) = self.ready.pop_first() {
                self.steps.push(DeploymentStep::Package(self.name(node)));
                self.place(node);
                continue;
            }

            let Some((_, group)) = self.eligible_groups.pop_first() else {
                break;
            };
            let members = self.groups[group].clone();
            let names: Vec<String> = members.iter().map(|&node| self.name(node)).collect();
            warn!(members = ?names, "Cyclic dependency, deploying as a group");
            self.steps.push(DeploymentStep::Group(names));
            for node in members {
                self.place(node);
            }
        }

        debug_assert!(
            self.placed.iter().all(|&placed| placed),
            "every package must be placed"
        );
        self.steps
    }
}

/// Compute the deployment order for a graph.
///
/// Never fails: cycles become [`DeploymentStep::Group`] entries, each
/// reported through a cycle diagnostic.
#[must_use]
pub fn order(graph: &DependencyGraph) -> (DeploymentOrder, Vec<Diagnostic>) {
    let steps = Sorter::new(graph).run();

    let diagnostics: Vec<Diagnostic> = steps
        .iter()
        .filter_map(|step| match step {
            DeploymentStep::Group(names) => Some(Diagnostic::cycle(names)),
            DeploymentStep::Package(_) => None,
        })
        .collect();

    debug!(
        steps = steps.len(),
        cyclic_groups = diagnostics.len(),
        "Computed deployment order"
    );

    (DeploymentOrder { steps }, diagnostics)
}
