//! Property tests for coupling metrics and deployment ordering.

use std::collections::BTreeSet;

use gno_deploy::{Analysis, Analyzer, SourceFile};
use proptest::prelude::*;

fn name(i: usize) -> String {
    format!("p{i:02}")
}

/// Build one source file per package from an edge list over `n` packages.
fn sources(n: usize, edges: &[(usize, usize)]) -> Vec<SourceFile> {
    (0..n)
        .map(|i| {
            let imports: BTreeSet<String> = edges
                .iter()
                .filter(|&&(from, _)| from == i)
                .map(|&(_, to)| name(to))
                .collect();
            let mut content = format!("package {}\n", name(i));
            if !imports.is_empty() {
                content.push_str("\nimport (\n");
                for import in imports {
                    content.push_str(&format!("\t\"{import}\"\n"));
                }
                content.push_str(")\n");
            }
            SourceFile::new(format!("{0}/{0}.gno", name(i)), content)
        })
        .collect()
}

fn analyze(n: usize, edges: &[(usize, usize)]) -> Analysis {
    Analyzer::default()
        .analyze_sources(&sources(n, edges))
        .expect("analysis should succeed")
}

/// Arbitrary graphs: self-loops and cycles allowed.
fn any_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..30)))
}

/// Acyclic graphs: every edge points at a lower-numbered package.
fn acyclic_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..12).prop_flat_map(|n| {
        let edges = prop::collection::vec((1..n, 0..n), 0..30).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(from, to)| (from, to % from))
                .collect::<Vec<_>>()
        });
        (Just(n), edges)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_package_appears_exactly_once((n, edges) in any_graph()) {
        let analysis = analyze(n, &edges);
        let flat = analysis.order.flatten();

        prop_assert_eq!(flat.len(), n);
        let unique: BTreeSet<&str> = flat.iter().copied().collect();
        prop_assert_eq!(unique.len(), n);
    }

    #[test]
    fn acyclic_order_respects_every_edge((n, edges) in acyclic_graph()) {
        let analysis = analyze(n, &edges);
        prop_assert!(!analysis.has_cycles());

        for edge in analysis.graph.edges() {
            let from = analysis.order.position(&edge.from);
            let to = analysis.order.position(&edge.to);
            prop_assert!(to < from, "{} must deploy before {}", edge.to, edge.from);
        }
    }

    #[test]
    fn cyclic_order_respects_edges_between_steps((n, edges) in any_graph()) {
        let analysis = analyze(n, &edges);
        let step_of = |pkg: &str| {
            analysis
                .order
                .steps()
                .iter()
                .position(|step| step.names().iter().any(|m| m == pkg))
        };

        for edge in analysis.graph.edges() {
            prop_assert!(step_of(&edge.to) <= step_of(&edge.from));
        }
    }

    #[test]
    fn isolated_packages_have_zero_instability((n, edges) in any_graph()) {
        let analysis = analyze(n, &edges);

        for (pkg, metrics) in analysis.metrics.iter() {
            prop_assert!((0.0..=1.0).contains(&metrics.instability));
            if metrics.ca + metrics.ce == 0 {
                prop_assert_eq!(metrics.instability, 0.0, "{} is isolated", pkg);
            }
        }
    }

    #[test]
    fn reordering_input_does_not_change_the_result((n, edges) in any_graph()) {
        let forward = Analyzer::default()
            .analyze_sources(&sources(n, &edges))
            .expect("analysis");
        let mut reversed_sources = sources(n, &edges);
        reversed_sources.reverse();
        let reversed = Analyzer::default()
            .analyze_sources(&reversed_sources)
            .expect("analysis");

        prop_assert_eq!(
            gno_deploy::report::to_json(&forward).expect("json"),
            gno_deploy::report::to_json(&reversed).expect("json")
        );
    }
}
