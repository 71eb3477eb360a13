//! Parallel file scanning with a deterministic merge.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        scan_sources                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Phase 1 (Parallel):    rayon::par_iter() file scanning      │
//! │  Phase 2 (Sequential):  sort by path, fold into registry     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Workers never touch shared state. Each returns an owned [`ScannedFile`],
//! and a single sequential pass merges them, so the registry (and every
//! report built from it) is identical no matter how work was scheduled.

use rayon::prelude::*;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::registry::PackageRegistry;
use crate::scanner::{go_parser, scan_with_parser, ScannedFile};
use crate::types::SourceFile;

/// Result of scanning a batch of files.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Merged package declarations
    pub registry: PackageRegistry,
    /// Per-file findings, in path order
    pub diagnostics: Vec<Diagnostic>,
    /// Files that contributed a package declaration
    pub files_scanned: usize,
    /// Files skipped for lack of a package clause
    pub files_skipped: usize,
}

/// Scan every source file in parallel and merge the results.
///
/// Each rayon worker keeps its own tree-sitter parser.
pub fn scan_sources(sources: &[SourceFile]) -> Result<ScanOutcome> {
    let mut scanned: Vec<ScannedFile> = sources
        .par_iter()
        .map_init(
            || {
                go_parser().map_err(|e| match e {
                    Error::Parser(message) => message,
                    other => other.to_string(),
                })
            },
            |parser, file| match parser {
                Ok(parser) => scan_with_parser(parser, file),
                Err(message) => Err(Error::Parser(message.clone())),
            },
        )
        .collect::<Result<Vec<_>>>()?;

    scanned.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(merge(scanned))
}

/// Fold scan results into a registry, in the order given.
pub fn merge(scanned: Vec<ScannedFile>) -> ScanOutcome {
    let mut registry = PackageRegistry::new();
    let mut diagnostics = Vec::new();
    let mut files_scanned = 0;
    let mut files_skipped = 0;

    for file in scanned {
        diagnostics.extend(file.diagnostics);
        match file.package {
            Some(package) => {
                files_scanned += 1;
                registry.register(&package, file.path, file.imports);
            }
            None => files_skipped += 1,
        }
    }

    debug!(
        files_scanned,
        files_skipped,
        packages = registry.len(),
        "Merged scan results"
    );

    ScanOutcome {
        registry,
        diagnostics,
        files_scanned,
        files_skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SourceFile> {
        vec![
            SourceFile::new("a/one.gno", "package a\nimport \"b\"\n"),
            SourceFile::new("a/two.gno", "package a\nimport \"c\"\n"),
            SourceFile::new("b/b.gno", "package b\n"),
            SourceFile::new("notes.gno", "// no package here\n"),
        ]
    }

    #[test]
    fn scan_merges_files_of_the_same_package() {
        let outcome = scan_sources(&sources()).expect("scan should succeed");

        assert_eq!(outcome.files_scanned, 3);
        assert_eq!(outcome.files_skipped, 1);
        assert_eq!(outcome.diagnostics.len(), 1);

        let packages = outcome.registry.all_packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "a");
        assert_eq!(packages[0].files.len(), 2);
        assert!(packages[0].imports.contains("b"));
        assert!(packages[0].imports.contains("c"));
    }

    #[test]
    fn input_order_does_not_change_the_registry() {
        let forward = scan_sources(&sources()).expect("scan should succeed");
        let mut reversed_sources = sources();
        reversed_sources.reverse();
        let reversed = scan_sources(&reversed_sources).expect("scan should succeed");

        assert_eq!(forward.diagnostics, reversed.diagnostics);
        assert_eq!(
            forward.registry.all_packages(),
            reversed.registry.all_packages()
        );
    }

    #[test]
    fn empty_input_yields_empty_registry() {
        let outcome = scan_sources(&[]).expect("scan should succeed");
        assert!(outcome.registry.is_empty());
        assert_eq!(outcome.files_scanned, 0);
    }
}
