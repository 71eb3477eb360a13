//! Domain types for dependency analysis.
//!
//! - **Input**: `SourceFile` (text plus a package-relative path)
//! - **Entities**: `Package`, `DependencyEdge` (owned by one analysis run)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Package identity | Declared name | Imports resolve by exact name |
//! | Files / imports | `BTreeSet` | Merge order never shows in output |
//! | External references | Kept on the package | Reported, never become edges |

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Supported source languages.
///
/// Gno is a Go dialect and shares its package clause and import syntax,
/// so both are parsed with the Go grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Gno source files (`.gno`)
    Gno,
    /// Go source files (`.go`)
    Go,
}

impl Language {
    /// Detect language from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "gno" => Some(Self::Gno),
            "go" => Some(Self::Go),
            _ => None,
        }
    }

    /// Detect language from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// One candidate source file handed to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Package-relative path used to identify the file in reports
    pub path: PathBuf,
    /// Full file content
    pub content: String,
}

impl SourceFile {
    /// Create a source file from a path and its text.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A package aggregated from every file that declares it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Declared package name; unique within a run
    pub name: String,
    /// Files contributing to this package
    pub files: BTreeSet<PathBuf>,
    /// Distinct import paths across all files
    pub imports: BTreeSet<String>,
    /// Imports that did not resolve to a local package.
    ///
    /// Empty until the graph builder classifies `imports`.
    pub external_references: BTreeSet<String>,
}

impl Package {
    /// Create an empty package with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A directed "from imports to" relation between two local packages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyEdge {
    /// The importing package
    pub from: String,
    /// The imported package
    pub to: String,
}

impl DependencyEdge {
    /// Whether the edge points back at its own source.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_extension_recognizes_gno_and_go() {
        assert_eq!(Language::from_extension("gno"), Some(Language::Gno));
        assert_eq!(Language::from_extension("GO"), Some(Language::Go));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn language_from_path_requires_extension() {
        assert_eq!(
            Language::from_path(Path::new("p/demo/avl/tree.gno")),
            Some(Language::Gno)
        );
        assert_eq!(Language::from_path(Path::new("gno.mod")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn self_loop_detection() {
        let edge = DependencyEdge {
            from: "a".to_string(),
            to: "a".to_string(),
        };
        assert!(edge.is_self_loop());
    }
}
