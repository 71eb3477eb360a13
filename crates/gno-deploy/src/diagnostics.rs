//! Non-fatal findings collected during an analysis run.
//!
//! Scanning, graph construction, and ordering never raise on bad input.
//! Each of them records a [`Diagnostic`] and keeps going; the full set is
//! attached to the final [`Analysis`](crate::Analysis) so automated callers
//! can detect degraded runs without parsing prose.
//!
//! # Examples
//!
//! ```
//! use gno_deploy::diagnostics::{Diagnostic, DiagnosticKind, Severity};
//!
//! let diagnostic = Diagnostic::self_import("avl");
//! assert_eq!(diagnostic.kind, DiagnosticKind::SelfImport);
//! assert_eq!(diagnostic.severity, Severity::Warning);
//! assert_eq!(diagnostic.subject, "avl");
//! ```

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only; the run is not degraded.
    Info,
    /// Part of the input was ignored or needs attention.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Categorization of diagnostics.
///
/// Uses the same split as indexing errors elsewhere:
/// - Input problems are issues with the source files (user can fix)
/// - Structural findings describe the dependency graph itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // === Input problems ===
    /// File has no `package` clause and was skipped
    MissingPackageClause,

    /// File has a broken `package` clause and was skipped
    MalformedPackageClause,

    /// File has malformed import syntax; its imports were dropped
    MalformedImport,

    /// File content is not valid UTF-8
    EncodingError,

    /// File or directory could not be read
    Unreadable,

    // === Structural findings ===
    /// Package imports itself
    SelfImport,

    /// Packages form a dependency cycle and deploy as one group
    Cycle,

    /// Import does not resolve to a local package
    ExternalReference,
}

impl DiagnosticKind {
    /// Returns `true` if this is a problem with the input files.
    #[must_use]
    pub fn is_input_problem(self) -> bool {
        matches!(
            self,
            Self::MissingPackageClause
                | Self::MalformedPackageClause
                | Self::MalformedImport
                | Self::EncodingError
                | Self::Unreadable
        )
    }

    /// Default severity for this kind.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::ExternalReference => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPackageClause => write!(f, "missing package clause"),
            Self::MalformedPackageClause => write!(f, "malformed package clause"),
            Self::MalformedImport => write!(f, "malformed import"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::Unreadable => write!(f, "unreadable"),
            Self::SelfImport => write!(f, "self import"),
            Self::Cycle => write!(f, "cycle"),
            Self::ExternalReference => write!(f, "external reference"),
        }
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the finding is
    pub severity: Severity,
    /// Category of the finding
    pub kind: DiagnosticKind,
    /// File path or package name the finding refers to
    pub subject: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} ({})",
            self.severity, self.subject, self.message, self.kind
        )
    }
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity.
    #[must_use]
    pub fn new(
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// A file without a package clause.
    #[must_use]
    pub fn missing_package_clause(path: &Path) -> Self {
        Self::new(
            DiagnosticKind::MissingPackageClause,
            path.display().to_string(),
            "no package clause found; file skipped",
        )
    }

    /// A file whose package clause is present but unusable.
    #[must_use]
    pub fn malformed_package_clause(path: &Path, line: usize) -> Self {
        Self::new(
            DiagnosticKind::MalformedPackageClause,
            path.display().to_string(),
            format!("malformed package clause at line {line}; file skipped"),
        )
    }

    /// A file whose import declarations could not be parsed.
    #[must_use]
    pub fn malformed_import(path: &Path, line: usize) -> Self {
        Self::new(
            DiagnosticKind::MalformedImport,
            path.display().to_string(),
            format!("malformed import declaration at line {line}; file imports ignored"),
        )
    }

    /// A file that is not valid UTF-8.
    #[must_use]
    pub fn encoding_error(path: &Path) -> Self {
        Self::new(
            DiagnosticKind::EncodingError,
            path.display().to_string(),
            "file is not valid UTF-8; file skipped",
        )
    }

    /// A file or directory that could not be read.
    #[must_use]
    pub fn unreadable(path: &Path, error: &std::io::Error) -> Self {
        Self::new(
            DiagnosticKind::Unreadable,
            path.display().to_string(),
            format!("cannot read: {error}"),
        )
    }

    /// A package that imports itself.
    #[must_use]
    pub fn self_import(package: &str) -> Self {
        Self::new(
            DiagnosticKind::SelfImport,
            package,
            "package imports itself; edge ignored for coupling and ordering",
        )
    }

    /// A cyclic group; `members` must already be in lexical order.
    #[must_use]
    pub fn cycle(members: &[String]) -> Self {
        Self::new(
            DiagnosticKind::Cycle,
            members.join(", "),
            format!(
                "cyclic dependency between {}; deployed as a single group",
                members.join(", ")
            ),
        )
    }

    /// An import that resolves to no local package.
    #[must_use]
    pub fn external_reference(package: &str, import: &str) -> Self {
        Self::new(
            DiagnosticKind::ExternalReference,
            package,
            format!("import \"{import}\" is not a local package"),
        )
    }
}

/// Collected diagnostics for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any warning-level diagnostic was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Warning)
    }

    /// Iterate over diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Iterate in recorded order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Sort into a stable order independent of scan scheduling.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
