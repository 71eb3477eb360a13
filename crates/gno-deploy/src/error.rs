//! Error types for gno-deploy operations.
//!
//! Errors fall into two groups:
//!
//! - **`Error`**: run-level failures that leave nothing to analyze
//! - **`Diagnostic`** (see [`crate::diagnostics`]): per-file and per-package
//!   findings that are collected and attached to the report
//!
//! ## Error Philosophy
//!
//! Analysis is "best effort":
//! - A single malformed file never prevents analyzing the rest
//! - Cycles are reported, never thrown
//! - Only conditions without a valid graph abort the run

use std::path::PathBuf;
use thiserror::Error;

/// Result type for gno-deploy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for gno-deploy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Scanning finished without a single package declaration.
    #[error("no packages found in the supplied sources")]
    NoPackages,

    /// Every candidate source file failed to read.
    #[error("none of the {attempted} candidate source files could be read")]
    NoReadableSources {
        /// Number of files discovery tried to read
        attempted: usize,
    },

    /// The project root could not be accessed.
    #[error("project root not found: {}", .path.display())]
    RootNotFound {
        /// The path that was requested
        path: PathBuf,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Report serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_readable_sources_reports_attempt_count() {
        let error = Error::NoReadableSources { attempted: 7 };
        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn root_not_found_exposes_io_source() {
        let error = Error::RootNotFound {
            path: PathBuf::from("/missing/project"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };

        assert!(error.to_string().contains("/missing/project"));
        let source = std::error::Error::source(&error).expect("source should be set");
        assert_eq!(source.to_string(), "gone");
    }
}
