//! Source discovery for a project directory.
//!
//! Walks the tree, reads every accepted file, and hands back
//! [`SourceFile`]s with paths relative to the root. Unreadable directories
//! and files become diagnostics; only a total read failure is fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::types::SourceFile;

/// Files read from a project directory.
#[derive(Debug, Default)]
pub struct DiscoveredSources {
    /// Readable source files, sorted by relative path
    pub sources: Vec<SourceFile>,
    /// Directories and files that could not be read
    pub diagnostics: Vec<Diagnostic>,
    /// Number of candidate files found
    pub attempted: usize,
}

/// Discover and read the source files under `root`.
///
/// # Errors
///
/// Fails if `root` cannot be accessed, or if candidate files exist but none
/// of them could be read.
pub fn discover_sources(root: &Path, config: &AnalyzerConfig) -> Result<DiscoveredSources> {
    let root = root.canonicalize().map_err(|source| Error::RootNotFound {
        path: root.to_path_buf(),
        source,
    })?;

    let mut discovered = DiscoveredSources::default();
    let mut files = Vec::new();
    walk_dir(&root, &root, config, &mut files, &mut discovered.diagnostics);
    files.sort();
    discovered.attempted = files.len();

    for path in files {
        let relative = relative_to(&root, &path);
        match std::fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => discovered.sources.push(SourceFile::new(relative, content)),
                Err(_) => {
                    warn!(file = %relative.display(), "File is not valid UTF-8, skipping");
                    discovered.diagnostics.push(Diagnostic::encoding_error(&relative));
                }
            },
            Err(e) => {
                warn!(file = %relative.display(), error = %e, "Cannot read file, skipping");
                discovered.diagnostics.push(Diagnostic::unreadable(&relative, &e));
            }
        }
    }

    if discovered.attempted > 0 && discovered.sources.is_empty() {
        return Err(Error::NoReadableSources {
            attempted: discovered.attempted,
        });
    }

    debug!(
        root = %root.display(),
        candidates = discovered.attempted,
        readable = discovered.sources.len(),
        "Discovered source files"
    );

    Ok(discovered)
}

/// Path of `path` below `root` (`.` for the root itself), or `path` if it
/// lies elsewhere.
fn relative_to(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => PathBuf::from("."),
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Recursively walk a directory, collecting accepted source files.
///
/// Directories that cannot be read are reported in `diagnostics`, relative
/// to `root`.
fn walk_dir(
    root: &Path,
    dir: &Path,
    config: &AnalyzerConfig,
    files: &mut Vec<PathBuf>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(
                directory = %dir.display(),
                error = %e,
                "Cannot read directory, skipping"
            );
            diagnostics.push(Diagnostic::unreadable(&relative_to(root, dir), &e));
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Failed to read directory entry, skipping"
                );
                continue;
            }
        };

        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.is_dir() {
            if !config.excludes_dir(name) {
                walk_dir(root, &path, config, files, diagnostics);
            }
        } else if path.is_file() && config.accepts_file(name) {
            files.push(path);
        }
    }
}
