//! Analyzer configuration.
//!
//! Loaded from `gno-deploy.yaml` in the project root when present. Every
//! field has a default, so a partial file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "gno-deploy.yaml";

/// File name suffixes of test files, skipped unless `include_tests` is set
pub const TEST_FILE_SUFFIXES: &[&str] = &["_test.gno", "_test.go", "_filetest.gno"];

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// File extensions treated as source files
    pub extensions: Vec<String>,

    /// Directory names never descended into (hidden directories are always skipped)
    pub exclude_dirs: Vec<String>,

    /// Whether test files take part in the analysis
    pub include_tests: bool,

    /// Whether every external import is reported as an info diagnostic
    pub report_external_references: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["gno".to_string(), "go".to_string()],
            exclude_dirs: ["target", "node_modules", "vendor", "build", "dist", "testdata"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            include_tests: false,
            report_external_references: false,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load `gno-deploy.yaml` from `root`, or defaults if there is none.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether a file with this name should be scanned.
    #[must_use]
    pub fn accepts_file(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }
        self.include_tests || !TEST_FILE_SUFFIXES.iter().any(|s| file_name.ends_with(s))
    }

    /// Whether a directory with this name should be skipped.
    #[must_use]
    pub fn excludes_dir(&self, dir_name: &str) -> bool {
        dir_name.starts_with('.') || self.exclude_dirs.iter().any(|d| d == dir_name)
    }
}
