//! Deduplication of package declarations across files.
//!
//! Several files may declare the same package. The registry folds them into
//! one [`Package`] per name using set union, so the final contents do not
//! depend on the order files were scanned in.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::Package;

/// Accumulates package declarations for one analysis run.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: BTreeMap<String, Package>,
}

impl PackageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's declaration into the package `name`, creating it if absent.
    pub fn register<I, S>(&mut self, name: &str, file: PathBuf, imports: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let package = self
            .packages
            .entry(name.to_string())
            .or_insert_with(|| Package::new(name));
        package.files.insert(file);
        package.imports.extend(imports.into_iter().map(Into::into));
    }

    /// Number of distinct packages registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no package has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Look up a package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Finalize the registry, returning packages in lexical name order.
    #[must_use]
    pub fn all_packages(self) -> Vec<Package> {
        self.packages.into_values().collect()
    }
}
