//! Shared module → package cache.

use super::{FoundPackage, Package};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Cache of previously discovered packages.
///
/// Maps module files to their package path and package paths to loaded
/// packages. Cloning yields another handle to the same cache, so one cache can
/// be shared between the observer and the coordinator of a build, and between
/// successive builds in the same process.
#[derive(Debug, Clone, Default)]
pub struct PackageCache {
    inner: Arc<Mutex<CacheState>>,
}

#[derive(Debug, Default)]
struct CacheState {
    module_packages: HashMap<PathBuf, PathBuf>,
    packages: HashMap<PathBuf, Arc<Package>>,
}

impl PackageCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the package path recorded for a module.
    pub fn package_path(&self, module: &Path) -> Option<PathBuf> {
        self.state().module_packages.get(module).cloned()
    }

    /// Returns a loaded package by path.
    pub fn package(&self, package_path: &Path) -> Option<Arc<Package>> {
        self.state().packages.get(package_path).cloned()
    }

    /// Records a finder result for a module.
    ///
    /// Returns the cached package for the path: an already cached package wins
    /// over the newly found one so every module of a package shares one value.
    pub fn insert(&self, module: &Path, found: FoundPackage) -> Arc<Package> {
        let mut state = self.state();
        state
            .module_packages
            .insert(module.to_path_buf(), found.path.clone());
        state
            .packages
            .entry(found.path)
            .or_insert_with(|| Arc::new(found.package))
            .clone()
    }

    /// Number of loaded packages.
    pub fn len(&self) -> usize {
        self.state().packages.len()
    }

    /// Whether no package has been loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
