//! Adapter from bundler dependency events to the coordinator.

use super::coordinator::AssetBuildCoordinator;
use crate::bundler::{
    error::{Error, Result},
    package::{PackageCache, PackageFinder},
};
use std::{path::PathBuf, sync::Arc};

/// Receives every module the bundler's dependency stage discovers.
#[derive(Clone)]
pub struct DependencyObserver {
    coordinator: AssetBuildCoordinator,
    finder: Arc<dyn PackageFinder>,
    cache: PackageCache,
}

impl DependencyObserver {
    /// Creates an observer feeding `coordinator`.
    pub fn new(
        coordinator: AssetBuildCoordinator,
        finder: Arc<dyn PackageFinder>,
        cache: PackageCache,
    ) -> Self {
        Self {
            coordinator,
            finder,
            cache,
        }
    }

    /// Handles one discovered module.
    ///
    /// A module whose package is cached triggers the package right away.
    /// Otherwise the package finder runs in the background; its failure is
    /// fatal for the build and is reported through the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] for an empty module path.
    pub fn observe(&self, module: impl Into<PathBuf>) -> Result<()> {
        let module = module.into();
        if module.as_os_str().is_empty() {
            return Err(Error::InvariantViolation("missing file".to_string()));
        }

        if let Some(package_path) = self.cache.package_path(&module) {
            return self
                .coordinator
                .build_assets_for_package(package_path, None);
        }

        if !self.coordinator.begin_discovery(&module)? {
            log::debug!("Package lookup for {} already running", module.display());
            return Ok(());
        }

        let observer = self.clone();
        tokio::spawn(async move {
            observer.discover(module).await;
        });
        Ok(())
    }

    async fn discover(self, module: PathBuf) {
        let found = self.finder.find(&module).await.map_err(|e| match e {
            Error::PackageDiscovery { .. } => e,
            other => Error::PackageDiscovery {
                module: module.clone(),
                reason: other.to_string(),
            },
        });

        let outcome =
            found.and_then(|found| self.coordinator.complete_discovery(module.clone(), found));
        if let Err(error) = outcome {
            self.coordinator.fail(&module, error);
        }
    }
}

impl std::fmt::Debug for DependencyObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyObserver")
            .field("coordinator", &self.coordinator)
            .field("finder", &"<PackageFinder>")
            .finish()
    }
}
