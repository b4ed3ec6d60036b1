//! Locating the package that owns a module.

use super::Package;
use crate::bundler::error::{Error, Result};
use futures_lite::future::Boxed;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Default manifest file name.
pub const DEFAULT_MANIFEST_NAME: &str = "package.json";

/// A package located by a [`PackageFinder`].
#[derive(Debug, Clone)]
pub struct FoundPackage {
    /// Package path (the manifest file); the key packages are tracked by.
    pub path: PathBuf,
    /// Loaded package.
    pub package: Package,
}

/// Finds the nearest package owning a module.
///
/// Implementations run asynchronously; the returned future must not borrow
/// from the finder or the module path.
pub trait PackageFinder: Send + Sync {
    /// Locates and loads the package owning `module`.
    fn find(&self, module: &Path) -> Boxed<Result<FoundPackage>>;
}

/// Finder that walks up from a module to the nearest manifest file.
#[derive(Debug, Clone)]
pub struct ManifestFinder {
    manifest_name: String,
}

impl ManifestFinder {
    /// Creates a finder looking for manifests named `manifest_name`.
    pub fn new(manifest_name: impl Into<String>) -> Self {
        Self {
            manifest_name: manifest_name.into(),
        }
    }

    /// Returns the manifest file name this finder looks for.
    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }
}

impl Default for ManifestFinder {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_NAME)
    }
}

impl PackageFinder for ManifestFinder {
    fn find(&self, module: &Path) -> Boxed<Result<FoundPackage>> {
        // Relative modules resolve against the current directory now, so every
        // manifest found has a real parent directory.
        let module = module
            .absolutize()
            .map(|abs| abs.into_owned())
            .map_err(|e| Error::PackageDiscovery {
                module: module.to_path_buf(),
                reason: e.to_string(),
            });
        let manifest_name = self.manifest_name.clone();
        Box::pin(async move { find_manifest(module?, &manifest_name).await })
    }
}

async fn find_manifest(module: PathBuf, manifest_name: &str) -> Result<FoundPackage> {
    let start = module.parent().unwrap_or(Path::new(""));

    for dir in start.ancestors() {
        let candidate = dir.join(manifest_name);
        let exists = tokio::fs::try_exists(&candidate)
            .await
            .map_err(|e| Error::PackageDiscovery {
                module: module.clone(),
                reason: format!("cannot check {}: {}", candidate.display(), e),
            })?;
        if !exists {
            continue;
        }

        log::debug!(
            "Module {} belongs to package {}",
            module.display(),
            candidate.display()
        );
        let package = Package::load(&candidate)
            .await
            .map_err(|e| Error::PackageDiscovery {
                module: module.clone(),
                reason: e.to_string(),
            })?;
        return Ok(FoundPackage {
            path: candidate,
            package,
        });
    }

    Err(Error::PackageDiscovery {
        reason: format!("no {manifest_name} found in any parent directory"),
        module,
    })
}
