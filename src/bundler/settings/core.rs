//! Core Settings struct and implementations.

use crate::bundler::{package::PackageCache, transform::TransformRegistry};

/// Settings for asset builds.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). One `Settings`
/// can start any number of builds; builds started from the same settings share
/// the package cache.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .manifest_name("package.json")
///     .dependency_dir("node_modules")
///     .build()?;
/// assert_eq!(settings.separator(), "\n");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// File name of package manifests.
    manifest_name: String,

    /// Directory under a package root holding its dependencies.
    dependency_dir: String,

    /// Appended to every chunk of the aggregate stream.
    separator: String,

    /// Named transforms available to every package.
    registry: TransformRegistry,

    /// Shared module → package cache.
    cache: PackageCache,
}

impl Settings {
    /// Returns the manifest file name.
    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }

    /// Returns the dependency directory name.
    pub fn dependency_dir(&self) -> &str {
        &self.dependency_dir
    }

    /// Returns the chunk separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the transform registry.
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Returns the package cache.
    pub fn cache(&self) -> &PackageCache {
        &self.cache
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        manifest_name: String,
        dependency_dir: String,
        separator: String,
        registry: TransformRegistry,
        cache: PackageCache,
    ) -> Self {
        Self {
            manifest_name,
            dependency_dir,
            separator,
            registry,
            cache,
        }
    }
}
