//! Builder for constructing Settings.

use super::{ConfigFile, Settings};
use crate::bundler::{
    error::Result,
    package::{DEFAULT_MANIFEST_NAME, PackageCache},
    stream::DEFAULT_SEPARATOR,
    transform::{DEFAULT_DEPENDENCY_DIR, TransformFactory, TransformRegistry},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Builder for constructing [`Settings`].
///
/// Every field has a default, so `SettingsBuilder::new().build()` yields
/// usable settings: `package.json` manifests, `node_modules` dependencies,
/// newline separators and the builtin transforms.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .separator("\n\n")
///     .transform_command("autoprefix", "/usr/local/bin/autoprefix")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    manifest_name: Option<String>,
    dependency_dir: Option<String>,
    separator: Option<String>,
    registry: Option<TransformRegistry>,
    commands: Vec<(String, PathBuf)>,
    factories: Vec<(String, Arc<dyn TransformFactory>)>,
    cache: Option<PackageCache>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from a parsed config file.
    ///
    /// Relative transform command paths are resolved against `base_dir`,
    /// normally the directory holding the config file.
    pub fn from_config(config: &ConfigFile, base_dir: &Path) -> Self {
        let mut builder = Self::new();
        builder.manifest_name = config.manifest.clone();
        builder.dependency_dir = config.dependency_dir.clone();
        builder.separator = config.separator.clone();
        builder.commands = config
            .transforms
            .iter()
            .map(|(name, program)| (name.clone(), base_dir.join(program)))
            .collect();
        builder
    }

    /// Sets the manifest file name.
    ///
    /// Default: `package.json`
    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = Some(name.into());
        self
    }

    /// Sets the dependency directory name.
    ///
    /// Default: `node_modules`
    pub fn dependency_dir(mut self, dir: impl Into<String>) -> Self {
        self.dependency_dir = Some(dir.into());
        self
    }

    /// Sets the chunk separator.
    ///
    /// Default: `"\n"`
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Replaces the base transform registry.
    ///
    /// Default: [`TransformRegistry::with_builtins`]
    pub fn registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Registers an external program as a named transform.
    pub fn transform_command(mut self, name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        self.commands.push((name.into(), program.into()));
        self
    }

    /// Registers a factory as a named transform.
    pub fn transform(mut self, name: impl Into<String>, factory: Arc<dyn TransformFactory>) -> Self {
        self.factories.push((name.into(), factory));
        self
    }

    /// Shares an existing package cache with the builds.
    ///
    /// Default: a fresh cache
    pub fn cache(mut self, cache: PackageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest name or dependency directory is empty.
    pub fn build(self) -> Result<Settings> {
        let manifest_name = self
            .manifest_name
            .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string());
        let dependency_dir = self
            .dependency_dir
            .unwrap_or_else(|| DEFAULT_DEPENDENCY_DIR.to_string());

        if manifest_name.is_empty() {
            crate::bail!("manifest name must not be empty");
        }
        if dependency_dir.is_empty() {
            crate::bail!("dependency dir must not be empty");
        }

        let mut registry = self
            .registry
            .unwrap_or_else(TransformRegistry::with_builtins);
        for (name, program) in self.commands {
            registry.register_command(name, program);
        }
        for (name, factory) in self.factories {
            registry.register(name, factory);
        }

        Ok(Settings::new(
            manifest_name,
            dependency_dir,
            self.separator
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            registry,
            self.cache.unwrap_or_default(),
        ))
    }
}
