//! Resolution of transform references into factories.

use super::{CommandTransform, TransformChain, TransformFactory, TransformRegistry, TransformSpec};
use crate::bundler::{
    error::{Error, Result},
    utils::fs::is_local_path,
};
use path_absolutize::Absolutize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Default directory holding a package's own dependencies.
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";

/// One way of turning a transform name into a factory.
///
/// Strategies are tried in a fixed order by [`TransformResolver`]:
/// [`Registry`](Self::Registry) first, then either
/// [`PackageLocal`](Self::PackageLocal) for local-style names or
/// [`PackageDependency`](Self::PackageDependency) for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Registered name, then an executable of that name on `PATH`.
    Registry,
    /// Path relative to the package root.
    PackageLocal,
    /// Path under the package's dependency directory.
    PackageDependency,
}

/// Why a single strategy did not produce a factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyMiss {
    /// Name is neither registered nor an executable on `PATH`.
    NotRegistered,
    /// The candidate file does not exist or is not a file.
    NotFound(PathBuf),
}

impl ResolutionStrategy {
    /// Strategies to try for `name`, in order.
    pub fn order_for(name: &str) -> [ResolutionStrategy; 2] {
        if is_local_path(name) {
            [Self::Registry, Self::PackageLocal]
        } else {
            [Self::Registry, Self::PackageDependency]
        }
    }

    fn resolve(
        self,
        name: &str,
        resolver: &TransformResolver,
        root_dir: &Path,
    ) -> std::result::Result<Arc<dyn TransformFactory>, StrategyMiss> {
        match self {
            Self::Registry => {
                if let Some(factory) = resolver.registry.get(name) {
                    return Ok(factory);
                }
                if is_local_path(name) || name.contains(['/', '\\']) {
                    return Err(StrategyMiss::NotRegistered);
                }
                which::which(name)
                    .map(command)
                    .map_err(|_| StrategyMiss::NotRegistered)
            }
            Self::PackageLocal => existing_file(root_dir.join(name)),
            Self::PackageDependency => {
                existing_file(root_dir.join(&resolver.dependency_dir).join(name))
            }
        }
    }
}

fn command(program: PathBuf) -> Arc<dyn TransformFactory> {
    Arc::new(CommandTransform::new(program))
}

fn existing_file(candidate: PathBuf) -> std::result::Result<Arc<dyn TransformFactory>, StrategyMiss> {
    let candidate = match candidate.absolutize() {
        Ok(normalized) => normalized.into_owned(),
        Err(_) => return Err(StrategyMiss::NotFound(candidate)),
    };
    if candidate.is_file() {
        Ok(command(candidate))
    } else {
        Err(StrategyMiss::NotFound(candidate))
    }
}

/// Resolves a package's transform specs into a [`TransformChain`].
#[derive(Debug, Clone)]
pub struct TransformResolver {
    registry: TransformRegistry,
    dependency_dir: String,
}

impl TransformResolver {
    /// Creates a resolver backed by `registry`, looking for package
    /// dependencies under `dependency_dir`.
    pub fn new(registry: TransformRegistry, dependency_dir: impl Into<String>) -> Self {
        Self {
            registry,
            dependency_dir: dependency_dir.into(),
        }
    }

    /// Returns the registry consulted first.
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Resolves every spec in order.
    ///
    /// # Arguments
    ///
    /// * `specs` - Transform references as declared by the package
    /// * `root_dir` - Package root used for path-based strategies
    /// * `package` - Package path, used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransformResolution`] for the first spec no strategy
    /// can resolve.
    pub fn resolve(
        &self,
        specs: &[TransformSpec],
        root_dir: &Path,
        package: &Path,
    ) -> Result<TransformChain> {
        specs
            .iter()
            .map(|spec| self.resolve_one(spec, root_dir, package))
            .collect::<Result<Vec<_>>>()
            .map(TransformChain::new)
    }

    fn resolve_one(
        &self,
        spec: &TransformSpec,
        root_dir: &Path,
        package: &Path,
    ) -> Result<Arc<dyn TransformFactory>> {
        let name = match spec {
            TransformSpec::Inline(factory) => return Ok(Arc::clone(factory)),
            TransformSpec::Named(name) => name,
        };

        for strategy in ResolutionStrategy::order_for(name) {
            match strategy.resolve(name, self, root_dir) {
                Ok(factory) => {
                    log::debug!("Resolved transform {name} via {strategy:?}");
                    return Ok(factory);
                }
                Err(miss) => log::debug!("Transform {name} not resolved via {strategy:?}: {miss:?}"),
            }
        }

        Err(Error::TransformResolution {
            spec: name.clone(),
            package: package.to_path_buf(),
        })
    }
}

impl Default for TransformResolver {
    fn default() -> Self {
        Self::new(TransformRegistry::with_builtins(), DEFAULT_DEPENDENCY_DIR)
    }
}
