//! Per-package asset pipeline.
//!
//! Expands a package's asset globs, runs every matched file through the
//! package's transform chain and appends the results to the aggregate stream.
//! Patterns and files fan out as independent tasks; a failure only removes the
//! affected pattern or file from the output.

use crate::bundler::{
    error::{Error, Result},
    package::Package,
    stream::AggregateAssetStream,
    transform::{TransformChain, TransformResolver},
    utils::fs::{expand_pattern, read_asset},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::task::JoinSet;

/// Builds the assets of one package into the aggregate stream.
#[derive(Debug, Clone)]
pub struct PackagePipeline {
    resolver: Arc<TransformResolver>,
    stream: AggregateAssetStream,
}

impl PackagePipeline {
    /// Creates a pipeline writing to `stream`.
    pub fn new(resolver: Arc<TransformResolver>, stream: AggregateAssetStream) -> Self {
        Self { resolver, stream }
    }

    /// Processes every asset declared by `package`.
    ///
    /// Completes once all pattern and file tasks have settled.
    ///
    /// # Arguments
    ///
    /// * `package_path` - Key of the package, used in error messages
    /// * `package` - The package to build
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every file was written, or the package has no root directory
    /// * `Err` - The first failure; transform resolution failures mean no
    ///   file was processed, any other failure only dropped its own file
    pub async fn run(&self, package_path: &Path, package: &Package) -> Result<()> {
        let Some(root_dir) = package.root_dir() else {
            log::debug!(
                "Package {} has no root directory, skipping assets",
                package_path.display()
            );
            return Ok(());
        };

        let chain = Arc::new(self.resolve_chain(package_path, package, root_dir).await?);
        if chain.is_empty() {
            log::debug!("Package {} has no transforms", package_path.display());
        } else {
            log::debug!(
                "Package {} resolved {} transform(s)",
                package_path.display(),
                chain.len()
            );
        }

        let mut patterns = JoinSet::new();
        for pattern in package.style() {
            patterns.spawn(build_pattern(
                root_dir.to_path_buf(),
                pattern.clone(),
                Arc::clone(&chain),
                self.stream.clone(),
            ));
        }

        settle(patterns).await
    }

    /// Resolves the transform chain on the blocking pool, since strategies
    /// search `PATH` and the package directory synchronously.
    async fn resolve_chain(
        &self,
        package_path: &Path,
        package: &Package,
        root_dir: &Path,
    ) -> Result<TransformChain> {
        let resolver = Arc::clone(&self.resolver);
        let specs = package.transforms().to_vec();
        let root_dir = root_dir.to_path_buf();
        let package_path = package_path.to_path_buf();

        tokio::task::spawn_blocking(move || resolver.resolve(&specs, &root_dir, &package_path))
            .await
            .map_err(|e| Error::GenericError(format!("Transform resolution task panicked: {}", e)))?
    }
}

async fn build_pattern(
    root_dir: PathBuf,
    pattern: String,
    chain: Arc<TransformChain>,
    stream: AggregateAssetStream,
) -> Result<()> {
    let files = expand_pattern(&root_dir, &pattern).await?;
    log::debug!(
        "Pattern {} in {} matched {} file(s)",
        pattern,
        root_dir.display(),
        files.len()
    );

    let mut tasks = JoinSet::new();
    for file in files {
        tasks.spawn(build_file(file, Arc::clone(&chain), stream.clone()));
    }
    settle(tasks).await
}

async fn build_file(
    file: PathBuf,
    chain: Arc<TransformChain>,
    stream: AggregateAssetStream,
) -> Result<()> {
    let content = read_asset(&file).await?;
    let transformed = chain.apply(&file, content).await?;
    stream.write_asset(&file, transformed)
}

/// Waits for every task and keeps the first failure.
async fn settle(mut tasks: JoinSet<Result<()>>) -> Result<()> {
    let mut first = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| Error::GenericError(format!("Asset task panicked: {}", e)))
            .and_then(|result| result);

        if let Err(err) = outcome {
            if first.is_none() {
                first = Some(err);
            } else {
                log::warn!("Additional asset failure: {}", err);
            }
        }
    }
    first.map_or(Ok(()), Err)
}
