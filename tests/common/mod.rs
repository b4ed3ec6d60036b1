//! Shared helpers for asset build integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use futures_lite::future::Boxed;
use kodegen_bundler_assets::bundler::{
    AssetTransform, Error, FoundPackage, Package, PackageFinder, Result, TransformFactory,
    TransformSpec, transform_fn,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Finder answering from a fixed module → package table.
#[derive(Default)]
pub struct StaticFinder {
    packages: HashMap<PathBuf, FoundPackage>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `module` to the package at `package_path`.
    pub fn with(mut self, module: impl Into<PathBuf>, package_path: impl Into<PathBuf>, package: Package) -> Self {
        self.packages.insert(
            module.into(),
            FoundPackage {
                path: package_path.into(),
                package,
            },
        );
        self
    }

    /// Delays every lookup.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle counting lookups.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl PackageFinder for StaticFinder {
    fn find(&self, module: &Path) -> Boxed<Result<FoundPackage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let found = self.packages.get(module).cloned();
        let module = module.to_path_buf();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            found.ok_or_else(|| Error::PackageDiscovery {
                module,
                reason: "no package".to_string(),
            })
        })
    }
}

/// Writes `files` (relative path, content) under `dir`.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Wraps content in a CSS comment.
pub fn wrap_comment() -> TransformSpec {
    transform_fn(|css: Bytes| {
        Ok(Bytes::from(format!("/*{}*/", String::from_utf8_lossy(&css))))
    })
}

/// Prefixes content with `tag(` and suffixes it with `)`.
pub fn tagged(tag: &'static str) -> TransformSpec {
    transform_fn(move |b: Bytes| {
        Ok(Bytes::from(format!("{tag}({})", String::from_utf8_lossy(&b))))
    })
}

/// Identity transform counting how many per-file stages it creates.
pub struct CountingFactory {
    pub created: Arc<AtomicUsize>,
}

impl CountingFactory {
    pub fn spec() -> (TransformSpec, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let factory = Arc::new(Self {
            created: Arc::clone(&created),
        });
        (TransformSpec::Inline(factory), created)
    }
}

impl TransformFactory for CountingFactory {
    fn create(&self, _file: &Path) -> Box<dyn AssetTransform> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(Identity)
    }
}

struct Identity;

impl AssetTransform for Identity {
    fn apply(self: Box<Self>, input: Bytes) -> Boxed<Result<Bytes>> {
        Box::pin(async move { Ok(input) })
    }
}

/// Sorted chunk strings, for order-independent comparisons.
pub fn sorted(mut chunks: Vec<String>) -> Vec<String> {
    chunks.sort();
    chunks
}
