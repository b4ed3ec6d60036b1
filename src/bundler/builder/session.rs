//! Per-build context.

use super::{
    coordinator::AssetBuildCoordinator,
    events::{self, BuildEventReceiver},
    metrics::MetricsEmitter,
    observer::DependencyObserver,
    pipeline::PackagePipeline,
};
use crate::bundler::{
    error::Result,
    package::{ManifestFinder, PackageFinder},
    settings::Settings,
    stream::{AggregateAssetStream, AssetStreamReceiver},
    transform::TransformResolver,
};
use std::{path::PathBuf, sync::Arc};

/// One asset build.
///
/// Owns all coordination state for the build; nothing but the
/// [`PackageCache`](crate::bundler::PackageCache) from the settings outlives it.
/// Must be started inside a Tokio runtime.
#[derive(Debug)]
pub struct AssetBuild {
    coordinator: AssetBuildCoordinator,
    observer: DependencyObserver,
    metrics: MetricsEmitter,
}

impl AssetBuild {
    /// Starts a build that locates packages with a [`ManifestFinder`].
    ///
    /// Returns the build, the aggregate asset stream and the build events.
    pub fn start(settings: &Settings) -> (Self, AssetStreamReceiver, BuildEventReceiver) {
        let finder = Arc::new(ManifestFinder::new(settings.manifest_name()));
        Self::start_with_finder(settings, finder)
    }

    /// Starts a build with a custom package finder.
    pub fn start_with_finder(
        settings: &Settings,
        finder: Arc<dyn PackageFinder>,
    ) -> (Self, AssetStreamReceiver, BuildEventReceiver) {
        let (stream, assets) = AggregateAssetStream::channel(settings.separator().to_owned());
        let (events, event_rx) = events::channel();

        let resolver = Arc::new(TransformResolver::new(
            settings.registry().clone(),
            settings.dependency_dir(),
        ));
        let pipeline = PackagePipeline::new(resolver, stream.clone());
        let coordinator =
            AssetBuildCoordinator::new(settings.cache().clone(), pipeline, stream, events.clone());
        let observer = DependencyObserver::new(coordinator.clone(), finder, settings.cache().clone());
        let metrics = MetricsEmitter::new(coordinator.clone(), events);

        (
            Self {
                coordinator,
                observer,
                metrics,
            },
            assets,
            event_rx,
        )
    }

    /// Feeds one discovered module into the build.
    pub fn observe(&self, module: impl Into<PathBuf>) -> Result<()> {
        self.observer.observe(module)
    }

    /// Returns the dependency observer.
    pub fn observer(&self) -> &DependencyObserver {
        &self.observer
    }

    /// Returns the main output instrumentation.
    pub fn metrics(&self) -> &MetricsEmitter {
        &self.metrics
    }

    /// Returns the coordinator.
    pub fn coordinator(&self) -> &AssetBuildCoordinator {
        &self.coordinator
    }

    /// Waits until all asset work is done and the stream is closed.
    ///
    /// # Errors
    ///
    /// Returns the fatal discovery error if the build was aborted.
    pub async fn finish(&self) -> Result<()> {
        self.coordinator.finished().await
    }
}
