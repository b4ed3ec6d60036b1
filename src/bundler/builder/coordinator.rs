//! Asset build coordination and barrier detection.
//!
//! The coordinator owns the per-build status tables. It starts at most one
//! [`PackagePipeline`] per package and closes the aggregate stream exactly once,
//! as soon as the main traversal has finished and every tracked discovery and
//! package build is complete.
//!
//! Barrier detection is edge-triggered: it runs after every status change
//! instead of polling. State is only touched under the lock, and the lock is
//! never held across an `.await`.

use super::{
    events::{BuildEvent, BuildEventSender},
    pipeline::PackagePipeline,
    status::{Status, StatusTable},
};
use crate::bundler::{
    error::{Context, Error, Result},
    package::{FoundPackage, Package, PackageCache},
    stream::AggregateAssetStream,
};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::watch;

/// Overall progress of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Complete,
    Failed,
}

#[derive(Debug)]
struct BuildState {
    discovery: StatusTable<PathBuf>,
    builds: StatusTable<PathBuf>,
    main_traversal_complete: bool,
    closed: bool,
    fatal: Option<Error>,
}

impl BuildState {
    fn new() -> Self {
        Self {
            discovery: StatusTable::new("module"),
            builds: StatusTable::new("package"),
            main_traversal_complete: false,
            closed: false,
            fatal: None,
        }
    }

    /// Pure check of the three closing conditions.
    fn is_quiescent(&self) -> bool {
        self.main_traversal_complete && self.discovery.all_complete() && self.builds.all_complete()
    }
}

/// Deduplicates package builds and decides when the aggregate stream closes.
///
/// Cheap to clone; clones share the same build.
#[derive(Debug, Clone)]
pub struct AssetBuildCoordinator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<BuildState>,
    cache: PackageCache,
    pipeline: PackagePipeline,
    stream: AggregateAssetStream,
    events: BuildEventSender,
    phase: watch::Sender<Phase>,
}

impl AssetBuildCoordinator {
    /// Creates a coordinator for one build.
    pub fn new(
        cache: PackageCache,
        pipeline: PackagePipeline,
        stream: AggregateAssetStream,
        events: BuildEventSender,
    ) -> Self {
        let (phase, _) = watch::channel(Phase::Running);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(BuildState::new()),
                cache,
                pipeline,
                stream,
                events,
                phase,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BuildState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts building a package's assets unless it was already triggered.
    ///
    /// # Arguments
    ///
    /// * `package_path` - Package key
    /// * `package` - The loaded package, or `None` to take it from the cache
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] if the package is neither given
    /// nor cached.
    pub fn build_assets_for_package(
        &self,
        package_path: PathBuf,
        package: Option<Arc<Package>>,
    ) -> Result<()> {
        let started = {
            let mut state = self.state();
            self.start_package(&mut state, package_path, package)?
        };
        self.spawn_started(started);
        self.check_barrier();
        Ok(())
    }

    /// Marks a module as waiting for an asynchronous package lookup.
    ///
    /// Returns `false` if a lookup for the module was already recorded.
    pub fn begin_discovery(&self, module: &Path) -> Result<bool> {
        {
            let mut state = self.state();
            if state.discovery.get(&module.to_path_buf()) != Status::Pending {
                return Ok(false);
            }
            state
                .discovery
                .transition(module.to_path_buf(), Status::Started)?;
        }
        self.check_barrier();
        Ok(true)
    }

    /// Completes a module's lookup and starts its package.
    ///
    /// Both happen under one lock, so barrier detection can never observe the
    /// module complete before its package is tracked.
    pub fn complete_discovery(&self, module: PathBuf, found: FoundPackage) -> Result<()> {
        let package = self.inner.cache.insert(&module, found.clone());
        let started = {
            let mut state = self.state();
            state.discovery.transition(module, Status::Complete)?;
            self.start_package(&mut state, found.path, Some(package))?
        };
        self.spawn_started(started);
        self.check_barrier();
        Ok(())
    }

    /// Records that the main traversal has finished.
    pub fn main_traversal_complete(&self) {
        {
            let mut state = self.state();
            if state.main_traversal_complete {
                return;
            }
            state.main_traversal_complete = true;
        }
        log::debug!("Main traversal complete");
        self.check_barrier();
    }

    /// Aborts the build with a fatal error.
    ///
    /// The aggregate stream is left open: the build cannot know which assets
    /// are missing.
    pub fn fail(&self, module: &Path, error: Error) {
        log::error!("{}", error);
        self.inner.events.emit(BuildEvent::Fatal {
            module: module.to_path_buf(),
            message: error.to_string(),
        });
        {
            let mut state = self.state();
            if state.fatal.is_none() {
                state.fatal = Some(error);
            }
        }
        self.inner.phase.send_if_modified(|phase| {
            if *phase == Phase::Running {
                *phase = Phase::Failed;
                true
            } else {
                false
            }
        });
    }

    /// Waits until the aggregate stream is closed or the build fails.
    ///
    /// # Errors
    ///
    /// Returns the fatal discovery error that aborted the build.
    pub async fn finished(&self) -> Result<()> {
        let mut phase = self.inner.phase.subscribe();
        let outcome = *phase
            .wait_for(|phase| *phase != Phase::Running)
            .await
            .map_err(|_| Error::GenericError("build coordinator dropped".to_string()))?;

        match outcome {
            Phase::Failed => Err(self
                .state()
                .fatal
                .take()
                .unwrap_or_else(|| Error::GenericError("build failed".to_string()))),
            _ => Ok(()),
        }
    }

    /// Build status of a package.
    pub fn build_status(&self, package_path: &Path) -> Status {
        self.state().builds.get(&package_path.to_path_buf())
    }

    /// Discovery status of a module.
    pub fn discovery_status(&self, module: &Path) -> Status {
        self.state().discovery.get(&module.to_path_buf())
    }

    /// Whether the aggregate stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Marks a pending package as started; returns what to spawn, if anything.
    fn start_package(
        &self,
        state: &mut BuildState,
        package_path: PathBuf,
        package: Option<Arc<Package>>,
    ) -> Result<Option<(PathBuf, Arc<Package>)>> {
        if state.builds.get(&package_path) != Status::Pending {
            log::debug!("Package {} already triggered", package_path.display());
            return Ok(None);
        }

        let package = package
            .or_else(|| self.inner.cache.package(&package_path))
            .context("missing pkg")?
            .rooted_at(&package_path);

        state
            .builds
            .transition(package_path.clone(), Status::Started)?;
        Ok(Some((package_path, package)))
    }

    fn spawn_started(&self, started: Option<(PathBuf, Arc<Package>)>) {
        let Some((package_path, package)) = started else {
            return;
        };

        log::info!("Building assets for {}", package_path.display());
        self.inner.events.emit(BuildEvent::PackageStarted {
            package: package_path.clone(),
        });

        let coordinator = self.clone();
        tokio::spawn(async move {
            let result = coordinator
                .inner
                .pipeline
                .run(&package_path, &package)
                .await;
            coordinator.package_finished(package_path, result);
        });
    }

    fn package_finished(&self, package_path: PathBuf, result: Result<()>) {
        let failed = result.is_err();
        if let Err(error) = result {
            log::warn!(
                "Assets for {} incomplete: {}",
                package_path.display(),
                error
            );
            self.inner.stream.emit_error(&package_path, error);
        }

        if let Err(error) = self
            .state()
            .builds
            .transition(package_path.clone(), Status::Complete)
        {
            log::error!("{}", error);
        }

        log::info!("Finished assets for {}", package_path.display());
        self.inner.events.emit(BuildEvent::PackageComplete {
            package: package_path,
            failed,
        });
        self.check_barrier();
    }

    /// Closes the stream the first time the build is observed quiescent.
    fn check_barrier(&self) {
        let newly_closed = {
            let mut state = self.state();
            if state.closed || !state.is_quiescent() {
                false
            } else {
                state.closed = true;
                true
            }
        };
        if !newly_closed {
            return;
        }

        self.inner.stream.end();
        log::info!("All asset work complete");
        self.inner.events.emit(BuildEvent::AllAssetsComplete);
        self.inner.phase.send_if_modified(|phase| {
            if *phase == Phase::Running {
                *phase = Phase::Complete;
                true
            } else {
                false
            }
        });
    }
}
