//! Asset build orchestration and coordination.
//!
//! This module provides [`AssetBuild`], the per-build context that wires the
//! pieces together:
//!
//! 1. [`DependencyObserver`] receives each module the bundler discovers
//! 2. [`AssetBuildCoordinator`] deduplicates packages and tracks progress
//! 3. [`PackagePipeline`] builds one package's assets
//! 4. [`MetricsEmitter`] instruments the main output and signals its end
//!
//! The aggregate stream closes exactly once, after the main output has ended
//! and every package lookup and package build has settled.
//!
//! # Module Organization
//!
//! - [`coordinator`] - status tables, deduplication, barrier detection
//! - [`events`] - build-level notifications
//! - [`metrics`] - byte and time instrumentation
//! - [`observer`] - dependency event adapter
//! - [`pipeline`] - per-package glob expansion and transforms
//! - [`session`] - the per-build context
//! - [`status`] - monotonic status tables

pub mod coordinator;
pub mod events;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod session;
pub mod status;

pub use coordinator::AssetBuildCoordinator;
pub use events::{BuildEvent, BuildEventReceiver};
pub use metrics::MetricsEmitter;
pub use observer::DependencyObserver;
pub use pipeline::PackagePipeline;
pub use session::AssetBuild;
pub use status::{Status, StatusTable};
