//! Concurrent per-package asset aggregation.
//!
//! This module attaches a secondary asset pipeline to a module bundler's
//! dependency traversal. Every discovered module is mapped to its owning
//! package; each package is built once, its asset globs are expanded, matched
//! files run through the package's transform chain, and the results land in one
//! aggregate stream that closes exactly once when all work has settled.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_assets::bundler::{AssetBuild, AssetEvent, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_assets::bundler::Result<()> {
//! let settings = SettingsBuilder::new().build()?;
//! let (build, mut assets, _events) = AssetBuild::start(&settings);
//!
//! build.observe("/project/node_modules/widget/index.js")?;
//! build.metrics().finish();
//!
//! while let Some(event) = assets.recv().await {
//!     match event {
//!         AssetEvent::Chunk(bytes) => print!("{}", String::from_utf8_lossy(&bytes)),
//!         AssetEvent::Error(err) => eprintln!("{err}"),
//!         AssetEvent::End => break,
//!     }
//! }
//! build.finish().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`builder`] - per-build context, coordinator, observer, pipeline, metrics
//! - [`package`] - package manifests, finder and shared cache
//! - [`settings`] - configuration and the optional TOML config file
//! - [`stream`] - the aggregate asset stream
//! - [`transform`] - transform traits, builtins and resolution

pub mod builder;
pub mod error;
pub mod package;
pub mod settings;
pub mod stream;
pub mod transform;
mod utils;

pub use builder::{
    AssetBuild, AssetBuildCoordinator, BuildEvent, BuildEventReceiver, DependencyObserver,
    MetricsEmitter, PackagePipeline, Status,
};
pub use error::{Error, Result};
pub use package::{FoundPackage, ManifestFinder, Package, PackageCache, PackageFinder};
pub use settings::{ConfigFile, Settings, SettingsBuilder};
pub use stream::{AggregateAssetStream, AssetEvent, AssetStreamReceiver, PackageError};
pub use transform::{
    AssetTransform, ResolutionStrategy, TransformChain, TransformFactory, TransformRegistry,
    TransformResolver, TransformSpec, transform_fn,
};
