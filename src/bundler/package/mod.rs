//! Packages, package discovery and the shared package cache.

mod cache;
mod finder;
mod manifest;

pub use cache::PackageCache;
pub use finder::{DEFAULT_MANIFEST_NAME, FoundPackage, ManifestFinder, PackageFinder};
pub use manifest::Package;
