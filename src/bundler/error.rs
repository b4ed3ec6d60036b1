//! Error types for asset aggregation.
//!
//! Errors are grouped by the scope they affect: a discovery failure aborts the
//! whole build, everything else is confined to one package, pattern or file and
//! is reported on the aggregate stream's error channel.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for asset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while discovering packages and building their assets.
#[derive(Error, Debug)]
pub enum Error {
    /// The package finder could not determine a module's owning package.
    ///
    /// Fatal: the build cannot know whether assets are missing.
    #[error("failed to discover package for module {module}: {reason}")]
    PackageDiscovery {
        /// Module whose package lookup failed
        module: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A declared transform could not be resolved by any strategy.
    #[error("couldn't resolve transform {spec} while processing package {package}")]
    TransformResolution {
        /// Transform reference as written in the manifest
        spec: String,
        /// Package path
        package: PathBuf,
    },

    /// A glob pattern was invalid or could not be expanded.
    #[error("failed to expand asset pattern {pattern}: {reason}")]
    AssetGlob {
        /// Pattern joined onto the package root
        pattern: String,
        /// Underlying cause
        reason: String,
    },

    /// An asset file could not be read.
    #[error("failed to read asset {path}: {source}")]
    AssetRead {
        /// Asset file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A transform failed while processing an asset file.
    #[error("transform failed for asset {path}: {reason}")]
    AssetTransform {
        /// Asset file
        path: PathBuf,
        /// Transform failure description
        reason: String,
    },

    /// Transformed content could not be written to the aggregate stream.
    #[error("failed to write asset {path}: {reason}")]
    AssetWrite {
        /// Asset file
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A package manifest could not be parsed.
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        /// Manifest file
        path: PathBuf,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// The settings config file could not be parsed.
    #[error("failed to parse config {path}: {reason}")]
    ConfigParse {
        /// Config file
        path: PathBuf,
        /// TOML parse error
        reason: String,
    },

    /// A required value was absent or a state transition was illegal.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// File system operation failed with context.
    #[error("{context} ({path}): {source}")]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether this error aborts the whole build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::PackageDiscovery { .. })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

/// Attaches file system context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts missing optional values into errors.
pub trait Context<T> {
    /// Returns [`Error::InvariantViolation`] with `msg` if the value is absent.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::InvariantViolation(msg.to_string()))
    }
}
