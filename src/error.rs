//! Error types for the command line surface.
//!
//! Domain failures live in [`crate::bundler::Error`]; this module wraps them
//! together with argument and IO errors and attaches recovery suggestions.

use crate::bundler::{self, settings::CONFIG_FILE_NAME};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset build errors
    #[error("Asset build error: {0}")]
    Bundler(#[from] bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A module path given on the command line does not exist
    #[error("Module path not found: {path}")]
    ModuleNotFound {
        /// Path as given
        path: String,
    },

    /// Conflicting arguments
    #[error("Conflicting arguments: {arguments:?}")]
    ConflictingArguments {
        /// Arguments that conflict
        arguments: Vec<String>,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Cli(CliError::ModuleNotFound { .. }) => vec![
                "Pass existing module files or directories".to_string(),
            ],
            BundlerError::Cli(_) => vec!["Run with --help to see usage".to_string()],
            BundlerError::Bundler(bundler::Error::PackageDiscovery { .. }) => vec![
                "Make sure every module has a package manifest in one of its parent directories"
                    .to_string(),
                "Use --manifest if packages use a manifest name other than package.json"
                    .to_string(),
            ],
            BundlerError::Bundler(bundler::Error::ConfigParse { .. }) => vec![format!(
                "Check {CONFIG_FILE_NAME}: allowed keys are manifest, dependency_dir, separator and [transforms]"
            )],
            BundlerError::Io(_) | BundlerError::Bundler(bundler::Error::Fs { .. }) => {
                vec!["Check that the paths exist and are readable".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
