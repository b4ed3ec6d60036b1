//! Concurrent per-package asset aggregation for module bundlers
//!
//! While a bundler walks its module graph, every discovered module is mapped
//! to the package that owns it. Each package's manifest may declare asset
//! globs (`style`) and an ordered transform chain (`transforms`); matched
//! files are read, transformed and appended to one aggregate stream, which is
//! closed once the main traversal and every package pipeline have finished.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
