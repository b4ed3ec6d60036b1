//! File system utilities for asset building.
//!
//! Provides glob expansion against a package root and asset reads with
//! asset-scoped error reporting.

use crate::bundler::error::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Whether a transform reference names a local path (`./x`, `../x`, `/x`).
pub fn is_local_path(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('/') || name.starts_with(std::path::MAIN_SEPARATOR)
}

/// Expands `pattern` relative to `root_dir` into the matching files.
///
/// Runs on the blocking pool since glob iteration reads directories
/// synchronously. Directories matched by the pattern are skipped.
///
/// # Errors
///
/// Returns [`Error::AssetGlob`] if the pattern is invalid or a directory
/// could not be read while expanding it.
pub async fn expand_pattern(root_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped_root = glob::Pattern::escape(&root_dir.to_string_lossy());
    let joined = Path::new(&escaped_root).join(pattern);
    let joined = joined.to_string_lossy().into_owned();

    tokio::task::spawn_blocking(move || {
        let glob_error = |reason: String| Error::AssetGlob {
            pattern: joined.clone(),
            reason,
        };

        let paths = glob::glob(&joined).map_err(|e| glob_error(e.to_string()))?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| glob_error(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Glob expansion task panicked: {}", e)))?
}

/// Reads an asset file's full content.
pub async fn read_asset(path: &Path) -> Result<Bytes> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|source| Error::AssetRead {
            path: path.to_path_buf(),
            source,
        })
}
