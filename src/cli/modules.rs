//! Module collection from command line paths.

use crate::error::{CliError, Result};
use path_absolutize::Absolutize;
use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Expands `inputs` into absolute module paths.
///
/// Files are taken as given. Directories are walked for files with
/// `extension`, skipping any directory named `skip_dir`, and contribute their
/// modules in sorted order. A module listed twice is kept once, at its first
/// position.
pub fn collect(inputs: &[PathBuf], extension: &str, skip_dir: &str) -> Result<Vec<PathBuf>> {
    let mut modules = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(CliError::ModuleNotFound {
                path: input.display().to_string(),
            }
            .into());
        }

        let input = input.absolutize()?.into_owned();
        if input.is_dir() {
            modules.extend(walk(&input, extension, skip_dir)?);
        } else {
            modules.push(input);
        }
    }

    let mut seen = std::collections::HashSet::new();
    modules.retain(|module| seen.insert(module.clone()));
    Ok(modules)
}

fn walk(dir: &Path, extension: &str, skip_dir: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, skip_dir));

    for entry in entries {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(extension)) {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

fn is_skipped(entry: &walkdir::DirEntry, skip_dir: &str) -> bool {
    entry.file_type().is_dir() && entry.file_name() == OsStr::new(skip_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_directories_skipping_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        fs::write(root.join("src/b.js"), "").unwrap();
        fs::write(root.join("src/a.js"), "").unwrap();
        fs::write(root.join("src/nested/c.js"), "").unwrap();
        fs::write(root.join("src/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/dep/index.js"), "").unwrap();

        let modules = collect(&[root.to_path_buf()], "js", "node_modules").unwrap();
        let names: Vec<_> = modules
            .iter()
            .map(|m| m.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("src/a.js"),
                PathBuf::from("src/b.js"),
                PathBuf::from("src/nested/c.js"),
            ]
        );
    }

    #[test]
    fn explicit_files_keep_their_order_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mjs");
        let b = dir.path().join("b.js");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let modules = collect(&[b.clone(), a.clone(), b.clone()], "js", "node_modules").unwrap();
        assert_eq!(modules, vec![b, a]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = collect(&[PathBuf::from("/definitely/not/here.js")], "js", "node_modules")
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
