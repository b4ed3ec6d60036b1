//! Package manifest model.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    transform::TransformSpec,
};
use serde::{Deserialize, Deserializer};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// A package's asset declarations.
///
/// Loaded from the package manifest (`package.json` by default). Only the
/// fields relevant to asset building are read; everything else in the manifest
/// is ignored.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_assets::bundler::Package;
///
/// let package = Package::from_json(r#"{"style": "*.css", "transforms": ["trim"]}"#).unwrap();
/// assert_eq!(package.style(), ["*.css"]);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Package {
    /// Package name, informational only.
    #[serde(default)]
    name: Option<String>,

    /// Asset glob patterns relative to the package root.
    ///
    /// The manifest may give a single pattern or a list.
    #[serde(default, deserialize_with = "one_or_many")]
    style: Vec<String>,

    /// Ordered transform chain applied to every matched asset.
    #[serde(default)]
    transforms: Vec<TransformSpec>,

    /// Directory the globs and local transforms are resolved against.
    #[serde(skip)]
    root_dir: Option<PathBuf>,
}

impl Package {
    /// Creates an empty package with no assets and no root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses manifest JSON. The root directory is left unset.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a manifest file, rooting the package at its directory.
    pub async fn load(manifest_path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(manifest_path)
            .await
            .fs_context("reading package manifest", manifest_path)?;

        let package = Self::from_json(&json).map_err(|source| Error::ManifestParse {
            path: manifest_path.to_path_buf(),
            source,
        })?;

        Ok(match root_dir_of(manifest_path) {
            Some(dir) => package.with_root_dir(dir),
            None => package,
        })
    }

    /// Sets the package name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the asset glob patterns.
    pub fn with_style<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the transform chain.
    pub fn with_transforms(mut self, transforms: Vec<TransformSpec>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Sets the root directory.
    pub fn with_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    /// Returns the package name, if the manifest declares one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the asset glob patterns.
    pub fn style(&self) -> &[String] {
        &self.style
    }

    /// Returns the transform chain.
    pub fn transforms(&self) -> &[TransformSpec] {
        &self.transforms
    }

    /// Returns the root directory, if one could be determined.
    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }

    /// Fills in the root directory from the package path when it is unset.
    ///
    /// A package that already has a root directory is returned unchanged, so
    /// the directory is derived at most once.
    pub fn rooted_at(self: Arc<Self>, package_path: &Path) -> Arc<Self> {
        if self.root_dir.is_some() {
            return self;
        }
        match root_dir_of(package_path) {
            Some(dir) => Arc::new(Package::clone(&self).with_root_dir(dir)),
            None => self,
        }
    }
}

/// Directory containing a manifest, or `None` for bare file names.
fn root_dir_of(package_path: &Path) -> Option<PathBuf> {
    package_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(pattern)) => vec![pattern],
        Some(OneOrMany::Many(patterns)) => patterns,
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_style_pattern_becomes_list() {
        let package = Package::from_json(r#"{"name": "a", "style": "index.css"}"#).unwrap();
        assert_eq!(package.style(), ["index.css"]);
        assert_eq!(package.name(), Some("a"));
        assert!(package.transforms().is_empty());
    }

    #[test]
    fn style_list_and_transforms_are_kept_in_order() {
        let package = Package::from_json(
            r#"{"style": ["a/*.css", "b/*.css"], "transforms": ["trim", "./bin/x"], "main": "i.js"}"#,
        )
        .unwrap();
        assert_eq!(package.style(), ["a/*.css", "b/*.css"]);
        let names: Vec<_> = package.transforms().iter().map(TransformSpec::name).collect();
        assert_eq!(names, ["trim", "./bin/x"]);
    }

    #[test]
    fn null_style_means_no_assets() {
        let package = Package::from_json(r#"{"style": null}"#).unwrap();
        assert!(package.style().is_empty());
    }

    #[test]
    fn root_dir_derived_from_package_path_once() {
        let package = Arc::new(Package::new());
        let rooted = package.rooted_at(Path::new("/pkg/a/package.json"));
        assert_eq!(rooted.root_dir(), Some(Path::new("/pkg/a")));

        let again = rooted.clone().rooted_at(Path::new("/elsewhere/package.json"));
        assert!(Arc::ptr_eq(&rooted, &again));
        assert_eq!(again.root_dir(), Some(Path::new("/pkg/a")));
    }

    #[test]
    fn bare_package_path_has_no_root_dir() {
        let package = Arc::new(Package::new()).rooted_at(Path::new("package.json"));
        assert!(package.root_dir().is_none());
    }

    #[tokio::test]
    async fn load_roots_package_at_manifest_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, r#"{"style": ["*.css"]}"#).unwrap();

        let package = Package::load(&manifest).await.unwrap();
        assert_eq!(package.root_dir(), Some(dir.path()));
    }

    #[tokio::test]
    async fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, "{ not json").unwrap();

        let err = Package::load(&manifest).await.unwrap_err();
        assert!(matches!(err, Error::ManifestParse { ref path, .. } if path == &manifest));
    }
}
