//! Optional `assets.toml` config file.

use crate::bundler::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "assets.toml";

/// Contents of an `assets.toml` file.
///
/// ```toml
/// manifest = "package.json"
/// dependency_dir = "node_modules"
/// separator = "\n"
///
/// [transforms]
/// autoprefix = "tools/autoprefix"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Manifest file name
    pub manifest: Option<String>,
    /// Dependency directory name
    pub dependency_dir: Option<String>,
    /// Chunk separator
    pub separator: Option<String>,
    /// Named transform commands, relative to the config file's directory
    #[serde(default)]
    pub transforms: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading config file", path)?;
        toml::from_str(&text).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "manifest = \"assets.json\"\ndependency_dir = \"vendor\"\n[transforms]\nx = \"bin/x\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.manifest.as_deref(), Some("assets.json"));
        assert_eq!(config.dependency_dir.as_deref(), Some("vendor"));
        assert_eq!(config.separator, None);
        assert_eq!(config.transforms.get("x").map(String::as_str), Some("bin/x"));
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "manifets = \"typo.json\"\n").unwrap();

        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
