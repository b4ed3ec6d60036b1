//! Modules observed by relative path.
//!
//! Kept in its own test binary since it changes the process working directory.

use kodegen_bundler_assets::bundler::{AssetBuild, SettingsBuilder};
use std::fs;

#[tokio::test]
async fn relative_module_contributes_its_package_assets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "style": "*.css" }"#).unwrap();
    fs::write(dir.path().join("a.css"), "body{}").unwrap();
    fs::write(dir.path().join("index.js"), "").unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let settings = SettingsBuilder::new().build().unwrap();
    let (build, assets, _events) = AssetBuild::start(&settings);

    build.observe("index.js").unwrap();
    build.metrics().finish();
    build.finish().await.unwrap();

    let collected = assets.collect().await;
    assert!(collected.errors.is_empty(), "{:?}", collected.errors);
    assert_eq!(collected.chunk_strings(), vec!["body{}\n"]);
}
