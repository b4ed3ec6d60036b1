//! CLI integration tests using the real binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::PathBuf};

#[allow(deprecated)]
fn assets_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_assets").unwrap();
    cmd.env_remove("KODEGEN_ASSETS_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("RUST_LOG_STYLE")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_help_output() {
    assets_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bundle-output"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_assets_written_to_stdout() {
    let cwd = tempfile::tempdir().unwrap();
    assets_cmd()
        .current_dir(cwd.path())
        .arg(fixture("app"))
        .assert()
        .success()
        .stdout("body { margin: 0; }\n");
}

#[test]
fn test_output_and_bundle_files() {
    let out = tempfile::tempdir().unwrap();
    let assets = out.path().join("dist/app.css");
    let bundle = out.path().join("dist/app.js");

    assets_cmd()
        .current_dir(out.path())
        .arg(fixture("app/src"))
        .arg("--output")
        .arg(&assets)
        .arg("--bundle-output")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("1 asset chunk(s)"));

    assert_eq!(fs::read_to_string(&assets).unwrap(), "body { margin: 0; }\n");
    assert_eq!(
        fs::read_to_string(&bundle).unwrap(),
        "import './widget.js';\nexport const widget = 1;\n"
    );
}

#[test]
fn test_dependency_dir_is_not_traversed() {
    let cwd = tempfile::tempdir().unwrap();
    assets_cmd()
        .current_dir(cwd.path())
        .arg(fixture("app"))
        .assert()
        .success()
        .stdout(predicate::str::contains("DEP").not());
}

fn broken_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "style": "*.css", "transforms": ["asset-transform-that-does-not-exist"] }"#,
    )
    .unwrap();
    fs::write(dir.path().join("a.css"), "a").unwrap();
    fs::write(dir.path().join("index.js"), "").unwrap();
    dir
}

#[test]
fn test_package_errors_are_warnings_by_default() {
    let dir = broken_project();
    assets_cmd()
        .current_dir(dir.path())
        .arg("index.js")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "couldn't resolve transform asset-transform-that-does-not-exist",
        ));
}

#[test]
fn test_color_always_paints_warnings() {
    let dir = broken_project();
    assets_cmd()
        .current_dir(dir.path())
        .args(["--color", "always", "index.js"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\u{1b}["))
        .stderr(predicate::str::contains("warning:"));
}

#[test]
fn test_piped_stderr_is_not_painted() {
    let dir = broken_project();
    assets_cmd()
        .current_dir(dir.path())
        .arg("index.js")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: couldn't resolve transform"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_strict_mode_exit_code() {
    let dir = broken_project();
    assets_cmd()
        .current_dir(dir.path())
        .args(["--strict", "index.js"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_manifest_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("orphan.js"), "").unwrap();

    assets_cmd()
        .current_dir(dir.path())
        .args(["--manifest", "asset-manifest-that-does-not-exist.json", "orphan.js"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_missing_module_path() {
    let dir = tempfile::tempdir().unwrap();
    assets_cmd()
        .current_dir(dir.path())
        .arg("missing.js")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Module path not found"));
}

#[test]
fn test_conflicting_outputs() {
    let dir = tempfile::tempdir().unwrap();
    assets_cmd()
        .current_dir(dir.path())
        .args(["-o", "same.out", "-b", "same.out"])
        .arg(fixture("app"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Conflicting arguments"));
}

#[cfg(unix)]
#[test]
fn test_config_file_separator_and_command_transform() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let tools = dir.path().join("tools");
    fs::create_dir(&tools).unwrap();
    let upper = tools.join("upper");
    fs::write(&upper, "#!/bin/sh\ntr a-z A-Z\n").unwrap();
    fs::set_permissions(&upper, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.path().join("assets.toml"),
        "separator = \"|\"\n[transforms]\nupper = \"tools/upper\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "style": ["a.css", "b.css"], "transforms": ["upper"] }"#,
    )
    .unwrap();
    fs::write(dir.path().join("a.css"), "a").unwrap();
    fs::write(dir.path().join("b.css"), "b").unwrap();
    fs::write(dir.path().join("index.js"), "").unwrap();

    let output = assets_cmd()
        .current_dir(dir.path())
        .arg("index.js")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let mut chunks: Vec<_> = String::from_utf8(output.stdout)
        .unwrap()
        .split_terminator('|')
        .map(str::to_string)
        .collect();
    chunks.sort();
    assert_eq!(chunks, vec!["A", "B"]);
}
