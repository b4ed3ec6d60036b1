//! Command line interface for the asset bundler.
//!
//! Walks the given modules in order, feeding each one to an [`AssetBuild`]
//! while its bytes go through the main output instrumentation, and writes the
//! aggregate asset stream to `--output` or stdout.

mod args;
mod modules;
mod output;
mod sink;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;
pub use sink::AssetReport;

use crate::{
    bundler::{AssetBuild, BuildEvent, ConfigFile, Settings, SettingsBuilder, settings::CONFIG_FILE_NAME},
    error::{CliError, Result},
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Exit code when packages failed under `--strict`.
pub const EXIT_PACKAGE_ERRORS: i32 = 2;

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    if let Some(arguments) = args.conflicting_outputs() {
        return Err(CliError::ConflictingArguments { arguments }.into());
    }

    let config = RuntimeConfig::from(&args);
    let settings = load_settings(&args).await?;

    let modules = modules::collect(
        &args.modules,
        args.module_extension(),
        settings.dependency_dir(),
    )?;
    if modules.is_empty() {
        config.warn(&format!(
            "no .{} modules found; only an empty asset stream will be written",
            args.module_extension()
        ))?;
    }
    config.verbose_println(&format!("Traversing {} module(s)", modules.len()))?;

    let (build, assets, mut events) = AssetBuild::start(&settings);
    let sink = sink::open(args.output.as_deref()).await?;
    let writer = tokio::spawn(sink::drain(assets, sink));

    // Main traversal: every module is observed before its bytes are emitted
    let mut bundle = Vec::new();
    for module in &modules {
        build.observe(module.clone())?;
        bundle.push(tokio::fs::read(module).await?);
    }
    build.metrics().record_complete();

    write_bundle(&build, args.bundle_output.as_deref(), &bundle).await?;
    build.metrics().finish();

    if let Err(e) = build.finish().await {
        writer.abort();
        report_fatal(&config, events.drain())?;
        return Err(e.into());
    }

    let report = writer.await.map_err(anyhow::Error::from)??;
    let packages = events
        .drain()
        .iter()
        .filter(|event| matches!(event, BuildEvent::PackageComplete { .. }))
        .count();

    for error in &report.errors {
        config.warn(error)?;
    }
    config.success(&format!(
        "{} asset chunk(s), {} bytes from {} package(s)",
        report.chunks, report.bytes, packages
    ))?;

    if args.strict && !report.errors.is_empty() {
        config.indent(&format!(
            "{} package error(s) with --strict",
            report.errors.len()
        ))?;
        return Ok(EXIT_PACKAGE_ERRORS);
    }
    Ok(0)
}

/// Builds settings from the config file, then applies command line overrides.
async fn load_settings(args: &Args) -> Result<Settings> {
    let config_path = args.config.clone().or_else(|| {
        let default = PathBuf::from(CONFIG_FILE_NAME);
        default.is_file().then_some(default)
    });

    let mut builder = match config_path {
        Some(path) => {
            let config = ConfigFile::load(&path).await?;
            let path = path.absolutize()?.into_owned();
            let base_dir = path.parent().unwrap_or(Path::new("/"));
            log::debug!("using config file {}", path.display());
            SettingsBuilder::from_config(&config, base_dir)
        }
        None => SettingsBuilder::new(),
    };

    if let Some(manifest) = &args.manifest {
        builder = builder.manifest_name(manifest);
    }
    if let Some(dir) = &args.dependency_dir {
        builder = builder.dependency_dir(dir);
    }
    if let Some(separator) = &args.separator {
        builder = builder.separator(separator);
    }

    Ok(builder.build()?)
}

/// Emits the traversed modules through the metrics and, if requested, to disk.
async fn write_bundle(build: &AssetBuild, path: Option<&Path>, modules: &[Vec<u8>]) -> Result<()> {
    let mut file = match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            Some(tokio::fs::File::create(path).await?)
        }
        None => None,
    };

    for content in modules {
        build.metrics().write(content);
        if let Some(file) = file.as_mut() {
            file.write_all(content).await?;
        }
    }

    if let Some(mut file) = file {
        file.flush().await?;
    }
    Ok(())
}

fn report_fatal(config: &RuntimeConfig, events: Vec<BuildEvent>) -> std::io::Result<()> {
    for event in events {
        if let BuildEvent::Fatal { module, message } = event {
            config.indent(&format!("{}: {}", module.display(), message))?;
        }
    }
    Ok(())
}
