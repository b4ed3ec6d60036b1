//! Command line argument parsing and validation.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Aggregate package assets for a set of modules
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_assets",
    version,
    about = "Aggregate package assets for a set of modules",
    long_about = "Maps every module to the package that owns it, expands the package's `style` globs,
runs the matched files through the package's `transforms` and writes all results to one stream.

Usage:
  kodegen_bundler_assets src/
  kodegen_bundler_assets src/main.js --output dist/bundle.css
  kodegen_bundler_assets --extension mjs --bundle-output dist/bundle.js src/

Exit code 0 = every package's assets were written.
Exit code 2 = some package failed and --strict was given."
)]
pub struct Args {
    /// Module files or directories to traverse
    #[arg(value_name = "MODULES", required = true, num_args = 1..)]
    pub modules: Vec<PathBuf>,

    /// Module file extension used when walking directories
    #[arg(short = 'e', long, value_name = "EXT", default_value = "js")]
    pub extension: String,

    /// Write the aggregate asset stream here instead of stdout
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Concatenate the traversed modules into this file
    #[arg(short = 'b', long, value_name = "PATH")]
    pub bundle_output: Option<PathBuf>,

    /// Config file (defaults to ./assets.toml when present)
    #[arg(short = 'c', long, value_name = "PATH", env = "KODEGEN_ASSETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Package manifest file name
    #[arg(long, value_name = "NAME")]
    pub manifest: Option<String>,

    /// Dependency directory searched for transforms and skipped while walking
    #[arg(long, value_name = "DIR")]
    pub dependency_dir: Option<String>,

    /// Separator appended after every asset chunk
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Exit with code 2 if any package reported an error
    #[arg(long)]
    pub strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored status output (auto, always, never)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err("Extension cannot be empty".to_string());
        }
        if extension.contains(['/', '\\']) {
            return Err(format!("Invalid extension: {}", self.extension));
        }

        if let Some(manifest) = &self.manifest
            && manifest.is_empty()
        {
            return Err("Manifest name cannot be empty".to_string());
        }

        Ok(())
    }

    /// Output paths that would overwrite each other.
    pub fn conflicting_outputs(&self) -> Option<Vec<String>> {
        match (&self.output, &self.bundle_output) {
            (Some(output), Some(bundle)) if output == bundle => Some(vec![
                "--output".to_string(),
                "--bundle-output".to_string(),
            ]),
            _ => None,
        }
    }

    /// Extension without a leading dot.
    pub fn module_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal messages
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.color);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
