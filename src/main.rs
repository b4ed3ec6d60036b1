//! Kodegen Bundler Assets - aggregate package assets for a set of modules.
//!
//! Writes the transformed assets of every package owning one of the given
//! modules to stdout or `--output`.

use kodegen_bundler_assets::cli::{self, Args, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    // Initialize logging; RUST_LOG still wins over --verbose
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let output = OutputManager::new(args.verbose, args.color);

    // Run CLI and get exit code
    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            let _ = output.error(&e.to_string());
            for suggestion in e.recovery_suggestions() {
                let _ = output.hint(&suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
