//! Transforms backed by external executables.
//!
//! The executable receives the asset file path as its only argument and the
//! asset content on stdin, and must write the transformed content to stdout.

use super::{AssetTransform, TransformFactory};
use crate::bundler::error::{Error, Result};
use bytes::Bytes;
use futures_lite::future::Boxed;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::{io::AsyncWriteExt, process::Command};

/// Factory for transforms that run an external program per asset file.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    program: PathBuf,
}

impl CommandTransform {
    /// Creates a factory running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TransformFactory for CommandTransform {
    fn create(&self, file: &Path) -> Box<dyn AssetTransform> {
        Box::new(CommandStage {
            program: self.program.clone(),
            file: file.to_path_buf(),
        })
    }
}

struct CommandStage {
    program: PathBuf,
    file: PathBuf,
}

impl AssetTransform for CommandStage {
    fn apply(self: Box<Self>, input: Bytes) -> Boxed<Result<Bytes>> {
        Box::pin(async move { run_program(&self.program, &self.file, input).await })
    }
}

async fn run_program(program: &Path, file: &Path, input: Bytes) -> Result<Bytes> {
    let failed = |reason: String| Error::AssetTransform {
        path: file.to_path_buf(),
        reason,
    };

    let mut child = Command::new(program)
        .arg(file)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| failed(format!("failed to start {}: {}", program.display(), e)))?;

    // Feed stdin concurrently so a program that writes before draining its
    // input cannot deadlock on a full pipe.
    let stdin = child.stdin.take();
    let feeder = tokio::spawn(async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&input).await?;
            stdin.shutdown().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| failed(format!("failed to wait for {}: {}", program.display(), e)))?;

    match feeder.await {
        Ok(Ok(())) => {}
        // The program may legitimately exit without reading all input.
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(failed(format!("failed to write stdin: {e}"))),
        Err(e) => return Err(failed(format!("stdin writer panicked: {e}"))),
    }

    if !output.status.success() {
        return Err(failed(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(Bytes::from(output.stdout))
}
