//! Drains the aggregate asset stream into a file or stdout.

use crate::{
    bundler::{AssetEvent, AssetStreamReceiver},
    error::Result,
};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Where asset chunks end up.
pub type AssetSink = Box<dyn AsyncWrite + Send + Unpin>;

/// What was written while draining the stream.
#[derive(Debug, Default)]
pub struct AssetReport {
    /// Chunks written
    pub chunks: usize,
    /// Bytes written, separators included
    pub bytes: u64,
    /// Package errors in arrival order
    pub errors: Vec<String>,
}

/// Opens `path` for writing, or stdout when `None`.
pub async fn open(path: Option<&Path>) -> Result<AssetSink> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            Ok(Box::new(tokio::fs::File::create(path).await?))
        }
        None => Ok(Box::new(tokio::io::stdout())),
    }
}

/// Writes every chunk to `sink` until the stream ends.
///
/// Package errors are logged and collected; they do not stop the drain.
pub async fn drain(mut assets: AssetStreamReceiver, mut sink: AssetSink) -> Result<AssetReport> {
    let mut report = AssetReport::default();

    while let Some(event) = assets.recv().await {
        match event {
            AssetEvent::Chunk(chunk) => {
                sink.write_all(&chunk).await?;
                report.chunks += 1;
                report.bytes += chunk.len() as u64;
            }
            AssetEvent::Error(error) => {
                log::warn!("{}", error);
                report.errors.push(error.to_string());
            }
            AssetEvent::End => break,
        }
    }

    sink.flush().await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{AggregateAssetStream, Error};
    use bytes::Bytes;

    #[tokio::test]
    async fn writes_chunks_and_collects_errors() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/assets.css");
        let (stream, assets) = AggregateAssetStream::channel("\n");

        stream.write_asset(Path::new("/p/a.css"), Bytes::from_static(b"a{}")).unwrap();
        stream.emit_error(Path::new("/p/package.json"), Error::GenericError("boom".to_string()));
        stream.write_asset(Path::new("/p/b.css"), Bytes::from_static(b"b{}")).unwrap();
        stream.end();

        let sink = open(Some(&out)).await.unwrap();
        let report = drain(assets, sink).await.unwrap();

        assert_eq!(report.chunks, 2);
        assert_eq!(report.bytes, 8);
        assert_eq!(report.errors, vec!["boom (package /p/package.json)"]);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a{}\nb{}\n");
    }
}
