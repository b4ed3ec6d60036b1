//! The aggregate asset stream.
//!
//! One stream exists per build. Package pipelines append one chunk per
//! transformed asset file, package-scoped failures travel on the same channel
//! as [`AssetEvent::Error`], and the coordinator ends the stream exactly once.

use crate::bundler::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::mpsc;

/// Default separator appended to every chunk.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// An event observed by consumers of the aggregate stream.
#[derive(Debug)]
pub enum AssetEvent {
    /// Fully transformed content of one asset file, separator included.
    Chunk(Bytes),
    /// A package-scoped failure; the stream keeps going.
    Error(PackageError),
    /// No more events will follow.
    End,
}

/// A non-fatal failure tagged with the package it happened in.
#[derive(Debug)]
pub struct PackageError {
    /// Package path
    pub package: PathBuf,
    /// What went wrong
    pub error: Error,
}

impl fmt::Display for PackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (package {})", self.error, self.package.display())
    }
}

/// Writer half of the aggregate stream. Cheap to clone.
#[derive(Clone)]
pub struct AggregateAssetStream {
    inner: Arc<StreamInner>,
}

struct StreamInner {
    tx: Mutex<Option<mpsc::UnboundedSender<AssetEvent>>>,
    separator: Bytes,
}

impl AggregateAssetStream {
    /// Creates a stream and the receiver consumers read from.
    pub fn channel(separator: impl Into<Bytes>) -> (Self, AssetStreamReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stream = Self {
            inner: Arc::new(StreamInner {
                tx: Mutex::new(Some(tx)),
                separator: separator.into(),
            }),
        };
        (stream, AssetStreamReceiver { rx })
    }

    fn sender(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<AssetEvent>>> {
        self.inner.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends the transformed content of `file` as a single chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetWrite`] if the stream has ended or the receiver
    /// is gone.
    pub fn write_asset(&self, file: &Path, content: Bytes) -> Result<()> {
        let mut chunk = BytesMut::with_capacity(content.len() + self.inner.separator.len());
        chunk.extend_from_slice(&content);
        chunk.extend_from_slice(&self.inner.separator);

        let write_error = |reason: &str| Error::AssetWrite {
            path: file.to_path_buf(),
            reason: reason.to_string(),
        };

        match self.sender().as_ref() {
            Some(tx) => tx
                .send(AssetEvent::Chunk(chunk.freeze()))
                .map_err(|_| write_error("asset stream receiver dropped")),
            None => Err(write_error("asset stream already ended")),
        }
    }

    /// Reports a package-scoped failure without ending the stream.
    pub fn emit_error(&self, package: &Path, error: Error) {
        let event = AssetEvent::Error(PackageError {
            package: package.to_path_buf(),
            error,
        });
        match self.sender().as_ref() {
            Some(tx) => {
                if let Err(mpsc::error::SendError(event)) = tx.send(event) {
                    log::warn!("Dropped asset error, receiver gone: {:?}", event);
                }
            }
            None => log::warn!("Dropped asset error after stream end: {:?}", event),
        }
    }

    /// Ends the stream.
    ///
    /// Returns `true` only for the call that actually ended it.
    pub fn end(&self) -> bool {
        match self.sender().take() {
            Some(tx) => {
                let _ = tx.send(AssetEvent::End);
                true
            }
            None => false,
        }
    }

    /// Whether [`end`](Self::end) has been called.
    pub fn is_ended(&self) -> bool {
        self.sender().is_none()
    }
}

impl fmt::Debug for AggregateAssetStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateAssetStream")
            .field("ended", &self.is_ended())
            .finish()
    }
}

/// Reader half of the aggregate stream.
#[derive(Debug)]
pub struct AssetStreamReceiver {
    rx: mpsc::UnboundedReceiver<AssetEvent>,
}

/// Everything a stream produced, gathered by [`AssetStreamReceiver::collect`].
#[derive(Debug, Default)]
pub struct CollectedAssets {
    /// Chunks in arrival order
    pub chunks: Vec<Bytes>,
    /// Package errors in arrival order
    pub errors: Vec<PackageError>,
    /// Whether an explicit end was received
    pub ended: bool,
}

impl CollectedAssets {
    /// Chunks decoded as UTF-8 (lossily).
    pub fn chunk_strings(&self) -> Vec<String> {
        self.chunks
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect()
    }
}

impl AssetStreamReceiver {
    /// Receives the next event, or `None` once every writer is gone.
    pub async fn recv(&mut self) -> Option<AssetEvent> {
        self.rx.recv().await
    }

    /// Reads until [`AssetEvent::End`] (or until every writer is gone).
    pub async fn collect(mut self) -> CollectedAssets {
        let mut collected = CollectedAssets::default();
        while let Some(event) = self.rx.recv().await {
            match event {
                AssetEvent::Chunk(chunk) => collected.chunks.push(chunk),
                AssetEvent::Error(error) => collected.errors.push(error),
                AssetEvent::End => {
                    collected.ended = true;
                    break;
                }
            }
        }
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chunks_carry_separator() {
        let (stream, rx) = AggregateAssetStream::channel(DEFAULT_SEPARATOR);
        stream
            .write_asset(Path::new("a.css"), Bytes::from_static(b"a{}"))
            .unwrap();
        stream.end();

        let collected = rx.collect().await;
        assert_eq!(collected.chunk_strings(), ["a{}\n"]);
        assert!(collected.ended);
    }

    #[tokio::test]
    async fn end_happens_once() {
        let (stream, mut rx) = AggregateAssetStream::channel("\n");
        assert!(stream.end());
        assert!(!stream.end());
        assert!(stream.is_ended());

        assert!(matches!(rx.recv().await, Some(AssetEvent::End)));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn writes_after_end_fail() {
        let (stream, _rx) = AggregateAssetStream::channel("\n");
        stream.end();
        let err = stream
            .write_asset(Path::new("late.css"), Bytes::new())
            .unwrap_err();
        assert!(matches!(err, Error::AssetWrite { .. }));
    }

    #[tokio::test]
    async fn errors_are_tagged_with_package() {
        let (stream, rx) = AggregateAssetStream::channel("\n");
        stream.emit_error(
            Path::new("/pkg/a/package.json"),
            Error::GenericError("boom".into()),
        );
        stream.end();

        let collected = rx.collect().await;
        assert_eq!(collected.errors.len(), 1);
        assert_eq!(collected.errors[0].package, Path::new("/pkg/a/package.json"));
        assert_eq!(
            collected.errors[0].to_string(),
            "boom (package /pkg/a/package.json)"
        );
    }
}
