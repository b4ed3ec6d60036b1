//! Build-level notifications.

use std::{path::PathBuf, time::Duration};
use tokio::sync::mpsc;

/// Notification emitted while a build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Time spent producing the main output.
    Time(Duration),
    /// Bytes of main output written.
    Bytes(u64),
    /// Human-readable summary of the main output.
    Log(String),
    /// A package pipeline was triggered.
    PackageStarted {
        /// Package path
        package: PathBuf,
    },
    /// A package pipeline settled.
    PackageComplete {
        /// Package path
        package: PathBuf,
        /// Whether an error was reported for the package
        failed: bool,
    },
    /// The aggregate stream has been ended; all asset work is done.
    AllAssetsComplete,
    /// Package discovery failed for a module; the build is aborted.
    Fatal {
        /// Module whose package could not be determined
        module: PathBuf,
        /// Error description
        message: String,
    },
}

/// Sending half of the build event channel. Sends never fail.
#[derive(Debug, Clone)]
pub struct BuildEventSender {
    tx: mpsc::UnboundedSender<BuildEvent>,
}

/// Receiving half of the build event channel.
#[derive(Debug)]
pub struct BuildEventReceiver {
    rx: mpsc::UnboundedReceiver<BuildEvent>,
}

/// Creates a build event channel.
pub fn channel() -> (BuildEventSender, BuildEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BuildEventSender { tx }, BuildEventReceiver { rx })
}

impl BuildEventSender {
    /// Emits `event`; dropped silently when nobody listens.
    pub fn emit(&self, event: BuildEvent) {
        let _ = self.tx.send(event);
    }
}

impl BuildEventReceiver {
    /// Receives the next event, or `None` once the build is dropped.
    pub async fn recv(&mut self) -> Option<BuildEvent> {
        self.rx.recv().await
    }

    /// Returns every event currently queued without waiting.
    pub fn drain(&mut self) -> Vec<BuildEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
