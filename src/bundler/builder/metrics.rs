//! Instrumentation over the main build output.

use super::{
    coordinator::AssetBuildCoordinator,
    events::{BuildEvent, BuildEventSender},
};
use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

/// Counts main output bytes and times the output stage.
///
/// [`finish`](Self::finish) is the bundler's completion signal: it emits the
/// metrics and tells the coordinator the main traversal is complete.
#[derive(Debug)]
pub struct MetricsEmitter {
    coordinator: AssetBuildCoordinator,
    events: BuildEventSender,
    started: Mutex<Instant>,
    bytes: AtomicU64,
    finished: AtomicBool,
}

impl MetricsEmitter {
    /// Creates an emitter; the clock starts now.
    pub fn new(coordinator: AssetBuildCoordinator, events: BuildEventSender) -> Self {
        Self {
            coordinator,
            events,
            started: Mutex::new(Instant::now()),
            bytes: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        }
    }

    /// Restarts the clock once module recording has finished.
    pub fn record_complete(&self) {
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Accounts for a piece of main output.
    pub fn write(&self, buf: &[u8]) {
        self.bytes.fetch_add(buf.len() as u64, Ordering::Relaxed);
    }

    /// Bytes accounted so far.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Emits the metrics and signals main traversal completion. Runs once.
    pub fn finish(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }

        let elapsed = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed();
        let bytes = self.bytes();
        let line = summary(bytes, elapsed);

        log::info!("{}", line);
        self.events.emit(BuildEvent::Time(elapsed));
        self.events.emit(BuildEvent::Bytes(bytes));
        self.events.emit(BuildEvent::Log(line));

        self.coordinator.main_traversal_complete();
    }
}

fn summary(bytes: u64, elapsed: Duration) -> String {
    format!(
        "{} bytes written ({:.2} seconds)",
        bytes,
        elapsed.as_secs_f64()
    )
}
