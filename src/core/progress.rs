//! Cancellation, status reporting and scan outcomes
//!
//! The background worker never touches presentation state. It polls a
//! [`CancelToken`] at every directory, file and hash boundary and pushes
//! human-readable strings into a [`StatusSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use uuid::Uuid;

/// Shared stop signal. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receiver of progress strings emitted by a scan.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn status(&self, message: &str) {
        self(message)
    }
}

/// Sink that discards everything.
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&self, _message: &str) {}
}

/// Forwards status strings into an engine event channel.
///
/// Uses `try_send`: when the consumer falls behind, intermediate progress is
/// dropped instead of stalling the scan.
pub struct ChannelSink<T> {
    tx: Sender<ScanEvent<T>>,
}

impl<T> ChannelSink<T> {
    pub fn new(tx: Sender<ScanEvent<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Send> StatusSink for ChannelSink<T> {
    fn status(&self, message: &str) {
        let _ = self.tx.try_send(ScanEvent::Status(message.to_string()));
    }
}

/// What a scan loop needs from its caller.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    cancel: &'a CancelToken,
    sink: &'a dyn StatusSink,
}

impl<'a> ScanContext<'a> {
    pub fn new(cancel: &'a CancelToken, sink: &'a dyn StatusSink) -> Self {
        Self { cancel, sink }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn status(&self, message: &str) {
        self.sink.status(message);
    }
}

/// Marker for a user-requested stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped;

/// Terminal result of a scan. A stopped scan carries no partial results.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome<T> {
    Complete(Vec<T>),
    Stopped,
}

impl<T> ScanOutcome<T> {
    pub fn is_stopped(&self) -> bool {
        matches!(self, ScanOutcome::Stopped)
    }

    /// Number of results; zero for a stopped scan.
    pub fn len(&self) -> usize {
        match self {
            ScanOutcome::Complete(items) => items.len(),
            ScanOutcome::Stopped => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn results(&self) -> Option<&[T]> {
        match self {
            ScanOutcome::Complete(items) => Some(items),
            ScanOutcome::Stopped => None,
        }
    }

    pub fn into_results(self) -> Option<Vec<T>> {
        match self {
            ScanOutcome::Complete(items) => Some(items),
            ScanOutcome::Stopped => None,
        }
    }
}

impl<T> From<Result<Vec<T>, Stopped>> for ScanOutcome<T> {
    fn from(result: Result<Vec<T>, Stopped>) -> Self {
        match result {
            Ok(items) => ScanOutcome::Complete(items),
            Err(Stopped) => ScanOutcome::Stopped,
        }
    }
}

/// Final report of a background scan, delivered exactly once.
#[derive(Debug, Clone)]
pub struct ScanReport<T> {
    pub id: Uuid,
    pub outcome: ScanOutcome<T>,
    /// Human-readable completion line ("Found 3 matching files.").
    pub summary: String,
    pub elapsed: Duration,
    pub finished_at: DateTime<Utc>,
}

/// Message sent from a scan worker to the foreground.
#[derive(Debug, Clone)]
pub enum ScanEvent<T> {
    Status(String),
    Finished(ScanReport<T>),
}
