//! Engine - background scan orchestration
//!
//! An [`Engine`] owns the folder list for one tool (search or duplicates)
//! and runs at most one scan at a time on a dedicated worker thread. The
//! worker talks to the foreground only through a channel of [`ScanEvent`]s;
//! the foreground stops it through a shared [`CancelToken`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::{Receiver, TryRecvError};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::progress::{CancelToken, ChannelSink, ScanContext, ScanEvent, ScanOutcome, ScanReport};
use super::request::{normalize_root, ScanRequest, ScanRequestBuilder};
use crate::error::{EngineError, RequestError};

/// Intermediate status messages buffered before new ones are dropped.
pub const STATUS_CHANNEL_CAPACITY: usize = 256;

/// The scan algorithm an [`Engine`] drives.
pub trait ScanKind: Send + Sync + 'static {
    type Item: Send + 'static;

    /// Short name used for thread names and logs.
    const LABEL: &'static str;

    /// Reject requests this kind cannot run, before any work starts.
    fn validate(&self, request: &ScanRequest) -> Result<(), RequestError>;

    fn run(&self, request: &ScanRequest, ctx: &ScanContext<'_>) -> ScanOutcome<Self::Item>;

    /// Final human-readable status line.
    fn summarize(&self, outcome: &ScanOutcome<Self::Item>) -> String;
}

/// Clears the running flag when the worker exits, including by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Engine<K: ScanKind> {
    kind: Arc<K>,
    running: Arc<AtomicBool>,
    cancel: Mutex<CancelToken>,
    roots: RwLock<Vec<PathBuf>>,
}

impl<K: ScanKind> Engine<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind: Arc::new(kind),
            running: Arc::new(AtomicBool::new(false)),
            cancel: Mutex::new(CancelToken::new()),
            roots: RwLock::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Add a folder to the selection; returns false if it was already there.
    pub fn add_root(&self, root: impl Into<PathBuf>) -> bool {
        let root = normalize_root(root);
        let mut roots = self.roots.write();
        if roots.contains(&root) {
            return false;
        }
        roots.push(root);
        true
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.read().clone()
    }

    /// Forget every selected folder. Refused while a scan is running.
    pub fn clear_roots(&self) -> Result<(), EngineError> {
        if self.is_running() {
            return Err(EngineError::ScanRunning);
        }
        self.roots.write().clear();
        Ok(())
    }

    /// A request builder pre-filled with the selected folders.
    pub fn request(&self) -> ScanRequestBuilder {
        ScanRequest::builder().roots(self.roots())
    }

    /// Ask the running scan to stop. Returns false if nothing was running.
    pub fn stop(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel.lock().cancel();
        true
    }

    /// Validate `request` and start scanning it on a background thread.
    ///
    /// Fails with [`EngineError::AlreadyRunning`] if a scan is in flight;
    /// that scan is left untouched.
    pub fn start(&self, request: ScanRequest) -> Result<ScanHandle<K::Item>, EngineError> {
        self.kind.validate(&request)?;

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::AlreadyRunning);
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let cancel = CancelToken::new();
        *self.cancel.lock() = cancel.clone();

        let id = Uuid::new_v4();
        let (tx, rx) = crossbeam_channel::bounded(STATUS_CHANNEL_CAPACITY);
        let kind = Arc::clone(&self.kind);
        let worker_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name(format!("filehound-{}", K::LABEL))
            .spawn(move || {
                let span = tracing::info_span!("scan", kind = K::LABEL, %id);
                let _enter = span.enter();
                tracing::info!(roots = request.roots().len(), "Scan started");

                let started = Instant::now();
                let sink = ChannelSink::new(tx.clone());
                let ctx = ScanContext::new(&worker_cancel, &sink);
                let outcome = kind.run(&request, &ctx);
                let summary = kind.summarize(&outcome);

                let report = ScanReport {
                    id,
                    summary,
                    elapsed: started.elapsed(),
                    finished_at: Utc::now(),
                    outcome,
                };
                tracing::info!(
                    results = report.outcome.len(),
                    stopped = report.outcome.is_stopped(),
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "{}",
                    report.summary
                );

                // Release before announcing so the receiver can start again
                drop(guard);
                let _ = tx.send(ScanEvent::Finished(report));
            })
            .map_err(EngineError::Spawn)?;

        Ok(ScanHandle {
            id,
            events: rx,
            cancel,
            thread: Some(thread),
        })
    }
}

impl<K: ScanKind + Default> Default for Engine<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

/// Foreground side of one running scan.
pub struct ScanHandle<T> {
    id: Uuid,
    events: Receiver<ScanEvent<T>>,
    cancel: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl<T> ScanHandle<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request a stop; honored at the worker's next poll point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn events(&self) -> &Receiver<ScanEvent<T>> {
        &self.events
    }

    /// Non-blocking poll for the next event.
    pub fn try_next(&self) -> Option<ScanEvent<T>> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the scan finishes, discarding status updates.
    pub fn wait(self) -> ScanReport<T> {
        self.wait_with(|_| {})
    }

    /// Block until the scan finishes, passing each status update to `on_status`.
    pub fn wait_with<F>(mut self, mut on_status: F) -> ScanReport<T>
    where
        F: FnMut(&str),
    {
        let started = Instant::now();
        let report = loop {
            match self.events.recv() {
                Ok(ScanEvent::Status(message)) => on_status(&message),
                Ok(ScanEvent::Finished(report)) => break report,
                Err(_) => {
                    tracing::error!(id = %self.id, "Scan worker exited without a report");
                    break ScanReport {
                        id: self.id,
                        outcome: ScanOutcome::Stopped,
                        summary: "Scan stopped.".to_string(),
                        elapsed: started.elapsed(),
                        finished_at: Utc::now(),
                    };
                }
            }
        };

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        report
    }
}
