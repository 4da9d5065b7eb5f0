//! Error types for request construction, engine control and deletion.
//!
//! Per-item filesystem failures during a scan are never surfaced here;
//! they are absorbed by the scan loops and logged at debug level.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with a [`ScanRequest`](crate::core::ScanRequest) detected before
/// any background work starts.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no folders selected to scan")]
    NoRoots,

    #[error("search query is empty")]
    EmptyQuery,

    /// Duplicate scans compare every file; type filters only apply to search.
    #[error("file type filters are not supported by duplicate scans")]
    TypeFilterUnsupported,

    #[error("invalid wildcard pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Errors returned synchronously by an [`Engine`](crate::core::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// A scan is already in flight on this engine; the new one was not started.
    #[error("a scan is already running; wait for it to finish or stop it first")]
    AlreadyRunning,

    /// The folder list cannot change while a scan is reading it.
    #[error("stop the current scan before changing the folder list")]
    ScanRunning,

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("failed to spawn scan worker: {0}")]
    Spawn(#[source] io::Error),
}

/// Failure to delete a duplicate group member. The group is left untouched.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("no duplicate group with hash {0}")]
    UnknownGroup(String),

    #[error("{} is not a member of this duplicate group", .0.display())]
    NotAMember(PathBuf),

    #[error("unable to delete {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to hand a path to the platform's default handler.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{} no longer exists", .0.display())]
    Missing(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: opener::OpenError,
    },
}
