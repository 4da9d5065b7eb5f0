//! FileHound Library
//!
//! Folder search and duplicate detection over a set of user-chosen roots.
//! Both tools share one bounded walker and one set of exclusion rules, and
//! run on a background worker that reports progress as status strings and
//! can be stopped at any directory, file or hash boundary.
//!
//! # Features
//!
//! - **Bounded walking**: depth limit, non-recursive mode, folder pruning
//! - **Name search**: substring or wildcard queries, type filters
//! - **Duplicate detection**: size bucketing, then BLAKE3 content hashing
//! - **Background engine**: one scan at a time, cooperative stop
//! - **Pagination**: reveal results a page at a time
//!
//! # Example
//!
//! ```no_run
//! use filehound::core::SearchEngine;
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = SearchEngine::default();
//!     engine.add_root("/home/me/Documents");
//!
//!     let request = engine.request().query("*.pdf").max_depth_str("2").build()?;
//!     let handle = engine.start(request)?;
//!
//!     let report = handle.wait_with(|status| println!("{}", status));
//!     println!("{}", report.summary);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod core;
pub mod dedup;
pub mod error;
pub mod spinner;

// Re-export commonly used types
pub use actions::{FileDeleter, FsDeleter};
pub use config::Config;
pub use core::{
    CancelToken, Engine, ExclusionRules, FileType, MatchRecord, Preset, ResultPages, ScanEvent,
    ScanHandle, ScanOutcome, ScanReport, ScanRequest, Search, SearchEngine,
};
pub use dedup::{DuplicateEngine, DuplicateGroup, DuplicateSet, Duplicates, MemberRemoval};
pub use error::{ActionError, DeleteError, EngineError, RequestError};
