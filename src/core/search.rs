//! Search engine - name/type matching across the selected roots
//!
//! Produces a flat list of [`MatchRecord`]s sorted by folder, then name
//! (both case-insensitive). A stopped search returns no records at all.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::candidates::for_each_candidate;
use super::engine::ScanKind;
use super::progress::{ScanContext, ScanOutcome, Stopped};
use super::request::ScanRequest;
use super::FileType;
use crate::error::RequestError;

/// One matching file. Identity is the full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Containing folder
    pub folder: PathBuf,
    /// File name as found on disk
    pub name: String,
    /// Lower-cased extension, no dot
    pub extension: String,
    /// Byte size, `None` if the file could not be stat'ed
    pub size: Option<u64>,
    pub file_type: FileType,
}

impl MatchRecord {
    /// Size for display and totals; unknown sizes count as zero.
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    fn sort_key(&self) -> (String, String) {
        (
            self.folder.to_string_lossy().to_lowercase(),
            self.name.to_lowercase(),
        )
    }
}

/// Sort records by (folder, name), case-insensitive.
pub fn sort_matches(records: &mut [MatchRecord]) {
    records.sort_by_cached_key(MatchRecord::sort_key);
}

/// Run a search synchronously on the calling thread.
pub fn search(request: &ScanRequest, ctx: &ScanContext<'_>) -> ScanOutcome<MatchRecord> {
    collect_matches(request, ctx).into()
}

fn collect_matches(
    request: &ScanRequest,
    ctx: &ScanContext<'_>,
) -> Result<Vec<MatchRecord>, Stopped> {
    let mut records = Vec::new();

    for_each_candidate(request, ctx, "Searching", |candidate| {
        if !request.includes_type(&candidate.name_lower, &candidate.extension) {
            return;
        }

        let size = match std::fs::metadata(candidate.path) {
            Ok(meta) => Some(meta.len()),
            Err(e) => {
                tracing::debug!("Cannot stat {}: {}", candidate.path.display(), e);
                None
            }
        };

        records.push(MatchRecord {
            path: candidate.path.to_path_buf(),
            folder: candidate.folder.to_path_buf(),
            file_type: FileType::from_extension(&candidate.extension),
            name: candidate.name,
            extension: candidate.extension,
            size,
        });
    })?;

    sort_matches(&mut records);
    Ok(records)
}

/// Search engine kind for [`Engine`](super::Engine).
#[derive(Debug, Clone, Copy, Default)]
pub struct Search;

impl ScanKind for Search {
    type Item = MatchRecord;

    const LABEL: &'static str = "search";

    fn validate(&self, request: &ScanRequest) -> Result<(), RequestError> {
        request.require_roots()?;
        if request.query().is_any() {
            return Err(RequestError::EmptyQuery);
        }
        Ok(())
    }

    fn run(&self, request: &ScanRequest, ctx: &ScanContext<'_>) -> ScanOutcome<MatchRecord> {
        search(request, ctx)
    }

    fn summarize(&self, outcome: &ScanOutcome<MatchRecord>) -> String {
        match outcome {
            ScanOutcome::Stopped => "Search stopped.".to_string(),
            ScanOutcome::Complete(records) if records.is_empty() => {
                "No matching files found.".to_string()
            }
            ScanOutcome::Complete(records) => {
                format!("Found {} matching file(s).", records.len())
            }
        }
    }
}
