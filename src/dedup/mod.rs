//! Dedup module - Content-hash duplicate detection
//!
//! Two passes over the selected roots:
//!
//! 1. **Size bucketing**: every candidate file is stat'ed and bucketed by
//!    byte size. Files of different sizes cannot be identical, so buckets
//!    with a single member are dropped without reading any content.
//! 2. **Hashing**: members of the remaining buckets are streamed through
//!    BLAKE3 in 8 KiB chunks and re-bucketed by digest. Every digest shared
//!    by two or more files becomes a [`DuplicateGroup`].
//!
//! A stop request during either pass discards everything collected so far.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actions::FileDeleter;
use crate::core::candidates::for_each_candidate;
use crate::core::{Engine, ResultPages, ScanContext, ScanKind, ScanOutcome, ScanRequest, Stopped};
use crate::error::{DeleteError, RequestError};

/// Read buffer used while hashing.
pub const HASH_CHUNK_SIZE: usize = 8192;

/// Group name used when the first member has no file name.
const UNKNOWN_NAME: &str = "(unknown file)";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A set of files with identical size and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// BLAKE3 hex digest shared by every member.
    pub hash: String,
    /// File name of the first member path.
    pub name: String,
    /// Byte size shared by every member.
    pub size: u64,
    /// Member paths, ascending.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn new(hash: String, size: u64, mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        paths.dedup();
        let name = paths
            .first()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Self {
            hash,
            name,
            size,
            paths,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Bytes that deleting every copy but one would free.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.paths.len().saturating_sub(1) as u64
    }

    /// `"notes.txt (2 copies)"`
    pub fn label(&self) -> String {
        format!("{} ({} copies)", self.name, self.paths.len())
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Compute the BLAKE3 hex digest of a file, streaming 8 KiB at a time.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// First pass: candidate paths bucketed by byte size.
fn bucket_by_size(
    request: &ScanRequest,
    ctx: &ScanContext<'_>,
) -> Result<BTreeMap<u64, Vec<PathBuf>>, Stopped> {
    let mut buckets: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();

    for_each_candidate(request, ctx, "Indexing", |candidate| {
        match std::fs::metadata(candidate.path) {
            Ok(meta) => buckets
                .entry(meta.len())
                .or_default()
                .push(candidate.path.to_path_buf()),
            Err(e) => {
                tracing::debug!("Skipping {}: {}", candidate.path.display(), e);
            }
        }
    })?;

    Ok(buckets)
}

/// Hash one candidate, honoring the stop signal first.
fn hash_candidate(path: &Path, ctx: &ScanContext<'_>) -> Result<Option<String>, Stopped> {
    ctx.status(&format!("Hashing: {}", path.display()));
    if ctx.is_cancelled() {
        return Err(Stopped);
    }
    match hash_file(path) {
        Ok(hash) => Ok(Some(hash)),
        Err(e) => {
            tracing::debug!("Failed to hash {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Second pass over one size bucket: digest -> member paths.
fn hash_bucket(
    paths: &[PathBuf],
    ctx: &ScanContext<'_>,
    pool: Option<&rayon::ThreadPool>,
) -> Result<HashMap<String, Vec<PathBuf>>, Stopped> {
    let hashed: Vec<(String, PathBuf)> = match pool {
        Some(pool) => pool.install(|| {
            paths
                .par_iter()
                .map(|path| hash_candidate(path, ctx).map(|h| h.map(|h| (h, path.clone()))))
                .filter_map(Result::transpose)
                .collect::<Result<Vec<_>, Stopped>>()
        })?,
        None => {
            let mut hashed = Vec::with_capacity(paths.len());
            for path in paths {
                if let Some(hash) = hash_candidate(path, ctx)? {
                    hashed.push((hash, path.clone()));
                }
            }
            hashed
        }
    };

    let mut by_hash: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for (hash, path) in hashed {
        by_hash.entry(hash).or_default().push(path);
    }
    Ok(by_hash)
}

fn collect_groups(
    request: &ScanRequest,
    ctx: &ScanContext<'_>,
    hash_workers: usize,
) -> Result<Vec<DuplicateGroup>, Stopped> {
    let buckets = bucket_by_size(request, ctx)?;

    let candidates = buckets.values().filter(|p| p.len() > 1).count();
    tracing::debug!(
        size_buckets = buckets.len(),
        candidate_buckets = candidates,
        "Size bucketing done"
    );
    ctx.status("Comparing candidates...");

    let pool = build_pool(hash_workers);

    let mut groups = Vec::new();
    for (size, paths) in buckets {
        if paths.len() < 2 {
            continue;
        }
        if ctx.is_cancelled() {
            return Err(Stopped);
        }

        for (hash, same) in hash_bucket(&paths, ctx, pool.as_ref())? {
            if same.len() > 1 {
                groups.push(DuplicateGroup::new(hash, size, same));
            }
        }
    }

    groups.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.hash.cmp(&b.hash))
    });
    Ok(groups)
}

/// Thread pool for parallel hashing; `None` means hash on the calling thread.
fn build_pool(hash_workers: usize) -> Option<rayon::ThreadPool> {
    let workers = if hash_workers == 0 {
        num_cpus::get()
    } else {
        hash_workers
    };
    if workers <= 1 {
        return None;
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("filehound-hash-{}", i))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!("Falling back to sequential hashing: {}", e);
            None
        }
    }
}

/// Find duplicate groups synchronously on the calling thread.
///
/// `hash_workers`: 1 hashes sequentially, 0 uses one thread per CPU.
pub fn find_duplicates(
    request: &ScanRequest,
    ctx: &ScanContext<'_>,
    hash_workers: usize,
) -> ScanOutcome<DuplicateGroup> {
    collect_groups(request, ctx, hash_workers).into()
}

/// Background duplicate finder.
pub type DuplicateEngine = Engine<Duplicates>;

/// Duplicate engine kind for [`Engine`].
#[derive(Debug, Clone, Copy)]
pub struct Duplicates {
    pub hash_workers: usize,
}

impl Duplicates {
    pub fn with_workers(hash_workers: usize) -> Self {
        Self { hash_workers }
    }
}

impl Default for Duplicates {
    fn default() -> Self {
        Self { hash_workers: 1 }
    }
}

impl ScanKind for Duplicates {
    type Item = DuplicateGroup;

    const LABEL: &'static str = "dupes";

    fn validate(&self, request: &ScanRequest) -> Result<(), RequestError> {
        request.require_roots()?;
        if !request.include().is_empty() {
            return Err(RequestError::TypeFilterUnsupported);
        }
        Ok(())
    }

    fn run(&self, request: &ScanRequest, ctx: &ScanContext<'_>) -> ScanOutcome<DuplicateGroup> {
        find_duplicates(request, ctx, self.hash_workers)
    }

    fn summarize(&self, outcome: &ScanOutcome<DuplicateGroup>) -> String {
        match outcome {
            ScanOutcome::Stopped => "Scan stopped.".to_string(),
            ScanOutcome::Complete(groups) if groups.is_empty() => {
                "No duplicates found.".to_string()
            }
            ScanOutcome::Complete(groups) => {
                let files: usize = groups.iter().map(DuplicateGroup::len).sum();
                format!(
                    "{} duplicate set(s) found covering {} files.",
                    groups.len(),
                    files
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Displayed collection
// ---------------------------------------------------------------------------

/// What happened to a group after one of its members went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRemoval {
    /// The group still has at least two members.
    Removed { remaining: usize },
    /// The group fell below two members and was dropped.
    GroupDissolved,
}

/// Paginated duplicate groups with member removal.
#[derive(Debug, Clone)]
pub struct DuplicateSet {
    pages: ResultPages<DuplicateGroup>,
}

impl DuplicateSet {
    pub fn new(groups: Vec<DuplicateGroup>, page_size: usize) -> Self {
        Self {
            pages: ResultPages::new(groups, page_size),
        }
    }

    pub fn pages(&self) -> &ResultPages<DuplicateGroup> {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut ResultPages<DuplicateGroup> {
        &mut self.pages
    }

    pub fn groups(&self) -> &[DuplicateGroup] {
        self.pages.items()
    }

    pub fn group(&self, hash: &str) -> Option<&DuplicateGroup> {
        self.groups().iter().find(|g| g.hash == hash)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn total_files(&self) -> usize {
        self.groups().iter().map(DuplicateGroup::len).sum()
    }

    pub fn wasted_bytes(&self) -> u64 {
        self.groups().iter().map(DuplicateGroup::wasted_bytes).sum()
    }

    /// Drop `path` from the group identified by `hash`.
    ///
    /// Call after the file has been removed from disk.
    pub fn remove_member(&mut self, hash: &str, path: &Path) -> Result<MemberRemoval, DeleteError> {
        let index = self
            .pages
            .position(|g| g.hash == hash)
            .ok_or_else(|| DeleteError::UnknownGroup(hash.to_string()))?;

        let group = self
            .pages
            .get_mut(index)
            .ok_or_else(|| DeleteError::UnknownGroup(hash.to_string()))?;
        let member = group
            .paths
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| DeleteError::NotAMember(path.to_path_buf()))?;
        group.paths.remove(member);

        if group.paths.len() < 2 {
            self.pages.remove(index);
            return Ok(MemberRemoval::GroupDissolved);
        }
        Ok(MemberRemoval::Removed {
            remaining: group.paths.len(),
        })
    }

    /// Delete `path` from disk through `deleter`, then drop it from its group.
    ///
    /// If the delete fails the set is left unchanged.
    pub fn delete_member(
        &mut self,
        hash: &str,
        path: &Path,
        deleter: &dyn FileDeleter,
    ) -> Result<MemberRemoval, DeleteError> {
        let group = self
            .group(hash)
            .ok_or_else(|| DeleteError::UnknownGroup(hash.to_string()))?;
        if !group.contains(path) {
            return Err(DeleteError::NotAMember(path.to_path_buf()));
        }

        deleter.delete(path).map_err(|source| DeleteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Deleted duplicate {}", path.display());

        self.remove_member(hash, path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
