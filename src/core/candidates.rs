//! Candidate enumeration shared by the search and duplicate engines.
//!
//! Walks every root of a request, reports each directory to the status
//! sink, and hands over the files that survive the name query and the
//! exclusion rules. The cancellation token is polled before every root,
//! directory and file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::progress::{ScanContext, Stopped};
use super::request::ScanRequest;
use super::walker::BoundedWalker;

/// A file that passed directory pruning, the name query and the exclusion
/// rules.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub path: &'a Path,
    pub folder: &'a Path,
    pub name: String,
    /// Lower-cased file name.
    pub name_lower: String,
    /// Lower-cased extension without the dot, empty if none.
    pub extension: String,
}

/// Visit every candidate of `request`.
///
/// `label` prefixes the per-directory status line (`"Searching"`,
/// `"Indexing"`). A file reachable from several roots, or through a
/// symlink, is visited once.
pub fn for_each_candidate<F>(
    request: &ScanRequest,
    ctx: &ScanContext<'_>,
    label: &str,
    mut visit: F,
) -> Result<(), Stopped>
where
    F: FnMut(Candidate<'_>),
{
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in request.roots() {
        if ctx.is_cancelled() {
            return Err(Stopped);
        }
        if !root.is_dir() {
            tracing::debug!("Root {} is not a readable directory", root.display());
        }

        let walker = BoundedWalker::new(root.clone(), request.effective_depth(), |dir| {
            request.prunes_dir(dir)
        });

        for visit_dir in walker {
            ctx.status(&format!("{}: {}", label, visit_dir.dir.display()));
            if ctx.is_cancelled() {
                return Err(Stopped);
            }

            for path in &visit_dir.files {
                if ctx.is_cancelled() {
                    return Err(Stopped);
                }

                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let name_lower = name.to_lowercase();

                if !request.query().matches(&name_lower) {
                    continue;
                }
                if request.exclusions().excludes_file(path, &name_lower) {
                    continue;
                }
                if !seen.insert(file_identity(path)) {
                    continue;
                }

                let extension = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase())
                    .unwrap_or_default();

                visit(Candidate {
                    path,
                    folder: &visit_dir.dir,
                    name,
                    name_lower,
                    extension,
                });
            }
        }
    }

    Ok(())
}

/// Resolved location of `path`, or `path` itself when it cannot be resolved.
fn file_identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::{CancelToken, NullSink};
    use tempfile::tempdir;

    #[test]
    fn test_overlapping_roots_visit_once() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("inner")).unwrap();
        std::fs::write(dir.path().join("inner/file.txt"), "x").unwrap();

        let request = ScanRequest::builder()
            .root(dir.path())
            .root(dir.path().join("inner"))
            .build()
            .unwrap();
        let cancel = CancelToken::new();
        let ctx = ScanContext::new(&cancel, &NullSink);

        let mut count = 0;
        for_each_candidate(&request, &ctx, "Searching", |_| count += 1).unwrap();
        assert_eq!(count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_visits_files_once() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("real/file.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let request = ScanRequest::builder()
            .root(dir.path().join("real"))
            .root(dir.path().join("alias"))
            .build()
            .unwrap();
        let cancel = CancelToken::new();
        let ctx = ScanContext::new(&cancel, &NullSink);

        let mut paths = Vec::new();
        for_each_candidate(&request, &ctx, "Indexing", |c| paths.push(c.path.to_path_buf()))
            .unwrap();
        assert_eq!(paths, vec![dir.path().join("real/file.txt")]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        let request = ScanRequest::builder().root(dir.path()).build().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = ScanContext::new(&cancel, &NullSink);

        let mut count = 0;
        let result = for_each_candidate(&request, &ctx, "Searching", |_| count += 1);
        assert_eq!(result, Err(Stopped));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_extension_is_lower_cased() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Photo.JPG"), "x").unwrap();

        let request = ScanRequest::builder().root(dir.path()).build().unwrap();
        let cancel = CancelToken::new();
        let ctx = ScanContext::new(&cancel, &NullSink);

        let mut exts = Vec::new();
        for_each_candidate(&request, &ctx, "Searching", |c| exts.push(c.extension)).unwrap();
        assert_eq!(exts, vec!["jpg"]);
    }
}
