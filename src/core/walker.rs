//! Bounded directory walker
//!
//! Depth-first traversal that yields one [`DirVisit`] per directory. Depth
//! limits and exclusion are applied inside the walker: a subdirectory is
//! dropped from the visit (and never descended) when the prune predicate
//! matches it or when its parent already sits at the maximum depth.
//!
//! Directories that cannot be listed are skipped; the walk continues with
//! their siblings.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One directory produced by [`BoundedWalker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirVisit {
    /// Directory being listed.
    pub dir: PathBuf,
    /// Component distance from the walk root (root = 0).
    pub depth: usize,
    /// Subdirectories that will be descended into, sorted by name.
    pub subdirs: Vec<PathBuf>,
    /// Regular files directly inside `dir`, sorted by name.
    pub files: Vec<PathBuf>,
}

/// Lazy depth-first walk of a single root.
pub struct BoundedWalker<P> {
    stack: Vec<(PathBuf, usize)>,
    max_depth: Option<usize>,
    prune: P,
}

impl<P> BoundedWalker<P>
where
    P: FnMut(&Path) -> bool,
{
    /// `prune` returns true for directories that must not be entered.
    /// `max_depth: None` walks the whole tree; `Some(0)` lists the root only.
    pub fn new(root: impl Into<PathBuf>, max_depth: Option<usize>, prune: P) -> Self {
        Self {
            stack: vec![(root.into(), 0)],
            max_depth,
            prune,
        }
    }
}

impl<P> Iterator for BoundedWalker<P>
where
    P: FnMut(&Path) -> bool,
{
    type Item = DirVisit;

    fn next(&mut self) -> Option<DirVisit> {
        while let Some((dir, depth)) = self.stack.pop() {
            let Some((mut subdirs, files)) = list_dir(&dir) else {
                continue;
            };

            if self.max_depth.is_some_and(|max| depth >= max) {
                subdirs.clear();
            } else {
                subdirs.retain(|sub| !(self.prune)(sub));
            }

            // Reverse so the first subdirectory is visited first
            for sub in subdirs.iter().rev() {
                self.stack.push((sub.clone(), depth + 1));
            }

            return Some(DirVisit {
                dir,
                depth,
                subdirs,
                files,
            });
        }
        None
    }
}

/// Split the direct children of `dir` into subdirectories and files.
///
/// Returns `None` when the directory itself cannot be read. Symlinked
/// directories are not followed; symlinked files count as files.
fn list_dir(dir: &Path) -> Option<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    let mut entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .peekable();

    // walkdir reports an unreadable directory as a single leading error
    if let Some(Err(err)) = entries.peek() {
        if err.depth() == 0 {
            tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), err);
            return None;
        }
    }

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            subdirs.push(entry.into_path());
        } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }

    Some((subdirs, files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    fn build_tree(root: &Path) {
        std::fs::create_dir_all(root.join("a/deep")).unwrap();
        std::fs::create_dir_all(root.join("b")).unwrap();
        std::fs::write(root.join("top.txt"), "top").unwrap();
        std::fs::write(root.join("a/one.txt"), "one").unwrap();
        std::fs::write(root.join("a/deep/two.txt"), "two").unwrap();
        std::fs::write(root.join("b/three.txt"), "three").unwrap();
    }

    #[test]
    fn test_walk_depth_first_in_name_order() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let visits: Vec<DirVisit> = BoundedWalker::new(dir.path(), None, |_| false).collect();
        let order: Vec<(PathBuf, usize)> = visits
            .iter()
            .map(|v| (v.dir.strip_prefix(dir.path()).unwrap().to_path_buf(), v.depth))
            .collect();

        assert_eq!(
            order,
            vec![
                (PathBuf::from(""), 0),
                (PathBuf::from("a"), 1),
                (PathBuf::from("a/deep"), 2),
                (PathBuf::from("b"), 1),
            ]
        );
        assert_eq!(names(&visits[0].files), vec!["top.txt"]);
        assert_eq!(names(&visits[0].subdirs), vec!["a", "b"]);
    }

    #[test]
    fn test_max_depth_lists_files_but_stops_descent() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let visits: Vec<DirVisit> = BoundedWalker::new(dir.path(), Some(1), |_| false).collect();

        assert_eq!(visits.len(), 3);
        let a = visits.iter().find(|v| v.dir.ends_with("a")).unwrap();
        assert!(a.subdirs.is_empty());
        assert_eq!(names(&a.files), vec!["one.txt"]);
        assert!(visits.iter().all(|v| !v.dir.ends_with("deep")));
    }

    #[test]
    fn test_depth_zero_is_root_only() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let visits: Vec<DirVisit> = BoundedWalker::new(dir.path(), Some(0), |_| false).collect();
        assert_eq!(visits.len(), 1);
        assert!(visits[0].subdirs.is_empty());
        assert_eq!(names(&visits[0].files), vec!["top.txt"]);
    }

    #[test]
    fn test_prune_predicate_skips_subtree() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let visits: Vec<DirVisit> =
            BoundedWalker::new(dir.path(), None, |p: &Path| p.ends_with("a")).collect();

        assert_eq!(visits.len(), 2);
        assert_eq!(names(&visits[0].subdirs), vec!["b"]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let mut walker = BoundedWalker::new(missing, None, |_| false);
        assert!(walker.next().is_none());
    }
}
