//! File actions offered on a result row: open, reveal, delete.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ActionError;

/// Removes a file from disk.
///
/// [`DuplicateSet::delete_member`](crate::dedup::DuplicateSet::delete_member)
/// goes through this so tests and dry runs can swap the backend.
pub trait FileDeleter {
    fn delete(&self, path: &Path) -> io::Result<()>;
}

/// Deletes with `std::fs::remove_file`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDeleter;

impl FileDeleter for FsDeleter {
    fn delete(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Deletes nothing; logs what would have been removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunDeleter;

impl FileDeleter for DryRunDeleter {
    fn delete(&self, path: &Path) -> io::Result<()> {
        tracing::info!("[dry run] would delete {}", path.display());
        Ok(())
    }
}

/// Open a file in the system default viewer.
pub fn open_with_default(path: &Path) -> Result<(), ActionError> {
    if !path.exists() {
        return Err(ActionError::Missing(path.to_path_buf()));
    }
    launch(path)
}

/// Open the folder containing `path` in the system file browser.
pub fn open_containing_folder(path: &Path) -> Result<(), ActionError> {
    let folder = containing_folder(path);
    if !folder.exists() {
        return Err(ActionError::Missing(folder));
    }
    launch(&folder)
}

/// Directory shown by [`open_containing_folder`]; a directory reveals itself.
pub fn containing_folder(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

fn launch(path: &Path) -> Result<(), ActionError> {
    tracing::debug!("Opening {}", path.display());
    opener::open(path).map_err(|source| ActionError::Open {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_deleter_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, "x").unwrap();

        FsDeleter.delete(&path).unwrap();
        assert!(!path.exists());
        assert!(FsDeleter.delete(&path).is_err());
    }

    #[test]
    fn test_dry_run_keeps_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        std::fs::write(&path, "x").unwrap();

        DryRunDeleter.delete(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_containing_folder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, "x").unwrap();

        assert_eq!(containing_folder(&path), dir.path());
        assert_eq!(containing_folder(dir.path()), dir.path());
    }

    #[test]
    fn test_open_missing_file_fails_without_launching() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        assert!(matches!(
            open_with_default(&missing),
            Err(ActionError::Missing(_))
        ));
        assert!(matches!(
            open_containing_folder(&dir.path().join("nope/missing.txt")),
            Err(ActionError::Missing(_))
        ));
    }
}
