//! Integration tests for FileHound duplicate detection
//!
//! Verifies the full workflow: scan on the background engine, browse the
//! resulting groups, delete members from disk.

use std::path::Path;

use parking_lot::Mutex;
use tempfile::tempdir;

use filehound::core::{CancelToken, ScanContext, ScanOutcome, ScanRequest};
use filehound::dedup::find_duplicates;
use filehound::{
    DuplicateEngine, DuplicateGroup, DuplicateSet, Duplicates, EngineError, FsDeleter,
    MemberRemoval, RequestError,
};

fn write(base: &Path, rel: &str, content: &[u8]) {
    let path = base.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn scan(engine: &DuplicateEngine, request: ScanRequest) -> Vec<DuplicateGroup> {
    let report = engine.start(request).unwrap().wait();
    report.outcome.into_results().unwrap()
}

#[test]
fn test_identical_notes_in_two_folders() {
    let base = tempdir().unwrap();
    write(base.path(), "one/notes.txt", b"0123456789");
    write(base.path(), "two/notes.txt", b"0123456789");
    write(base.path(), "one/image.png", b"\x89PNG-first");
    write(base.path(), "two/image.png", b"\x89PNG-other");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path().join("one"));
    engine.add_root(base.path().join("two"));

    let groups = scan(&engine, engine.request().build().unwrap());

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.name, "notes.txt");
    assert_eq!(group.size, 10);
    assert_eq!(
        group.paths,
        vec![
            base.path().join("one").join("notes.txt"),
            base.path().join("two").join("notes.txt"),
        ]
    );
    assert_eq!(group.hash, blake3::hash(b"0123456789").to_hex().to_string());
}

#[test]
fn test_statuses_follow_both_passes() {
    let base = tempdir().unwrap();
    write(base.path(), "a.bin", b"same");
    write(base.path(), "b.bin", b"same");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path());
    let handle = engine.start(engine.request().build().unwrap()).unwrap();

    let mut statuses = Vec::new();
    let report = handle.wait_with(|s| statuses.push(s.to_string()));

    assert_eq!(
        statuses.first().map(String::as_str),
        Some(format!("Indexing: {}", base.path().display()).as_str())
    );
    assert!(statuses.iter().any(|s| s == "Comparing candidates..."));
    assert_eq!(
        statuses.iter().filter(|s| s.starts_with("Hashing: ")).count(),
        2
    );
    assert_eq!(report.summary, "1 duplicate set(s) found covering 2 files.");
}

#[test]
fn test_parallel_workers_find_same_groups() {
    let base = tempdir().unwrap();
    for i in 0..8 {
        write(base.path(), &format!("docs/copy{}.txt", i), b"shared text");
        write(base.path(), &format!("pics/img{}.raw", i), &[i as u8; 64]);
    }
    write(base.path(), "pics/extra.raw", &[0u8; 64]);

    let sequential = DuplicateEngine::new(Duplicates::with_workers(1));
    let parallel = DuplicateEngine::new(Duplicates::with_workers(4));
    sequential.add_root(base.path());
    parallel.add_root(base.path());

    let a = scan(&sequential, sequential.request().build().unwrap());
    let b = scan(&parallel, parallel.request().build().unwrap());

    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].name, "copy0.txt");
    assert_eq!(a[0].paths.len(), 8);
    assert_eq!(a[1].name, "extra.raw");
    assert_eq!(a[1].paths.len(), 2);
}

#[test]
fn test_excluded_folder_never_grouped() {
    let base = tempdir().unwrap();
    write(base.path(), "src/lib.js", b"same");
    write(base.path(), "node_modules/pkg/lib.js", b"same");
    write(base.path(), "src/util.js", b"same");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path());
    let request = engine.request().exclude_folder("node_modules").build().unwrap();
    let groups = scan(&engine, request);

    assert_eq!(groups.len(), 1);
    assert!(groups[0]
        .paths
        .iter()
        .all(|p| !p.to_string_lossy().contains("node_modules")));
}

#[test]
fn test_deleting_down_to_one_copy_dissolves_group() {
    let base = tempdir().unwrap();
    write(base.path(), "a/report.pdf", b"quarterly");
    write(base.path(), "b/report.pdf", b"quarterly");
    write(base.path(), "c/report.pdf", b"quarterly");
    write(base.path(), "keep/other.txt", b"x1");
    write(base.path(), "keep/other2.txt", b"x1");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path());
    let groups = scan(&engine, engine.request().build().unwrap());
    assert_eq!(groups.len(), 2);

    let mut set = DuplicateSet::new(groups, 1);
    assert_eq!(set.pages_mut().next_page().len(), 1);

    let pdfs = set.groups().iter().find(|g| g.name == "report.pdf").unwrap().clone();
    let first = set.delete_member(&pdfs.hash, &pdfs.paths[0], &FsDeleter).unwrap();
    assert_eq!(first, MemberRemoval::Removed { remaining: 2 });

    let second = set.delete_member(&pdfs.hash, &pdfs.paths[1], &FsDeleter).unwrap();
    assert_eq!(second, MemberRemoval::GroupDissolved);

    assert!(!pdfs.paths[0].exists());
    assert!(!pdfs.paths[1].exists());
    assert!(pdfs.paths[2].exists());
    assert_eq!(set.len(), 1);
    assert!(set.group(&pdfs.hash).is_none());
    assert_eq!(set.pages().cursor(), set.pages().rendered().len());
}

#[test]
fn test_failed_delete_keeps_group() {
    let base = tempdir().unwrap();
    write(base.path(), "a.txt", b"dup");
    write(base.path(), "b.txt", b"dup");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path());
    let groups = scan(&engine, engine.request().build().unwrap());
    let mut set = DuplicateSet::new(groups.clone(), 50);

    // Removed behind our back: the delete fails and nothing changes
    std::fs::remove_file(&groups[0].paths[0]).unwrap();
    let result = set.delete_member(&groups[0].hash, &groups[0].paths[0], &FsDeleter);

    assert!(result.is_err());
    assert_eq!(set.groups(), groups.as_slice());
}

#[test]
fn test_no_duplicates_summary() {
    let base = tempdir().unwrap();
    write(base.path(), "a.txt", b"one");
    write(base.path(), "b.txt", b"two!");

    let engine = DuplicateEngine::default();
    engine.add_root(base.path());
    let report = engine.start(engine.request().build().unwrap()).unwrap().wait();

    assert_eq!(report.outcome, ScanOutcome::Complete(Vec::new()));
    assert_eq!(report.summary, "No duplicates found.");
}

#[test]
fn test_requires_a_folder() {
    let engine = DuplicateEngine::default();
    let err = engine.start(engine.request().build().unwrap()).err();
    assert!(matches!(
        err,
        Some(EngineError::InvalidRequest(RequestError::NoRoots))
    ));
}

#[test]
fn test_same_folder_spelled_twice_is_not_a_duplicate() {
    let base = tempdir().unwrap();
    write(base.path(), "only.txt", b"single copy");
    std::fs::create_dir_all(base.path().join("sub")).unwrap();

    let engine = DuplicateEngine::default();
    assert!(engine.add_root(base.path()));
    assert!(!engine.add_root(base.path().join("sub").join("..")));
    assert_eq!(engine.roots().len(), 1);

    assert!(scan(&engine, engine.request().build().unwrap()).is_empty());

    // Spellings that reach the builder directly collapse as well
    let request = ScanRequest::builder()
        .root(base.path())
        .root(base.path().join("sub/.."))
        .build()
        .unwrap();
    assert_eq!(request.roots().len(), 1);
    assert!(scan(&DuplicateEngine::default(), request).is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinked_folder_is_not_a_duplicate() {
    let base = tempdir().unwrap();
    write(base.path(), "real/only.txt", b"single copy");
    std::os::unix::fs::symlink(base.path().join("real"), base.path().join("alias")).unwrap();

    let engine = DuplicateEngine::default();
    engine.add_root(base.path().join("real"));
    engine.add_root(base.path().join("alias"));

    assert!(scan(&engine, engine.request().build().unwrap()).is_empty());
}

#[test]
fn test_stop_while_indexing_discards_everything() {
    let base = tempdir().unwrap();
    for i in 0..8 {
        write(base.path(), &format!("dir{}/copy.bin", i), b"same bytes");
    }

    let request = ScanRequest::builder().root(base.path()).build().unwrap();

    let cancel = CancelToken::new();
    let statuses = Mutex::new(Vec::new());
    let sink = |status: &str| {
        let mut seen = statuses.lock();
        seen.push(status.to_string());
        if seen.len() == 3 {
            cancel.cancel();
        }
    };
    let ctx = ScanContext::new(&cancel, &sink);

    let outcome = find_duplicates(&request, &ctx, 1);
    assert_eq!(outcome, ScanOutcome::Stopped);

    let statuses = statuses.lock().clone();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|s| s.starts_with("Indexing: ")));
}
