use std::fs;
use std::sync::Arc;

use filetime::FileTime;
use test_support::TestTree;

use super::support::{Event, TrackedFile, dir, file, recording};
use crate::{
    FileKind, FileSystemFile, MemoryEngine, RemoteOperation, RemoteResourceInfo, SftpError,
    SftpFileTransfer, StatusCode, TransferError, TransferOptions,
};

fn sample_server() -> MemoryEngine {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/a/b", b"bee", 0o640);
    engine.add_dir("/srv/a/sub", 0o750);
    engine.add_file("/srv/a/sub/c", b"sea", 0o600);
    engine.set_times("/srv/a/b", 1_600_000_000, 1_650_000_000);
    engine
}

fn mtime_of(path: &std::path::Path) -> i64 {
    let metadata = fs::metadata(path).expect("inspect local file");
    FileTime::from_last_modification_time(&metadata).unix_seconds()
}

#[test]
fn directory_nests_inside_existing_local_directory() {
    let engine = sample_server();
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    transfer.download("/srv/a", tree.path()).expect("download");

    assert_eq!(tree.entries(), ["a/", "a/b", "a/sub/", "a/sub/c"]);
    assert_eq!(tree.read("a/b"), b"bee");
    assert_eq!(tree.read("a/sub/c"), b"sea");
    assert_eq!(
        listener.events(),
        [
            dir("a"),
            file("b", 3),
            Event::FinishedFile,
            dir("sub"),
            file("c", 3),
            Event::FinishedFile,
            Event::FinishedDir,
            Event::FinishedDir,
        ]
    );
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn directory_lands_at_missing_local_path() {
    let engine = sample_server();
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    transfer.download("/srv/a", tree.join("copy")).expect("download");

    assert_eq!(tree.entries(), ["copy/", "copy/b", "copy/sub/", "copy/sub/c"]);
}

#[test]
fn same_named_local_directory_is_merged_into() {
    let engine = sample_server();
    let tree = TestTree::new();
    tree.file("a/local-only", b"kept");
    let (transfer, _) = recording(&engine);

    transfer.download("/srv/a", tree.join("a")).expect("download");

    assert_eq!(
        tree.entries(),
        ["a/", "a/b", "a/local-only", "a/sub/", "a/sub/c"]
    );
}

#[test]
fn file_lands_inside_existing_local_directory() {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/report.txt", b"q3", 0o644);
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    transfer
        .download("/srv/report.txt", tree.path())
        .expect("download");

    assert_eq!(tree.entries(), ["report.txt"]);
    assert_eq!(
        listener.events(),
        [file("report.txt", 2), Event::FinishedFile]
    );
}

#[test]
fn file_replaces_existing_local_file() {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/report.txt", b"q3", 0o644);
    let tree = TestTree::new();
    tree.file("current.txt", b"a much longer previous revision");
    let (transfer, _) = recording(&engine);

    transfer
        .download("/srv/report.txt", tree.join("current.txt"))
        .expect("download");

    assert_eq!(tree.entries(), ["current.txt"]);
    assert_eq!(tree.read("current.txt"), b"q3");
}

#[test]
fn directory_onto_local_file_is_a_conflict() {
    let engine = sample_server();
    let tree = TestTree::new();
    tree.file("a", b"precious");
    let (transfer, _) = recording(&engine);

    let error = transfer
        .download("/srv/a", tree.path())
        .expect_err("conflict");

    assert!(matches!(
        error,
        TransferError::Conflict {
            existing: FileKind::Regular,
            ..
        }
    ));
    assert_eq!(tree.read("a"), b"precious");
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn file_onto_local_directory_child_is_a_conflict() {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/report.txt", b"q3", 0o644);
    let tree = TestTree::new();
    tree.dir("report.txt");

    let (transfer, _) = recording(&engine);
    let error = transfer
        .download("/srv/report.txt", tree.path())
        .expect_err("conflict");

    assert!(matches!(
        error,
        TransferError::Conflict {
            existing: FileKind::Directory,
            ..
        }
    ));
}

#[test]
fn times_are_copied() {
    let engine = sample_server();
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    transfer.download("/srv/a", tree.path()).expect("download");

    let metadata = fs::metadata(tree.join("a/b")).expect("inspect");
    assert_eq!(
        FileTime::from_last_access_time(&metadata).unix_seconds(),
        1_600_000_000
    );
    assert_eq!(mtime_of(&tree.join("a/b")), 1_650_000_000);
}

#[cfg(unix)]
#[test]
fn permissions_are_copied() {
    use test_support::mode_of;

    let engine = sample_server();
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    transfer.download("/srv/a", tree.path()).expect("download");

    assert_eq!(mode_of(&tree.join("a/b")), 0o640);
    assert_eq!(mode_of(&tree.join("a/sub")), 0o750);
    assert_eq!(mode_of(&tree.join("a/sub/c")), 0o600);
}

#[test]
fn attributes_are_left_alone_when_disabled() {
    let engine = sample_server();
    engine.set_times("/srv/a/b", 1_000_000_000, 1_000_000_000);
    let tree = TestTree::new();
    let transfer = SftpFileTransfer::new(engine.clone())
        .with_options(TransferOptions::new().preserve_attributes(false));

    transfer.download("/srv/a", tree.path()).expect("download");

    assert_eq!(tree.read("a/b"), b"bee");
    assert_ne!(mtime_of(&tree.join("a/b")), 1_000_000_000);
}

#[test]
fn untyped_entry_is_downloaded_as_a_file() {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/blob", b"data", 0o644);
    engine.hide_type("/srv/blob");
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    transfer.download("/srv/blob", tree.path()).expect("download");

    assert_eq!(tree.read("blob"), b"data");
    assert_eq!(listener.events(), [file("blob", 4), Event::FinishedFile]);
}

#[test]
fn symlink_is_rejected_mid_walk() {
    let engine = MemoryEngine::new();
    engine.add_file("/srv/links/a", b"first", 0o644);
    engine.add_special("/srv/links/z", FileKind::Symlink);
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    let error = transfer
        .download("/srv/links", tree.path())
        .expect_err("unsupported");

    assert!(matches!(
        &error,
        TransferError::UnsupportedEntry { path, kind: FileKind::Symlink } if path == "/srv/links/z"
    ));
    assert_eq!(tree.entries(), ["links/", "links/a"]);
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn filter_prunes_entries_and_subtrees() {
    let engine = sample_server();
    engine.add_file("/srv/a/debug.log", b"noise", 0o644);
    engine.add_file("/srv/a/sub/trace.log", b"noise", 0o644);
    let tree = TestTree::new();
    let (mut transfer, _) = recording(&engine);
    transfer.set_download_filter(Some(Arc::new(|resource: &RemoteResourceInfo| {
        !resource.name().ends_with(".log")
    })));

    transfer.download("/srv/a", tree.path()).expect("download");

    assert_eq!(tree.entries(), ["a/", "a/b", "a/sub/", "a/sub/c"]);
}

#[test]
fn listing_spans_several_batches() {
    let engine = MemoryEngine::new().with_batch_size(2);
    for index in 0..7 {
        engine.add_file(&format!("/srv/many/f{index}"), b"x", 0o644);
    }
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    transfer.download("/srv/many", tree.path()).expect("download");

    assert_eq!(tree.entries().len(), 8);
}

#[test]
fn read_failure_mid_walk_closes_every_handle() {
    let engine = sample_server();
    engine.fail_reads("/srv/a/sub/c", StatusCode::Failure);
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    let error = transfer
        .download("/srv/a", tree.path())
        .expect_err("read fails");

    assert_eq!(
        error.as_remote().map(SftpError::code),
        Some(StatusCode::Failure)
    );
    assert_eq!(engine.open_handles(), 0);
    assert_eq!(tree.read("a/b"), b"bee");
    assert_eq!(listener.events().last(), Some(&file("c", 3)));
}

#[test]
fn directory_open_failure_is_reported() {
    let engine = sample_server();
    engine.fail(
        RemoteOperation::OpenDir,
        "/srv/a/sub",
        StatusCode::PermissionDenied,
    );
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    let error = transfer
        .download("/srv/a", tree.path())
        .expect_err("opendir fails");

    assert_eq!(
        error.as_remote().map(SftpError::code),
        Some(StatusCode::PermissionDenied)
    );
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn missing_remote_source_is_reported() {
    let engine = MemoryEngine::new();
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    let error = transfer
        .download("/srv/absent", tree.path())
        .expect_err("missing source");

    assert!(error.as_remote().is_some_and(SftpError::is_no_such_file));
    assert!(tree.entries().is_empty());
    assert!(listener.events().is_empty());
}

#[test]
fn small_packets_fall_back_to_the_buffer_floor() {
    let engine = MemoryEngine::new().with_packet_sizes(100, 32 * 1024);
    engine.add_file("/blob", &[9_u8; 2000], 0o644);
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    transfer.download("/blob", tree.path()).expect("download");

    assert_eq!(listener.progress(), [512, 1024, 1536, 2000]);
    assert_eq!(tree.read("blob").len(), 2000);
}

#[test]
fn relative_source_resolves_against_home() {
    let engine = MemoryEngine::new().with_home("/home/deploy");
    engine.add_file("/home/deploy/notes/todo.txt", b"ship", 0o644);
    let tree = TestTree::new();
    let (transfer, listener) = recording(&engine);

    transfer.download("notes", tree.path()).expect("download");

    assert_eq!(tree.entries(), ["notes/", "notes/todo.txt"]);
    assert_eq!(listener.events().first(), Some(&dir("notes")));
}

#[test]
fn dot_source_takes_the_canonical_name() {
    let engine = MemoryEngine::new().with_home("/home/deploy");
    engine.add_file("/home/deploy/todo.txt", b"ship", 0o644);
    let tree = TestTree::new();
    let (transfer, _) = recording(&engine);

    transfer.download(".", tree.path()).expect("download");

    assert_eq!(tree.entries(), ["deploy/", "deploy/todo.txt"]);
}

#[test]
fn times_are_skipped_when_the_destination_does_not_keep_them() {
    let engine = sample_server();
    let tree = TestTree::new();
    let tracked = TrackedFile::new(FileSystemFile::new(tree.path()), false);
    let transfer = SftpFileTransfer::new(engine);

    transfer.download_to("/srv/a", &tracked).expect("download");

    let calls = tracked.calls();
    assert!(calls.contains(&"set_permissions"), "{calls:?}");
    assert!(!calls.iter().any(|call| call.contains("time")), "{calls:?}");
    assert_eq!(tree.read("a/b"), b"bee");
    assert_ne!(mtime_of(&tree.join("a/b")), 1_650_000_000);
}

#[test]
fn times_are_applied_when_the_destination_keeps_them() {
    let engine = sample_server();
    let tree = TestTree::new();
    let tracked = TrackedFile::new(FileSystemFile::new(tree.path()), true);
    let transfer = SftpFileTransfer::new(engine);

    transfer.download_to("/srv/a", &tracked).expect("download");

    let calls = tracked.calls();
    assert!(calls.contains(&"set_last_access_time"), "{calls:?}");
    assert!(calls.contains(&"set_last_modified_time"), "{calls:?}");
}
