//! Upload a local tree to the in-memory server and download it back.

use std::sync::Arc;

use filters::{FilterRule, FilterSet};
use test_support::TestTree;
use transfer::{GlobFilter, MemoryEngine, SftpFileTransfer, TransferOptions};

fn populated_tree() -> TestTree {
    let tree = TestTree::new();
    tree.file("project/README.md", b"# project\n");
    tree.file("project/src/main.rs", b"fn main() {}\n");
    tree.file("project/src/lib/mod.rs", b"pub mod util;\n");
    tree.file("project/target/debug/app", &[0x7f, b'E', b'L', b'F']);
    tree.file("project/notes.tmp", b"scratch");
    tree.dir("project/empty");
    tree
}

#[test]
fn tree_survives_a_round_trip() {
    let source = populated_tree();
    let engine = MemoryEngine::new().with_batch_size(3);
    let transfer = SftpFileTransfer::new(engine.clone());

    transfer
        .upload(source.join("project"), "/backup")
        .expect("upload");
    let destination = TestTree::new();
    transfer
        .download("/backup", destination.join("project"))
        .expect("download");

    assert_eq!(destination.entries(), source.entries());
    for file in ["README.md", "src/main.rs", "src/lib/mod.rs", "target/debug/app"] {
        let relative = format!("project/{file}");
        assert_eq!(destination.read(&relative), source.read(&relative), "{file}");
    }
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn filters_apply_on_both_legs() {
    let source = populated_tree();
    let engine = MemoryEngine::new();
    let mut transfer = SftpFileTransfer::new(engine.clone());
    let upload_rules =
        FilterSet::from_rules([FilterRule::exclude("*.tmp")]).expect("valid upload rules");
    let download_rules =
        FilterSet::from_rules([FilterRule::exclude("target")]).expect("valid download rules");
    transfer.set_upload_filter(Some(Arc::new(GlobFilter::new(upload_rules))));
    transfer.set_download_filter(Some(Arc::new(GlobFilter::new(download_rules))));

    transfer
        .upload(source.join("project"), "/backup")
        .expect("upload");
    assert!(!engine.exists("/backup/notes.tmp"));
    assert!(engine.exists("/backup/target/debug/app"));

    let destination = TestTree::new();
    transfer
        .download("/backup", destination.join("project"))
        .expect("download");

    assert_eq!(
        destination.entries(),
        [
            "project/",
            "project/README.md",
            "project/empty/",
            "project/src/",
            "project/src/lib/",
            "project/src/lib/mod.rs",
            "project/src/main.rs",
        ]
    );
}

#[cfg(unix)]
#[test]
fn permissions_survive_a_round_trip() {
    use test_support::{mode_of, set_mode};

    let source = populated_tree();
    set_mode(&source.join("project/target/debug/app"), 0o755);
    set_mode(&source.join("project/README.md"), 0o600);
    let transfer = SftpFileTransfer::new(MemoryEngine::new());

    transfer
        .upload(source.join("project"), "/backup")
        .expect("upload");
    let destination = TestTree::new();
    transfer
        .download("/backup", destination.join("project"))
        .expect("download");

    assert_eq!(
        mode_of(&destination.join("project/target/debug/app")),
        0o755
    );
    assert_eq!(mode_of(&destination.join("project/README.md")), 0o600);
}

#[test]
fn second_upload_merges_into_the_first() {
    let source = populated_tree();
    let engine = MemoryEngine::new();
    let transfer =
        SftpFileTransfer::new(engine.clone()).with_options(TransferOptions::new().preserve_attributes(false));

    transfer
        .upload(source.join("project"), "/project")
        .expect("first upload");
    source.file("project/src/extra.rs", b"// new\n");
    transfer
        .upload(source.join("project"), "/project")
        .expect("second upload");

    assert!(!engine.exists("/project/project"));
    assert_eq!(
        engine.children("/project/src"),
        ["extra.rs", "lib", "main.rs"]
    );
}

#[test]
fn repeat_upload_to_a_renamed_destination_nests() {
    let source = populated_tree();
    let engine = MemoryEngine::new();
    let transfer = SftpFileTransfer::new(engine.clone());

    transfer
        .upload(source.join("project"), "/backup")
        .expect("first upload");
    transfer
        .upload(source.join("project"), "/backup")
        .expect("second upload");

    assert_eq!(engine.created_dirs()[..2], ["/backup", "/backup/empty"]);
    assert!(engine.is_dir("/backup/project/src/lib"));
    assert_eq!(engine.contents("/backup/project/README.md"), engine.contents("/backup/README.md"));
}
