mod common;

use std::fs;
use std::path::Path;

use common::FakeEncoder;
use lexrag::{
    IndexOutcome, IndexStore, PlainTextExtractor, RagError, Retriever, TextExtractor,
    collect_documents, index_key, load_document,
};

fn long_text(tag: &str) -> String {
    format!(
        "{tag}: a filler paragraph that is comfortably longer than the minimum \
         usable length threshold for indexing.\nIt even has a second paragraph."
    )
}

#[test]
fn collects_only_usable_plain_text_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("contract.txt"), long_text("contract")).unwrap();
    fs::write(dir.path().join("notes.md"), long_text("notes")).unwrap();
    fs::write(dir.path().join("stub.txt"), "too short").unwrap();
    fs::write(dir.path().join("scan.pdf"), b"%PDF-1.4 not our problem").unwrap();

    let mut docs = collect_documents(dir.path()).unwrap();
    docs.sort_by(|a, b| a.key.cmp(&b.key));

    let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["contract", "notes"]);
    assert!(docs.iter().all(|d| d.size > 0));
}

#[test]
fn missing_root_is_an_error() {
    assert!(collect_documents(Path::new("/definitely/not/here")).is_err());
}

#[test]
fn key_is_the_file_stem() {
    assert_eq!(index_key(Path::new("/tmp/intake/Smith v Jones.txt")), "Smith v Jones");
    assert_eq!(index_key(Path::new("notes.final.md")), "notes.final");
}

#[test]
fn short_file_loads_as_nothing_to_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stub.txt");
    fs::write(&path, "too short").unwrap();

    let doc = load_document(&path, &PlainTextExtractor).unwrap();
    assert!(doc.is_none());
}

#[test]
fn invalid_utf8_is_a_distinct_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbled.txt");
    fs::write(&path, [0xff, 0xfe, 0x41, 0x80]).unwrap();

    let err = PlainTextExtractor.extract(&path).unwrap_err();
    assert!(matches!(err, RagError::InvalidUtf8 { .. }));
}

#[test]
fn index_directory_indexes_each_document_by_stem() {
    let docs_dir = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    fs::write(docs_dir.path().join("contract.txt"), long_text("contract")).unwrap();
    fs::write(docs_dir.path().join("stub.txt"), "too short").unwrap();

    let mut retriever =
        Retriever::with_encoder(FakeEncoder, IndexStore::open(store_dir.path()).unwrap());
    let mut outcomes = retriever.index_directory(docs_dir.path()).unwrap();
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, "contract");
    assert!(matches!(outcomes[0].1, IndexOutcome::Indexed { .. }));
    assert!(retriever.store().contains("contract"));
    assert!(!retriever.store().contains("stub"));
}
