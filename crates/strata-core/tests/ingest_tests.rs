use std::fs;
use std::io::Write;
use tempfile::TempDir;

use strata_core::ingest::ParagraphIngestor;
use strata_core::{Error, Ingestor};

#[test]
fn single_small_file_is_one_document() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let docs = ParagraphIngestor::new().ingest(&file_path.to_string_lossy()).expect("ingest");

    assert_eq!(docs.len(), 1, "one small paragraph becomes one document");
    assert_eq!(docs[0].text, "Short text");
    assert_eq!(docs[0].id, "a:0");
    assert_eq!(docs[0].metadata.get("chunk_index").map(String::as_str), Some("0"));
}

#[test]
fn blank_paragraphs_are_dropped() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("essay.txt");
    fs::write(&file_path, "First.\n\n\n\n   \n\nSecond.\n\nThird.\n").unwrap();

    let docs = ParagraphIngestor::new().ingest(&file_path.to_string_lossy()).expect("ingest");
    let texts: Vec<_> = docs.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["First.", "Second.", "Third."]);
}

#[test]
fn directory_is_walked_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("nested")).unwrap();
    fs::write(tmp.path().join("b.txt"), "bravo").unwrap();
    fs::write(tmp.path().join("a.md"), "alpha\n\nalpha two").unwrap();
    fs::write(tmp.path().join("nested/c.txt"), "charlie").unwrap();
    fs::write(tmp.path().join("skip.bin"), "binary").unwrap();

    let docs = ParagraphIngestor::new().ingest(&tmp.path().to_string_lossy()).expect("ingest");
    let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a:0", "a:1", "b:0", "c:0"]);
}

#[test]
fn empty_file_yields_no_documents() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("empty.txt");
    fs::write(&file_path, "").unwrap();
    assert!(ParagraphIngestor::new().ingest(&file_path.to_string_lossy()).expect("ingest").is_empty());
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("latin.txt");
    fs::write(&file_path, b"caf\xe9 au lait").unwrap();
    let docs = ParagraphIngestor::new().ingest(&file_path.to_string_lossy()).expect("ingest");
    assert_eq!(docs[0].text, "caf\u{fffd} au lait");
}

#[test]
fn missing_resource_is_an_ingestion_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.txt");
    assert!(matches!(ParagraphIngestor::new().ingest(&missing.to_string_lossy()), Err(Error::Ingestion(_))));
}

#[cfg(unix)]
#[test]
fn broken_link_in_directory_is_an_ingestion_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "alpha").unwrap();
    std::os::unix::fs::symlink(tmp.path().join("gone.txt"), tmp.path().join("b.txt")).unwrap();
    assert!(matches!(ParagraphIngestor::new().ingest(&tmp.path().to_string_lossy()), Err(Error::Ingestion(_))));
}
