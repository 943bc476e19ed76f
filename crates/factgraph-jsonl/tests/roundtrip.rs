//! Integration tests for read/write round-trip operations.
//!
//! These tests verify that data written with `JsonlWriter` reads back
//! identically through `JsonlReader` and `read_jsonl`.

use factgraph_jsonl::{Error, JsonlReader, JsonlWriter, read_jsonl};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct TestRecord {
    id: u32,
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,
}

fn record(id: u32, name: &str) -> TestRecord {
    TestRecord {
        id,
        name: name.to_string(),
        attrs: BTreeMap::new(),
    }
}

async fn roundtrip(original: &[TestRecord]) -> Vec<TestRecord> {
    let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
    writer.write_all(original).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    JsonlReader::new(Cursor::new(data)).read_all().await.unwrap()
}

#[rstest]
#[case::simple(vec![record(1, "api")])]
#[case::special_chars(vec![record(42, "Line1\nLine2\tTabbed\"Quoted\"\\Backslash")])]
#[case::unicode(vec![record(1, "Hello, \u{4e16}\u{754c}! \u{1F600}")])]
#[case::empty_name(vec![record(1, "")])]
#[case::many(vec![record(1, "a"), record(2, "b"), record(3, "c")])]
#[tokio::test]
async fn roundtrip_preserves_records(#[case] original: Vec<TestRecord>) {
    assert_eq!(roundtrip(&original).await, original);
}

#[tokio::test]
async fn roundtrip_preserves_order_of_many_records() {
    let original: Vec<TestRecord> = (0..500).map(|i| record(i, &format!("r{i}"))).collect();
    let read_back = roundtrip(&original).await;
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn file_roundtrip_through_read_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");

    let mut with_attrs = record(2, "with attrs");
    with_attrs
        .attrs
        .insert("exported".to_string(), "true".to_string());
    let original = vec![record(1, "first"), with_attrs];

    let mut writer = JsonlWriter::new(tokio::fs::File::create(&path).await.unwrap());
    writer.write_all(&original).await.unwrap();
    writer.flush().await.unwrap();
    let read_back: Vec<TestRecord> = read_jsonl(&path).await.unwrap();

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_jsonl::<TestRecord, _>(dir.path().join("nope.jsonl")).await;
    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn corrupt_line_aborts_file_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jsonl");
    tokio::fs::write(
        &path,
        "{\"id\":1,\"name\":\"ok\"}\n{\"id\":2,\"name\":\n{\"id\":3,\"name\":\"ok\"}\n",
    )
    .await
    .unwrap();

    let err = read_jsonl::<TestRecord, _>(&path).await.unwrap_err();
    assert_eq!(err.line_number(), Some(2));
}
