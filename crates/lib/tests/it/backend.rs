//! Backend persistence tests for the bundled InMemory implementation.

use jotdb::backend::{Backend, InMemory};
use jotdb::{Session, Value};

use crate::helpers::*;

#[test]
fn raw_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.json");

    let backend = InMemory::new();
    backend.put(b"plain", b"payload").unwrap();
    backend.put(b"with\xffseparator", b"\xfe\xff\x00").unwrap();
    backend.save_to_file(&path).unwrap();

    let reloaded = InMemory::load_from_file(&path).unwrap();
    assert_eq!(reloaded.get(b"plain").unwrap(), Some(b"payload".to_vec()));
    assert_eq!(
        reloaded.get(b"with\xffseparator").unwrap(),
        Some(b"\xfe\xff\x00".to_vec())
    );
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn unbound_backend_flush_is_a_noop() {
    let backend = InMemory::new();
    backend.put(b"k", b"v").unwrap();
    backend.flush().unwrap();
    assert_eq!(backend.get(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn session_drop_flushes_bound_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.jotdb");

    {
        let session = Session::open(Box::new(InMemory::bound_to_file(&path))).unwrap();
        session
            .root()
            .as_map()
            .unwrap()
            .set("kept", "yes")
            .unwrap();
        // Dropped without an explicit close.
    }

    let session = Session::open(Box::new(InMemory::load_from_file(&path).unwrap())).unwrap();
    assert_eq!(session.export().unwrap(), value(r#"{"kept": "yes"}"#));
}

#[test]
fn corrupt_persisted_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");

    std::fs::write(&path, r#"{"entries": {"zz-not-hex": "00"}}"#).unwrap();
    let err = InMemory::load_from_file(&path).unwrap_err();
    assert!(err.is_corruption());

    // Deserialization failures surface as backend errors too.
    std::fs::write(&path, "not json at all").unwrap();
    let err = InMemory::load_from_file(&path).unwrap_err();
    assert_eq!(err.module(), "backend");
}

#[test]
fn store_key_count_scales_with_document() {
    // Each map entry costs three link/value keys; metadata is constant.
    let empty = session_store_len(Value::empty_map());
    let one = session_store_len(value(r#"{"a": 1}"#));
    let two = session_store_len(value(r#"{"a": 1, "b": 2}"#));
    assert_eq!(one - empty, 3);
    assert_eq!(two - one, 3);
}

fn session_store_len(root: Value) -> usize {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("count.jotdb");
    Session::init(Box::new(InMemory::bound_to_file(&path)), root)
        .unwrap()
        .close()
        .unwrap();
    InMemory::load_from_file(&path).unwrap().len()
}
