//! Map view tests: insertion order, lookups, removal, clearing.

use jotdb::{Scalar, Value};

use crate::helpers::*;

fn keys_of(map: &jotdb::MapRef) -> Vec<String> {
    map.keys().unwrap().map(Result::unwrap).collect()
}

#[test]
fn set_and_get_primitives() {
    let session = test_session();
    let root = session.root().as_map().unwrap();

    root.set("int", 4i64).unwrap();
    root.set("text", "Hello, World!").unwrap();
    root.set("flag", true).unwrap();
    root.set("nothing", Value::Null).unwrap();

    assert_eq!(root.get("int").unwrap().scalar().unwrap(), Scalar::Int(4));
    assert_eq!(
        root.get("text").unwrap().scalar().unwrap(),
        Scalar::Text("Hello, World!".to_string())
    );
    assert_eq!(root.get("flag").unwrap().scalar().unwrap(), Scalar::Bool(true));
    assert!(root.get("nothing").unwrap().scalar().unwrap().is_null());
}

#[test]
fn missing_key_is_not_found() {
    let session = test_session();
    let root = session.root().as_map().unwrap();
    root.set("present", 1i64).unwrap();

    assert!(root.get("absent").unwrap_err().is_not_found());
    assert!(root.try_get("absent").unwrap().is_none());
    assert!(root.remove("absent").unwrap_err().is_not_found());
    assert!(!root.contains("absent").unwrap());
    assert!(root.contains("present").unwrap());
}

#[test]
fn iteration_follows_insertion_order() {
    let session = test_session();
    let root = session.root().as_map().unwrap();

    for key in ["a", "b", "c"] {
        root.set(key, 1i64).unwrap();
    }
    assert_eq!(keys_of(&root), ["a", "b", "c"]);

    // Deleting and re-inserting moves the key to the end.
    root.remove("b").unwrap();
    assert_eq!(keys_of(&root), ["a", "c"]);
    root.set("b", 2i64).unwrap();
    assert_eq!(keys_of(&root), ["a", "c", "b"]);
}

#[test]
fn reassignment_keeps_position() {
    let session = test_session();
    let root = session.root().as_map().unwrap();

    for key in ["a", "b", "c"] {
        root.set(key, 1i64).unwrap();
    }
    root.set("b", 99i64).unwrap();

    assert_eq!(keys_of(&root), ["a", "b", "c"]);
    assert_eq!(root.get("b").unwrap().scalar().unwrap(), Scalar::Int(99));
    assert_eq!(root.len().unwrap(), 3);
}

#[test]
fn order_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.jotdb");

    let session = jotdb::Session::open(Box::new(jotdb::backend::InMemory::bound_to_file(&path)))
        .unwrap();
    let root = session.root().as_map().unwrap();
    for key in ["zeta", "alpha", "mid"] {
        root.set(key, 0i64).unwrap();
    }
    session.close().unwrap();

    let session =
        jotdb::Session::open(Box::new(jotdb::backend::InMemory::load_from_file(&path).unwrap()))
            .unwrap();
    let root = session.root().as_map().unwrap();
    assert_eq!(keys_of(&root), ["zeta", "alpha", "mid"]);
}

#[test]
fn nested_assignment_materializes_containers() {
    let session = test_session();
    let root = session.root().as_map().unwrap();

    root.set("map2", value(r#"{"aaa": 1, "bbb": [2, 3]}"#)).unwrap();

    let map2 = root.get("map2").unwrap().as_map().unwrap();
    assert_eq!(map2.len().unwrap(), 2);
    assert_eq!(
        map2.materialize().unwrap(),
        value(r#"{"aaa": 1, "bbb": [2, 3]}"#)
    );

    map2.remove("bbb").unwrap();
    assert_eq!(map2.materialize().unwrap(), value(r#"{"aaa": 1}"#));
}

#[test]
fn iter_yields_keys_with_live_references() {
    let session = session_with(value(r#"{"x": 1, "y": {"inner": 2}}"#));
    let root = session.root().as_map().unwrap();

    let entries: Vec<(String, Value)> = root
        .iter()
        .unwrap()
        .map(|entry| {
            let (key, reference) = entry.unwrap();
            (key, reference.materialize().unwrap())
        })
        .collect();

    assert_eq!(
        entries,
        vec![
            ("x".to_string(), Value::Int(1)),
            ("y".to_string(), value(r#"{"inner": 2}"#)),
        ]
    );
}

#[test]
fn clear_empties_the_map() {
    let session = session_with(sample_document());
    let root = session.root().as_map().unwrap();
    assert_eq!(root.len().unwrap(), 8);

    root.clear().unwrap();
    assert!(root.is_empty().unwrap());
    assert_eq!(keys_of(&root), Vec::<String>::new());
    assert_eq!(session.export().unwrap(), Value::empty_map());
}

#[test]
fn len_tracks_mutations() {
    let session = test_session();
    let root = session.root().as_map().unwrap();
    assert_eq!(root.len().unwrap(), 0);

    root.set("a", 1i64).unwrap();
    root.set("b", 2i64).unwrap();
    assert_eq!(root.len().unwrap(), 2);

    root.set("a", 3i64).unwrap();
    assert_eq!(root.len().unwrap(), 2);

    root.remove("a").unwrap();
    assert_eq!(root.len().unwrap(), 1);
}
