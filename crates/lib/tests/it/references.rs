//! Reference layer tests: lazy resolution, invalidation, materialization,
//! structural equality, deep destruction on overwrite.

use jotdb::{Node, Value};

use crate::helpers::*;

#[test]
fn materialize_round_trips_nested_documents() {
    let session = session_with(sample_document());
    assert_eq!(session.root().materialize().unwrap(), sample_document());
}

#[test]
fn references_are_lazy_and_observe_later_writes() {
    let session = session_with(value(r#"{"x": {"y": 1}}"#));
    let root = session.root().as_map().unwrap();

    // Derived before the write, resolved after it.
    let y = root.get("x").unwrap().as_map().unwrap().get("y").unwrap();
    root.get("x")
        .unwrap()
        .as_map()
        .unwrap()
        .set("y", 2i64)
        .unwrap();

    assert_eq!(y.materialize().unwrap(), Value::Int(2));
}

#[test]
fn node_dispatches_on_stored_shape() {
    let session = session_with(value(r#"{"n": 1, "m": {}, "l": []}"#));
    let root = session.root().as_map().unwrap();

    assert!(matches!(
        root.get("n").unwrap().node().unwrap(),
        Node::Primitive(_)
    ));
    assert!(matches!(root.get("m").unwrap().node().unwrap(), Node::Map(_)));
    assert!(matches!(root.get("l").unwrap().node().unwrap(), Node::List(_)));
}

#[test]
fn shape_views_reject_wrong_shapes() {
    let session = session_with(value(r#"{"n": 1, "l": [1]}"#));
    let root = session.root().as_map().unwrap();

    assert!(root.get("n").unwrap().as_map().unwrap_err().is_type_error());
    assert!(root.get("l").unwrap().as_map().unwrap_err().is_type_error());
    assert!(root.get("n").unwrap().as_list().unwrap_err().is_type_error());
    assert!(root.get("l").unwrap().scalar().unwrap_err().is_type_error());
}

#[test]
fn deleting_an_entry_invalidates_references_below_it() {
    let session = session_with(value(r#"{"x": {"y": 1}}"#));
    let root = session.root().as_map().unwrap();
    let x = root.get("x").unwrap();
    let y = x.as_map().unwrap().get("y").unwrap();

    root.remove("x").unwrap();

    assert!(!y.is_live().unwrap());
    assert!(y.materialize().unwrap_err().is_invalid_reference());
    assert!(y.set(2i64).unwrap_err().is_invalid_reference());
    assert!(y.node().unwrap_err().is_invalid_reference());
    assert!(x.materialize().unwrap_err().is_invalid_reference());
}

#[test]
fn clearing_a_container_invalidates_entry_references() {
    let session = session_with(value(r#"{"x": 1}"#));
    let root = session.root().as_map().unwrap();
    let x = root.get("x").unwrap();

    root.clear().unwrap();
    assert!(x.scalar().unwrap_err().is_invalid_reference());
}

#[test]
fn shape_changing_overwrite_destroys_descendants() {
    let session = session_with(value(r#"{"x": {"a": 1, "b": {"c": 2}}}"#));
    let root = session.root().as_map().unwrap();
    let x = root.get("x").unwrap();
    let a = x.as_map().unwrap().get("a").unwrap();
    let c = x
        .as_map()
        .unwrap()
        .get("b")
        .unwrap()
        .as_map()
        .unwrap()
        .get("c")
        .unwrap();

    // Overwrite the map with a primitive at the same address.
    x.set(5i64).unwrap();

    assert_eq!(x.materialize().unwrap(), Value::Int(5));
    assert!(a.materialize().unwrap_err().is_invalid_reference());
    assert!(c.materialize().unwrap_err().is_invalid_reference());

    // The address is reusable for a structurally different node.
    x.set(value(r#"[1, 2]"#)).unwrap();
    assert_eq!(
        session.export().unwrap(),
        value(r#"{"x": [1, 2]}"#)
    );
}

#[test]
fn overwrite_leaves_no_orphaned_store_keys() {
    use jotdb::backend::InMemory;
    use jotdb::Session;

    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested.jotdb");
    let flat = dir.path().join("flat.jotdb");

    // Build {"x": <deep map>}, then overwrite x with 1.
    let session = Session::init(
        Box::new(InMemory::bound_to_file(&nested)),
        value(r#"{"x": {"a": [1, 2, 3], "b": {"c": {"d": 4}}}}"#),
    )
    .unwrap();
    session
        .root()
        .as_map()
        .unwrap()
        .set("x", 1i64)
        .unwrap();
    session.close().unwrap();

    // Build {"x": 1} directly.
    Session::init(Box::new(InMemory::bound_to_file(&flat)), value(r#"{"x": 1}"#))
        .unwrap()
        .close()
        .unwrap();

    // Identical logical content, identical key count: nothing was orphaned.
    assert_eq!(
        InMemory::load_from_file(&nested).unwrap().len(),
        InMemory::load_from_file(&flat).unwrap().len()
    );
}

#[test]
fn structural_equality_ignores_map_order_but_not_list_order() {
    let session = session_with(value(r#"{"a": {"k1": 1, "k2": 2}, "b": [1, 2]}"#));
    let root = session.root().as_map().unwrap();

    assert!(
        root.get("a")
            .unwrap()
            .matches(&value(r#"{"k2": 2, "k1": 1}"#))
            .unwrap()
    );
    assert!(!root.get("b").unwrap().matches(&value("[2, 1]")).unwrap());

    let other = session_with(value(r#"{"k2": 2, "k1": 1}"#));
    assert!(
        root.get("a")
            .unwrap()
            .same_content(&other.root())
            .unwrap()
    );
}

#[test]
fn root_reference_can_be_overwritten() {
    let session = session_with(value(r#"{"old": true}"#));
    session.root().set(value("[1, 2]")).unwrap();
    assert_eq!(session.export().unwrap(), value("[1, 2]"));
}
