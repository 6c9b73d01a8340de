//! List view tests: end operations, value scans, cell handles.

use jotdb::Value;

use crate::helpers::*;

#[test]
fn append_preserves_order() {
    let session = session_with(Value::empty_list());
    let list = session.root().as_list().unwrap();

    list.append(1i64).unwrap();
    list.append("hello").unwrap();
    list.append(value("[1, 2, 3]")).unwrap();

    assert_eq!(
        session.export().unwrap(),
        value(r#"[1, "hello", [1, 2, 3]]"#)
    );
}

#[test]
fn prepend_builds_in_reverse() {
    let session = session_with(value(r#"[1, "hello", [1, 2, 3]]"#));
    let list = session.root().as_list().unwrap();

    list.prepend(5i64).unwrap();
    list.prepend("this").unwrap();
    list.prepend(value(r#"{"foo": "bar"}"#)).unwrap();

    assert_eq!(
        session.export().unwrap(),
        value(r#"[{"foo": "bar"}, "this", 5, 1, "hello", [1, 2, 3]]"#)
    );
}

#[test]
fn pop_removes_from_the_tail() {
    let session = session_with(value("[1, 2, 3]"));
    let list = session.root().as_list().unwrap();

    assert_eq!(list.pop().unwrap(), Value::Int(3));
    assert_eq!(list.pop().unwrap(), Value::Int(2));
    assert_eq!(list.len().unwrap(), 1);
    assert_eq!(list.pop().unwrap(), Value::Int(1));

    let err = list.pop().unwrap_err();
    assert!(err.is_empty_container());
    assert!(list.is_empty().unwrap());
}

#[test]
fn contains_compares_structurally() {
    let session = session_with(value(r#"[1, "hello", [1, 2, 3]]"#));
    let list = session.root().as_list().unwrap();

    assert!(list.contains(&Value::Int(1)).unwrap());
    assert!(list.contains(&Value::Text("hello".to_string())).unwrap());
    assert!(list.contains(&value("[1, 2, 3]")).unwrap());
    assert!(!list.contains(&Value::Int(2)).unwrap());
    assert!(!list.contains(&value("[4, 5, 6]")).unwrap());
}

#[test]
fn remove_deletes_matching_values() {
    let session = session_with(value(r#"[1, "hello", [1, 2, 3]]"#));
    let list = session.root().as_list().unwrap();

    assert_eq!(list.remove(&Value::Text("hello".to_string())).unwrap(), 1);
    assert_eq!(session.export().unwrap(), value("[1, [1, 2, 3]]"));

    list.append(2i64).unwrap();
    assert_eq!(list.remove(&Value::Int(2)).unwrap(), 1);
    assert_eq!(list.remove(&Value::Int(1)).unwrap(), 1);
    assert_eq!(session.export().unwrap(), value("[[1, 2, 3]]"));

    // No match removes nothing and reports zero.
    assert_eq!(list.remove(&Value::Int(99)).unwrap(), 0);
}

#[test]
fn remove_deletes_every_duplicate() {
    let session = session_with(value("[7, 1, 7, 2, 7]"));
    let list = session.root().as_list().unwrap();

    assert_eq!(list.remove(&Value::Int(7)).unwrap(), 3);
    assert_eq!(session.export().unwrap(), value("[1, 2]"));
}

#[test]
fn cells_read_update_and_remove_in_place() {
    let session = session_with(value(r#"[1, "hello", [1, 2, 3]]"#));
    let list = session.root().as_list().unwrap();

    let values: Vec<Value> = list
        .cells()
        .unwrap()
        .map(|cell| cell.value().unwrap())
        .collect();
    assert_eq!(values, [Value::Int(1), "hello".into(), value("[1, 2, 3]")]);

    for (i, cell) in list.cells().unwrap().enumerate() {
        if i == 1 {
            cell.put("world").unwrap();
        }
    }
    assert_eq!(
        session.export().unwrap(),
        value(r#"[1, "world", [1, 2, 3]]"#)
    );

    for (i, cell) in list.cells().unwrap().enumerate() {
        if i == 1 {
            cell.remove().unwrap();
        }
    }
    assert_eq!(session.export().unwrap(), value("[1, [1, 2, 3]]"));
}

#[test]
fn cell_outlives_unrelated_mutations_but_not_its_entry() {
    let session = session_with(value("[1, 2]"));
    let list = session.root().as_list().unwrap();

    let cells: Vec<_> = list.cells().unwrap().collect();
    list.append(3i64).unwrap();

    // Unrelated append leaves existing cells usable.
    assert_eq!(cells[0].value().unwrap(), Value::Int(1));

    // Removing the entry kills its cell.
    let head = cells[0].clone();
    head.remove().unwrap();
    assert!(cells[0].value().unwrap_err().is_invalid_reference());
    assert!(
        cells[0]
            .clone()
            .remove()
            .unwrap_err()
            .is_invalid_reference()
    );

    // The rest of the list is untouched.
    assert_eq!(session.export().unwrap(), value("[2, 3]"));
}

#[test]
fn generated_keys_never_collide_into_overwrites() {
    let session = session_with(Value::empty_list());
    let list = session.root().as_list().unwrap();

    const N: i64 = 500;
    for i in 0..N {
        list.append(i).unwrap();
    }

    assert_eq!(list.len().unwrap(), N as u64);
    let expected = Value::List((0..N).map(Value::Int).collect());
    assert_eq!(session.export().unwrap(), expected);
}

#[test]
fn clear_empties_the_list() {
    let session = session_with(value(r#"[1, "hello", [1, 2, 3]]"#));
    let list = session.root().as_list().unwrap();

    list.clear().unwrap();
    assert!(list.is_empty().unwrap());
    assert_eq!(session.export().unwrap(), Value::empty_list());
}

#[test]
fn iter_yields_references_in_chain_order() {
    let session = session_with(value(r#"[10, {"a": 1}, 30]"#));
    let list = session.root().as_list().unwrap();

    let items: Vec<Value> = list
        .iter()
        .unwrap()
        .map(|item| item.unwrap().materialize().unwrap())
        .collect();
    assert_eq!(items, [Value::Int(10), value(r#"{"a": 1}"#), Value::Int(30)]);
}
