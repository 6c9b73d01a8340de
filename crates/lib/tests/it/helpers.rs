use jotdb::{Session, Value, backend::InMemory};

/// Opens a fresh read-write session over an empty in-memory store.
pub fn test_session() -> Session {
    Session::open(Box::new(InMemory::new())).expect("Failed to open session")
}

/// Opens a session initialized with the given root value.
pub fn session_with(root: impl Into<Value>) -> Session {
    Session::init(Box::new(InMemory::new()), root).expect("Failed to init session")
}

/// Parses a JSON literal into a [`Value`], preserving object key order.
pub fn value(json: &str) -> Value {
    Value::from_json(&serde_json::from_str(json).expect("Invalid test JSON"))
}

/// A nested document exercising every node shape, mirroring the kind of
/// data the store is built for.
pub fn sample_document() -> Value {
    value(
        r#"{
            "int": 4,
            "map": {"a": 4, "list": [1, 2, 3]},
            "list": [1, 6, 5],
            "7": 7,
            "null": null,
            "bool": true,
            "bool2": false,
            "pi": 3.5
        }"#,
    )
}
