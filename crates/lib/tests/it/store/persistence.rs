use positionable::{Engine, InMemoryStore, RecordId, ScopeKey, TargetHint};

#[test]
fn test_saved_store_resumes_ordering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    let scope = ScopeKey::from("board");

    let store = InMemoryStore::default();
    for id in ["todo", "doing", "done"] {
        store
            .insert(&scope, &RecordId::from(id), &TargetHint::Tail)
            .unwrap();
    }
    store.save_to_file(&path).unwrap();

    let loaded = InMemoryStore::load_from_file(&path, Engine::default()).unwrap();
    let version = loaded.snapshot(&scope).version;
    loaded
        .insert(&scope, &RecordId::from("review"), &TargetHint::before("done"))
        .unwrap();

    let current = loaded.snapshot(&scope);
    assert!(current.version > version);
    let order: Vec<&str> = current.snapshot.ids().map(|id| id.as_str()).collect();
    assert_eq!(order, vec!["todo", "doing", "review", "done"]);
}

#[test]
fn test_corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    std::fs::write(&path, "not json").unwrap();

    let err = InMemoryStore::load_from_file(&path, Engine::default()).unwrap_err();
    assert_eq!(err.module(), "serialize");
}
