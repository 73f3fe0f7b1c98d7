//! Saving and loading value tables on disk.

mod common;

use std::fs;

use common::play;
use tempfile::TempDir;
use tictactoe_rl::{
    Error,
    solver::ExactSolver,
    tictactoe::D4Transform,
    values::{
        Averaging, ValueStore, load, load_or_empty, save,
        serialization::{load_json, save_json},
    },
};

#[test]
fn solved_table_survives_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("optimal.json");
    let solution = ExactSolver::default().solve();
    let store = solution.store();

    save(&store, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.len(), 765);
    assert_eq!(loaded, store);
    for (state, value) in solution.iter() {
        assert_eq!(loaded.peek(state), Some(value));
    }
}

#[test]
fn json_is_a_flat_label_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    let mut store = ValueStore::deterministic(0.0);
    store.set(&play(&[5]), 0.25);

    save_json(&store, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get(".../.X./..."), Some(&serde_json::json!(0.25)));
}

#[test]
fn loaded_values_answer_symmetric_lookups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corner.json");
    let corner = play(&[7, 5]);
    let mut store = ValueStore::deterministic(0.0);
    store.set(&corner, -0.3);

    save(&store, &path).unwrap();
    let loaded = load_json(&path).unwrap();

    for transform in D4Transform::all() {
        assert_eq!(loaded.peek(&corner.transform(&transform)), Some(-0.3));
    }
    assert_eq!(loaded.peek(&play(&[8, 5])), None);
}

#[test]
fn msgpack_keeps_visit_counts_and_averaging() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mc.msgpack");
    let state = play(&[1, 5, 9]);
    let mut store = ValueStore::learning()
        .with_seed(1)
        .with_averaging(Averaging::SampleMean);
    let entry = store.entry_mut(&state);
    entry.value = 0.4;
    entry.visits = 7;

    save(&store, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.averaging(), Averaging::SampleMean);
    assert_eq!(loaded.initializer(), store.initializer());
    let reloaded = loaded.entry(&state).unwrap();
    assert_eq!(reloaded.value, 0.4);
    assert_eq!(reloaded.visits, 7);
}

#[test]
fn missing_file_falls_back_to_an_empty_table() {
    let dir = TempDir::new().unwrap();
    let store = load_or_empty(dir.path().join("absent.json")).unwrap();
    assert!(store.is_empty());

    let err = load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn malformed_files_are_errors() {
    let dir = TempDir::new().unwrap();

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "not json").unwrap();
    assert!(load_or_empty(&garbage).is_err());

    let bad_label = dir.path().join("bad_label.json");
    fs::write(&bad_label, r#"{"XXQ/.../...": 0.5}"#).unwrap();
    assert!(load(&bad_label).is_err());
}
