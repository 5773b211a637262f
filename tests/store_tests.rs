use std::fs;

use blockfall::store::{HighScores, ScoreEntry, ScoreStore, StoreError};
use blockfall::types::{Difficulty, MAX_HIGH_SCORES};

fn store_in(dir: &tempfile::TempDir) -> ScoreStore {
    ScoreStore::new(dir.path().join("scores").join("high-scores.json"))
}

#[test]
fn saved_file_has_one_list_per_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.record(Difficulty::Hard, ScoreEntry::new(900, 3, 14)).unwrap(), Some(0));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert!(raw["easy"].as_array().unwrap().is_empty());
    assert!(raw["medium"].as_array().unwrap().is_empty());

    let hard = &raw["hard"][0];
    assert_eq!(hard["score"], 900);
    assert_eq!(hard["level"], 3);
    assert_eq!(hard["lines"], 14);
    assert!(hard["timestamp"].is_string());

    // The temporary file never outlives a save.
    assert!(!store.path().with_extension("json.tmp").exists());
}

#[test]
fn reads_files_that_use_date_field_and_unsorted_lists() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(
        store.path(),
        r#"{
            "easy": [
                {"score": 100, "level": 1, "lines": 2, "date": "2024-03-01T10:00:00Z"},
                {"score": 700, "level": 2, "lines": 11, "date": "2024-03-02T10:00:00Z"}
            ]
        }"#,
    )
    .unwrap();

    let scores = store.load().unwrap();
    let easy: Vec<u32> = scores.top(Difficulty::Easy).iter().map(|e| e.score).collect();
    assert_eq!(easy, vec![700, 100]);
    assert!(scores.top(Difficulty::Medium).is_empty());
    assert_eq!(scores.best(Difficulty::Easy), Some(700));
}

#[test]
fn record_ranks_and_caps_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    for score in (1..=MAX_HIGH_SCORES as u32).map(|n| n * 100) {
        assert!(store.record(Difficulty::Medium, ScoreEntry::new(score, 1, 0)).unwrap().is_some());
    }

    // Too low to make the list: nothing changes on disk.
    let before = fs::read_to_string(store.path()).unwrap();
    assert_eq!(store.record(Difficulty::Medium, ScoreEntry::new(50, 1, 0)).unwrap(), None);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);

    assert_eq!(store.record(Difficulty::Medium, ScoreEntry::new(550, 2, 5)).unwrap(), Some(5));
    let scores = store.load().unwrap();
    let medium = scores.top(Difficulty::Medium);
    assert_eq!(medium.len(), MAX_HIGH_SCORES);
    assert_eq!(medium.first().map(|e| e.score), Some(1000));
    assert_eq!(medium.last().map(|e| e.score), Some(200));
    assert!(!scores.qualifies(Difficulty::Medium, 200));
    assert!(scores.qualifies(Difficulty::Medium, 201));
    assert!(scores.qualifies(Difficulty::Easy, 0));
}

#[test]
fn clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.clear().unwrap();

    store.record(Difficulty::Easy, ScoreEntry::new(10, 1, 0)).unwrap();
    assert!(store.path().exists());
    store.clear().unwrap();
    assert!(!store.path().exists());
    assert_eq!(store.load().unwrap(), HighScores::default());
}

#[test]
fn malformed_file_is_reported_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "not json").unwrap();

    assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    assert!(store.record(Difficulty::Easy, ScoreEntry::new(10, 1, 0)).is_err());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json");
}
