use chrono::NaiveDate;
use tutor_progress::progress::store::{hydrate, load_snapshot, persist, save_snapshot};
use tutor_progress::{shutdown_in, start_in, AppState, Difficulty, EngineConfig};

#[tokio::test]
async fn test_persist_and_hydrate_restore_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("progress.json");

    let state = AppState::default();
    for _ in 0..3 {
        state.engine.record_answer("s1", "Physics", true, 10, Difficulty::Medium);
    }
    state.engine.record_answer("s2", "Biology", false, 40, Difficulty::Hard);
    let challenge = state
        .engine
        .generate_daily_challenge("s1", "Physics", NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    state.engine.complete_daily_challenge("s1", &challenge.id);

    persist(&state, &path).await.unwrap();

    let restored = hydrate(AppState::new(EngineConfig::default()), &path).await.unwrap();
    assert_eq!(restored.engine.student_count(), 2);
    assert_eq!(restored.engine.get_stats("s1"), state.engine.get_stats("s1"));
    assert_eq!(restored.engine.get_stats("s1").total_points, 222);
    assert_eq!(restored.engine.get_stats("s2"), state.engine.get_stats("s2"));

    // the restored engine keeps working
    restored.engine.record_answer("s1", "Physics", true, 10, Difficulty::Medium);
    assert_eq!(restored.engine.get_stats("s1").current_streak, 4);
    assert_eq!(restored.metrics.snapshot().answers_recorded, 1);
}

#[tokio::test]
async fn test_missing_snapshot_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    assert!(load_snapshot(&path).await.unwrap().is_none());

    let state = hydrate(AppState::default(), &path).await.unwrap();
    assert_eq!(state.engine.student_count(), 0);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let err = load_snapshot(&path).await.unwrap_err();
    assert_eq!(err.stage, "json_parse");
    assert!(err.context.unwrap().contains("progress.json"));
}

#[tokio::test]
async fn test_save_snapshot_writes_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    let state = AppState::default();
    state.engine.get_or_create("s1");
    save_snapshot(&path, &state.engine.snapshot()).await.unwrap();

    let text = tokio::fs::read_to_string(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["students"][0]["student_id"], "s1");
    assert_eq!(value["students"][0]["level"], 1);
    assert!(text.contains('\n'));
}

#[tokio::test]
async fn test_start_record_shutdown_start_in_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("progress.toml"), "[scoring]\nmedium_points = 25\n")
        .await
        .unwrap();

    let state = start_in(dir.path()).await.unwrap();
    assert_eq!(state.engine.student_count(), 0);
    assert_eq!(state.config.scoring.medium_points, 25);

    state.engine.record_answer("s1", "Chemistry", true, 12, Difficulty::Medium);
    state.engine.record_answer("s1", "Chemistry", false, 30, Difficulty::Easy);
    state.engine.record_answer("s2", "Physics", true, 8, Difficulty::Hard);
    let before = state.engine.snapshot();
    shutdown_in(&state, dir.path()).await.unwrap();

    assert!(dir.path().join("data").join("progress.json").exists());

    let restarted = start_in(dir.path()).await.unwrap();
    assert_eq!(restarted.engine.student_count(), 2);
    assert_eq!(restarted.engine.snapshot().students, before.students);
    assert_eq!(restarted.engine.get_stats("s1").total_points, 25 + 2);
}
