use chrono::Duration;
use drill_core::model::{Complexity, Exercise, ExerciseOutcome, Operation, RoundId, RoundState};
use drill_core::scoring::RoundStats;
use drill_core::time::fixed_now;
use storage::document::ProgressDocument;
use storage::repository::{ProgressRepository, ProgressStore};
use storage::sqlite::SqliteProgress;

fn outcome(a: u32, correct: bool) -> ExerciseOutcome {
    let exercise = Exercise::new(a, 3, Operation::Add, Complexity::BothSmall).unwrap();
    ExerciseOutcome::new(exercise, 2_000, correct, fixed_now())
}

#[tokio::test]
async fn sqlite_round_trips_the_whole_document() {
    let repo = SqliteProgress::connect("sqlite:file:memdb_doc_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load().await.unwrap().is_none());

    let mut document = ProgressDocument::new();
    document.current_state.exercise_count = 7;
    document.current_state.round_number = 3;
    document.current_state.current_operation = Operation::Subtract;
    document.exercise_history.push(outcome(4, true));
    document.exercise_history.push(outcome(6, false));
    document.streak.record_activity(fixed_now());

    repo.save(&document).await.expect("save");

    let loaded = repo.load().await.expect("load").expect("document present");
    assert_eq!(loaded, document);
}

#[tokio::test]
async fn sqlite_save_replaces_the_previous_document() {
    let repo = SqliteProgress::connect("sqlite:file:memdb_doc_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut document = ProgressDocument::new();
    document.exercise_history.push(outcome(1, true));
    repo.save(&document).await.unwrap();

    document.exercise_history.push(outcome(2, true));
    repo.save(&document).await.unwrap();

    let loaded = repo.load().await.unwrap().unwrap();
    assert_eq!(loaded.exercise_history.len(), 2);
}

#[tokio::test]
async fn sqlite_store_assigns_ids_and_clears() {
    let store = ProgressStore::sqlite("sqlite:file:memdb_store_ops?mode=memory&cache=shared")
        .await
        .expect("connect and migrate");

    let first = store
        .append_round(&RoundStats::default(), fixed_now())
        .await
        .unwrap();
    let second = store
        .append_round(&RoundStats::default(), fixed_now() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(first.round_id, RoundId::new(1));
    assert_eq!(second.round_id, RoundId::new(2));

    let streak = store.update_streak(fixed_now()).await.unwrap();
    assert_eq!(streak.current, 1);

    store.clear_all().await.unwrap();
    assert!(store.round_history().await.unwrap().is_empty());
    assert_eq!(store.load_state().await.unwrap(), RoundState::initial());
    assert_eq!(store.streak().await.unwrap().current, 0);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteProgress::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let document = ProgressDocument::new();
    repo.save(&document).await.expect("save after re-migrate");
}
