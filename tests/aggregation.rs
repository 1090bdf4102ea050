// tests/aggregation.rs
// Superscore batches plus journal/goal persistence through the ScoreStore
// capability, using the in-process MemoryStore.

use sat_score_estimator::goal::{self, GoalState};
use sat_score_estimator::history::ScoreJournal;
use sat_score_estimator::storage::{MemoryStore, ScoreStore, GOAL_KEY};
use sat_score_estimator::superscore::{superscore, Attempt};

fn attempt(label: &str, rw: u32, math: u32) -> Attempt {
    Attempt {
        label: label.to_string(),
        rw,
        math,
    }
}

#[test]
fn superscore_spans_attempt_batches() {
    let attempts = vec![
        attempt("Oct", 600, 550),
        attempt("Dec", 640, 530),
        attempt("Mar", 610, 600),
    ];
    let s = superscore(&attempts).expect("three attempts");

    assert_eq!(s.best_rw, 640);
    assert_eq!(s.best_math, 600);
    assert_eq!(s.super_total, 1240);
    assert_eq!(s.best_single_sitting_total, 1210);
    assert_eq!(s.improvement, 30);
}

#[tokio::test]
async fn journal_round_trips_through_the_store() {
    let store = MemoryStore::new();
    let journal = ScoreJournal::with_capacity(10);
    journal.add(1190, 620, 570, Some("PT 3".to_string()));
    journal.add(1230, 640, 590, None);
    journal.add(1280, 660, 620, None);

    journal.save_to(&store).await.expect("save journal");

    let restored = ScoreJournal::with_capacity(10);
    let n = restored.load_from(&store).await.expect("load journal");
    assert_eq!(n, 3);
    assert_eq!(
        restored.snapshot_last_n(10),
        journal.snapshot_last_n(10),
        "restored entries should match, ids included"
    );
}

#[tokio::test]
async fn journal_restore_replaces_existing_entries() {
    let store = MemoryStore::new();
    let journal = ScoreJournal::with_capacity(10);
    journal.add(1000, 500, 500, None);
    journal.save_to(&store).await.expect("save");

    let other = ScoreJournal::with_capacity(10);
    other.add(1600, 800, 800, None);
    other.add(1590, 800, 790, None);
    let n = other.load_from(&store).await.expect("load");

    assert_eq!(n, 1);
    assert_eq!(other.len(), 1);
    assert_eq!(other.snapshot_last_n(1)[0].total, 1000);
}

#[tokio::test]
async fn journal_restore_without_snapshot_is_a_noop() {
    let store = MemoryStore::new();
    let journal = ScoreJournal::with_capacity(10);
    journal.add(1100, 550, 550, None);

    let n = journal.load_from(&store).await.expect("empty store");
    assert_eq!(n, 0);
    assert_eq!(journal.len(), 1, "nothing stored, nothing replaced");
}

#[tokio::test]
async fn goal_round_trips_and_clears() {
    let store = MemoryStore::new();
    assert_eq!(goal::load_goal(&store).await.expect("empty"), None);

    let g = GoalState::new(1400, Some("UCLA".to_string()));
    goal::save_goal(&store, &g).await.expect("save goal");
    assert_eq!(goal::load_goal(&store).await.expect("load"), Some(g));

    goal::clear_goal(&store).await.expect("clear");
    assert_eq!(goal::load_goal(&store).await.expect("after clear"), None);
}

#[tokio::test]
async fn corrupt_goal_state_reads_as_no_goal() {
    let store = MemoryStore::new();
    store
        .set(GOAL_KEY, "{ not json")
        .await
        .expect("seed corrupt value");

    assert_eq!(goal::load_goal(&store).await.expect("tolerant load"), None);
}
