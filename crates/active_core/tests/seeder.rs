use active_core::seed::steps::HabitsSeed;
use active_core::{
    count_entities, EntityCounts, EntityKind, RepoError, RepoResult, SeedError, SeedStep, Seeder,
    Store, UserStorage,
};
use rusqlite::Transaction;
use std::sync::{Arc, Mutex};

fn memory_store() -> Arc<Store> {
    Arc::new(Store::open_in_memory().unwrap())
}

/// Records its name into a shared log, plus whether a user was visible.
struct RecordingStep {
    name: &'static str,
    log: Arc<Mutex<Vec<(String, bool)>>>,
}

impl SeedStep for RecordingStep {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        let user_visible = UserStorage::new().get_user(tx).is_some();
        self.log
            .lock()
            .unwrap()
            .push((self.name.to_string(), user_visible));
        Ok(())
    }
}

/// Inserts a day, then fails.
struct FailingStep;

impl SeedStep for FailingStep {
    fn name(&self) -> &str {
        "failing"
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        tx.execute(
            "INSERT INTO days (id, date, created_at) VALUES ('partial', '2026-01-01', 0);",
            [],
        )?;
        Err(RepoError::InvalidData("boom".to_string()))
    }
}

/// Leaves a deferred foreign key violation that only surfaces at commit.
struct CommitBreakingStep;

impl SeedStep for CommitBreakingStep {
    fn name(&self) -> &str {
        "commit_breaking"
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        tx.execute_batch(
            "PRAGMA defer_foreign_keys = ON;
             INSERT INTO habits (id, user_id, name, color, created_at)
             VALUES ('orphan', 'no-such-user', 'Orphan', 'orange', 0);",
        )?;
        Ok(())
    }
}

/// Drops the seeder's savepoint itself, then fails.
struct SavepointReleasingStep;

impl SeedStep for SavepointReleasingStep {
    fn name(&self) -> &str {
        "savepoint_releasing"
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        tx.execute_batch("RELEASE seed_step;")?;
        Err(RepoError::InvalidData("step gave up".to_string()))
    }
}

#[test]
fn seed_on_empty_store_creates_exactly_one_user() {
    let store = memory_store();
    let report = Seeder::new(Arc::clone(&store)).seed();

    assert!(report.committed);
    assert_eq!(report.commit_error, None);
    assert_eq!(report.steps_applied, vec!["user".to_string()]);
    assert_eq!(
        report.counts,
        EntityCounts {
            user: 1,
            ..EntityCounts::default()
        }
    );
    assert_eq!(
        report.counts.to_string(),
        "User: 1, Habit: 0, HabitDay: 0, Notification: 0, Day: 0"
    );
    assert!(report
        .to_string()
        .ends_with("Seed results: User: 1, Habit: 0, HabitDay: 0, Notification: 0, Day: 0"));
}

#[test]
fn seeding_twice_keeps_a_single_user() {
    let store = memory_store();
    let seeder = Seeder::new(Arc::clone(&store));

    let first = seeder.seed();
    let second = seeder.seed();

    assert_eq!(first.counts.user, 1);
    assert_eq!(second.counts.user, 1);
    assert!(second.step_failures.is_empty());
    assert_eq!(
        count_entities(&store.view_context(), EntityKind::User).unwrap(),
        1
    );
}

#[test]
fn extension_steps_run_after_base_step_and_see_uncommitted_user() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let seeder = Seeder::new(memory_store())
        .with_step(RecordingStep {
            name: "first",
            log: Arc::clone(&log),
        })
        .with_step(RecordingStep {
            name: "second",
            log: Arc::clone(&log),
        });

    assert_eq!(seeder.step_names(), vec!["user", "first", "second"]);
    let report = seeder.seed();

    assert_eq!(report.steps_applied, vec!["user", "first", "second"]);
    assert_eq!(
        *log.lock().unwrap(),
        vec![("first".to_string(), true), ("second".to_string(), true)]
    );
}

#[test]
fn failing_step_is_rolled_back_and_later_steps_still_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let seeder = Seeder::new(memory_store())
        .with_step(FailingStep)
        .with_step(RecordingStep {
            name: "after",
            log: Arc::clone(&log),
        });

    let report = seeder.seed();

    assert!(report.committed);
    assert_eq!(report.steps_applied, vec!["user", "after"]);
    assert_eq!(report.step_failures.len(), 1);
    assert_eq!(report.step_failures[0].step, "failing");
    assert!(report.step_failures[0].error.contains("boom"));
    assert_eq!(report.counts.day, 0);
    assert_eq!(report.counts.user, 1);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn commit_failure_is_reported_and_counts_still_computed() {
    let seeder = Seeder::new(memory_store()).with_step(CommitBreakingStep);

    let report = seeder.seed();

    assert!(!report.committed);
    assert!(report.commit_error.is_some());
    assert_eq!(report.steps_applied, vec!["user", "commit_breaking"]);
    assert_eq!(report.counts, EntityCounts::default());
    assert!(report
        .to_string()
        .contains("There was an error when trying to save the seed context:"));
}

#[test]
fn habits_seed_populates_every_reported_entity_once() {
    let store = memory_store();
    let seeder = Seeder::new(Arc::clone(&store)).with_step(HabitsSeed::new(3).with_sequence_days(5));

    let first = seeder.seed();
    assert!(first.step_failures.is_empty(), "{first}");
    assert_eq!(first.counts.user, 1);
    assert_eq!(first.counts.habit, 3);
    assert_eq!(first.counts.habit_day, 15);
    assert_eq!(first.counts.notification, 3);
    assert!(first.counts.day >= 5);

    let second = seeder.seed();
    assert_eq!(second.counts, first.counts);
    assert_eq!(
        count_entities(&store.view_context(), EntityKind::FireTime).unwrap(),
        3
    );
}

#[test]
fn habits_seed_relies_on_user_inserted_by_base_step() {
    let seeder = Seeder::new(memory_store()).with_step(HabitsSeed::new(1));

    let report = seeder.seed();

    assert!(report.step_failures.is_empty(), "{report}");
    assert_eq!(report.steps_applied, vec!["user", "habits"]);
    assert_eq!(report.counts.user, 1);
    assert_eq!(report.counts.habit, 1);
}

#[test]
fn erase_after_seed_leaves_no_days_and_no_user() {
    let store = memory_store();
    let seeder = Seeder::new(Arc::clone(&store)).with_step(HabitsSeed::new(2).with_sequence_days(4));
    let seeded = seeder.seed();
    assert!(seeded.counts.day > 0);

    let summary = seeder.erase().unwrap();
    assert_eq!(summary.days_deleted as u64, seeded.counts.day);
    assert!(summary.user_deleted);

    let counts = seeder.entity_counts();
    assert_eq!(counts, EntityCounts::default());
}

#[test]
fn erase_on_empty_store_is_a_no_op() {
    let seeder = Seeder::new(memory_store());
    let summary = seeder.erase().unwrap();
    assert_eq!(summary.days_deleted, 0);
    assert!(!summary.user_deleted);
}

#[test]
fn erase_failure_is_returned_as_error() {
    let store = memory_store();
    let seeder = Seeder::new(Arc::clone(&store));
    seeder.seed();
    store
        .view_context()
        .execute_batch(
            "CREATE TRIGGER block_user_delete BEFORE DELETE ON users
             BEGIN SELECT RAISE(ABORT, 'user delete blocked'); END;",
        )
        .unwrap();

    let err = seeder.erase().unwrap_err();
    assert!(matches!(err, SeedError::EraseFailed(_)));
    assert!(err.to_string().contains("user delete blocked"));
    assert_eq!(seeder.entity_counts().user, 1);
}

#[test]
fn seed_in_background_reports_through_join_handle() {
    let seeder = Arc::new(Seeder::new(memory_store()));

    let report = seeder.seed_in_background().join().unwrap();

    assert!(report.committed);
    assert_eq!(report.counts.user, 1);
    assert_eq!(seeder.entity_counts().user, 1);
}

#[test]
fn file_store_seeds_through_separate_background_connection() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("active.sqlite3")).unwrap());
    let seeder = Seeder::new(Arc::clone(&store)).with_step(HabitsSeed::new(1).with_sequence_days(3));

    let report = seeder.seed();

    assert!(report.committed);
    assert_eq!(report.counts.habit_day, 3);
    drop(seeder);
    drop(store);

    let reopened = Store::open(dir.path().join("active.sqlite3")).unwrap();
    assert_eq!(
        count_entities(&reopened.view_context(), EntityKind::Habit).unwrap(),
        1
    );
}

#[test]
fn step_error_is_kept_when_savepoint_rollback_fails() {
    let seeder = Seeder::new(memory_store()).with_step(SavepointReleasingStep);

    let report = seeder.seed();

    assert_eq!(report.step_failures.len(), 1);
    assert_eq!(report.step_failures[0].step, "savepoint_releasing");
    assert!(
        report.step_failures[0].error.contains("step gave up"),
        "{}",
        report.step_failures[0].error
    );
    assert!(report.committed);
    assert_eq!(report.counts.user, 1);
}
