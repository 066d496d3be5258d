//! Seed orchestration over a shared [`Store`].
//!
//! # Invariants
//! - `seed` works on a background connection, `erase` and counts on the
//!   store's view connection.
//! - Steps run in registration order inside one immediate transaction; each
//!   step is wrapped in a savepoint so a failing step leaves no partial rows.
//! - Counting never fails: an unreadable table counts as zero.

use super::steps::UserSeed;
use super::{SeedError, SeedResult, SeedStep};
use crate::db::{DbResult, Store};
use crate::model::entity::EntityKind;
use crate::repo::day_repo::{DayRepository, SqliteDayRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{count_entities, RepoResult};
use crate::service::user_storage::UserStorage;
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

const STEP_SAVEPOINT: &str = "seed_step";

/// Row counts of the entity types listed in seed reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub user: u64,
    pub habit: u64,
    pub habit_day: u64,
    pub notification: u64,
    pub day: u64,
}

impl EntityCounts {
    pub fn get(&self, kind: EntityKind) -> Option<u64> {
        match kind {
            EntityKind::User => Some(self.user),
            EntityKind::Habit => Some(self.habit),
            EntityKind::HabitDay => Some(self.habit_day),
            EntityKind::Notification => Some(self.notification),
            EntityKind::Day => Some(self.day),
            EntityKind::DaysSequence | EntityKind::FireTime => None,
        }
    }

    fn set(&mut self, kind: EntityKind, count: u64) {
        match kind {
            EntityKind::User => self.user = count,
            EntityKind::Habit => self.habit = count,
            EntityKind::HabitDay => self.habit_day = count,
            EntityKind::Notification => self.notification = count,
            EntityKind::Day => self.day = count,
            EntityKind::DaysSequence | EntityKind::FireTime => {}
        }
    }
}

impl Display for EntityCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for kind in EntityKind::REPORTED {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}: {}", kind.label(), self.get(kind).unwrap_or_default())?;
        }
        Ok(())
    }
}

/// A seed step that returned an error; its writes were rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: String,
    pub error: String,
}

/// Outcome of one seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Steps that applied successfully, in execution order.
    pub steps_applied: Vec<String>,
    pub step_failures: Vec<StepFailure>,
    pub committed: bool,
    /// Why nothing was committed, when `committed` is false.
    pub commit_error: Option<String>,
    /// Counts read after the commit attempt.
    pub counts: EntityCounts,
}

impl Display for SeedReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Seed steps applied: {}", self.steps_applied.join(", "))?;
        for failure in &self.step_failures {
            writeln!(f, "Seed step `{}` failed: {}", failure.step, failure.error)?;
        }
        if let Some(commit_error) = &self.commit_error {
            writeln!(f, "There was an error when trying to save the seed context:")?;
            writeln!(f, "{commit_error}")?;
        }
        write!(f, "Seed results: {}", self.counts)
    }
}

/// What `erase` removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EraseSummary {
    pub days_deleted: usize,
    pub user_deleted: bool,
}

/// Seeds synthetic entities into the store and erases them again.
///
/// The base [`UserSeed`] step always runs first; extension steps follow in
/// the order they were registered.
pub struct Seeder {
    store: Arc<Store>,
    base_steps: Vec<Box<dyn SeedStep>>,
    extension_steps: Vec<Box<dyn SeedStep>>,
}

impl Seeder {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            base_steps: vec![Box::new(UserSeed)],
            extension_steps: Vec::new(),
        }
    }

    /// Appends an extension step.
    pub fn with_step(mut self, step: impl SeedStep + 'static) -> Self {
        self.register_step(Box::new(step));
        self
    }

    pub fn register_step(&mut self, step: Box<dyn SeedStep>) {
        self.extension_steps.push(step);
    }

    /// Names of every step in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps().map(|step| step.name()).collect()
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    fn steps(&self) -> impl Iterator<Item = &dyn SeedStep> + '_ {
        self.base_steps
            .iter()
            .chain(self.extension_steps.iter())
            .map(|step| step.as_ref())
    }

    /// Runs every step on a fresh background connection and commits once.
    ///
    /// Blocks the calling thread; see [`Seeder::seed_in_background`] for the
    /// fire-and-forget variant. Failures are reported, never returned.
    pub fn seed(&self) -> SeedReport {
        self.seed_with_context(self.store.new_background_context())
    }

    /// Dispatches [`Seeder::seed`] onto the store's background-task facility.
    ///
    /// Joining the handle is the only completion signal.
    pub fn seed_in_background(self: &Arc<Self>) -> JoinHandle<SeedReport> {
        let seeder = Arc::clone(self);
        self.store
            .perform_background_task(move |context| seeder.seed_with_context(context))
    }

    fn seed_with_context(&self, context: DbResult<Connection>) -> SeedReport {
        let started_at = Instant::now();
        info!(
            "event=seed_start module=seed status=start steps={}",
            self.step_names().join(",")
        );

        let mut report = SeedReport::default();
        match context {
            Ok(mut conn) => self.apply_steps(&mut conn, &mut report),
            Err(err) => {
                let err = SeedError::ContextUnavailable(err);
                error!(
                    "event=seed_commit module=seed status=error error_code=context_unavailable error={}",
                    err
                );
                report.commit_error = Some(err.to_string());
            }
        }

        report.counts = self.entity_counts();
        info!(
            "event=seed_counts module=seed status=ok counts=\"{}\"",
            report.counts
        );
        info!(
            "event=seed_finish module=seed status={} duration_ms={} failed_steps={}",
            if report.committed { "ok" } else { "error" },
            started_at.elapsed().as_millis(),
            report.step_failures.len()
        );
        report
    }

    fn apply_steps(&self, conn: &mut Connection, report: &mut SeedReport) {
        let tx = match conn.transaction_with_behavior(TransactionBehavior::Immediate) {
            Ok(tx) => tx,
            Err(err) => {
                error!(
                    "event=seed_commit module=seed status=error error_code=begin_failed error={}",
                    err
                );
                report.commit_error = Some(err.to_string());
                return;
            }
        };

        for step in self.steps() {
            match apply_in_savepoint(&tx, step) {
                Ok(()) => {
                    info!(
                        "event=seed_step module=seed step={} status=ok",
                        step.name()
                    );
                    report.steps_applied.push(step.name().to_string());
                }
                Err(err) => {
                    warn!(
                        "event=seed_step module=seed step={} status=error error_code=step_failed error={}",
                        step.name(),
                        err
                    );
                    report.step_failures.push(StepFailure {
                        step: step.name().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }

        match tx.commit() {
            Ok(()) => {
                info!("event=seed_commit module=seed status=ok");
                report.committed = true;
            }
            Err(err) => {
                error!(
                    "event=seed_commit module=seed status=error error_code=commit_failed error={}",
                    err
                );
                report.commit_error = Some(err.to_string());
            }
        }
    }

    /// Deletes every calendar day and the install's user through the view
    /// connection, in one transaction.
    ///
    /// Deleting the user cascades to habits, sequences, tracked days and
    /// notifications. Any failure rolls the whole erase back and is returned
    /// as [`SeedError::EraseFailed`].
    pub fn erase(&self) -> SeedResult<EraseSummary> {
        let started_at = Instant::now();
        info!("event=erase module=seed status=start");

        let mut conn = self.store.view_context();
        match erase_seeded(&mut conn) {
            Ok(summary) => {
                info!(
                    "event=erase module=seed status=ok duration_ms={} days_deleted={} user_deleted={}",
                    started_at.elapsed().as_millis(),
                    summary.days_deleted,
                    summary.user_deleted
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=erase module=seed status=error duration_ms={} error_code=erase_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(SeedError::EraseFailed(err))
            }
        }
    }

    /// Counts reported entity types on the view connection.
    pub fn entity_counts(&self) -> EntityCounts {
        let conn = self.store.view_context();
        let mut counts = EntityCounts::default();
        for kind in EntityKind::REPORTED {
            let count = count_entities(&conn, kind).unwrap_or_else(|err| {
                warn!(
                    "event=entity_count module=seed status=degraded entity={} error={}",
                    kind, err
                );
                0
            });
            counts.set(kind, count);
        }
        counts
    }
}

fn apply_in_savepoint(tx: &Transaction<'_>, step: &dyn SeedStep) -> RepoResult<()> {
    tx.execute_batch(&format!("SAVEPOINT {STEP_SAVEPOINT};"))?;
    match step.apply(tx) {
        Ok(()) => {
            tx.execute_batch(&format!("RELEASE {STEP_SAVEPOINT};"))?;
            Ok(())
        }
        Err(err) => {
            if let Err(rollback_err) = tx.execute_batch(&format!(
                "ROLLBACK TO {STEP_SAVEPOINT}; RELEASE {STEP_SAVEPOINT};"
            )) {
                error!(
                    "event=seed_step module=seed step={} status=error error_code=rollback_failed error={}",
                    step.name(),
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

fn erase_seeded(conn: &mut Connection) -> RepoResult<EraseSummary> {
    let tx = conn.transaction()?;

    let day_repo = SqliteDayRepository::new(&tx);
    let days = day_repo.list_days().unwrap_or_else(|err| {
        warn!(
            "event=erase module=seed status=degraded error_code=day_fetch_failed error={}",
            err
        );
        Vec::new()
    });
    for day in &days {
        day_repo.delete_day(day.id)?;
    }

    let user = UserStorage::new().get_user(&tx);
    if let Some(user) = &user {
        SqliteUserRepository::new(&tx).delete_user(user.id)?;
    }

    tx.commit()?;
    Ok(EraseSummary {
        days_deleted: days.len(),
        user_deleted: user.is_some(),
    })
}
