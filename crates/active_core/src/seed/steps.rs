//! Built-in seed steps.

use super::factory::{
    DaysSequenceFactory, DummyFactory, FireTimeFactory, HabitFactory, NotificationFactory,
    UserFactory,
};
use super::SeedStep;
use crate::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Transaction;

/// Base step: makes sure the install's user exists.
///
/// Always registered first by [`super::Seeder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSeed;

impl SeedStep for UserSeed {
    fn name(&self) -> &str {
        "user"
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        info!("event=seed_step module=seed step=user status=start");

        let existing = SqliteUserRepository::new(tx)
            .list_users()
            .unwrap_or_else(|err| {
                warn!(
                    "event=seed_step module=seed step=user status=degraded error_code=user_fetch_failed error={}",
                    err
                );
                Vec::new()
            });
        if !existing.is_empty() {
            info!("event=seed_step module=seed step=user status=skipped reason=user_exists");
            return Ok(());
        }

        let user = UserFactory::new(tx).make_dummy()?;
        info!(
            "event=seed_step module=seed step=user status=inserted user_id={}",
            user.id
        );
        Ok(())
    }
}

/// Extension step: tops the user's habits up to `habits`, each with a days
/// sequence, a fire time and a pending notification.
///
/// Requires the user inserted by [`UserSeed`]; habits already present count
/// toward the target, so re-running it inserts nothing.
#[derive(Debug, Clone, Copy)]
pub struct HabitsSeed {
    habits: usize,
    sequence_days: u32,
}

impl HabitsSeed {
    pub fn new(habits: usize) -> Self {
        Self {
            habits,
            sequence_days: super::factory::DEFAULT_SEQUENCE_DAYS,
        }
    }

    pub fn with_sequence_days(mut self, sequence_days: u32) -> Self {
        self.sequence_days = sequence_days;
        self
    }
}

impl SeedStep for HabitsSeed {
    fn name(&self) -> &str {
        "habits"
    }

    fn apply(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        info!(
            "event=seed_step module=seed step=habits status=start target={}",
            self.habits
        );

        let user = SqliteUserRepository::new(tx)
            .current_user()?
            .ok_or_else(|| RepoError::InvalidData("habits seed requires a user".to_string()))?;
        let existing = SqliteHabitRepository::new(tx).list_habits(user.id)?.len();
        if existing >= self.habits {
            info!(
                "event=seed_step module=seed step=habits status=skipped reason=target_reached existing={}",
                existing
            );
            return Ok(());
        }

        for _ in existing..self.habits {
            let habit = HabitFactory::new(tx, user.id).make_dummy()?;
            DaysSequenceFactory::new(tx, habit.id)
                .days(self.sequence_days)
                .make_dummy()?;
            FireTimeFactory::new(tx).for_habit(habit.id).make_dummy()?;
            NotificationFactory::new(tx, habit.id).make_dummy()?;
        }

        info!(
            "event=seed_step module=seed step=habits status=inserted count={}",
            self.habits - existing
        );
        Ok(())
    }
}
