//! Dummy record factories.
//!
//! Each factory is bound to a connection or an open transaction, inserts the
//! record it makes through the entity repository and never commits. Values
//! are random and only meant for seed and test data.

use crate::model::day::Day;
use crate::model::days_sequence::DaysSequence;
use crate::model::entity::EntityKind;
use crate::model::fire_time::FireTime;
use crate::model::habit::{Habit, HabitColor, HabitId};
use crate::model::habit_day::HabitDay;
use crate::model::notification::Notification;
use crate::model::user::{User, UserId};
use crate::model::now_epoch_ms;
use crate::repo::day_repo::{DayRepository, SqliteDayRepository};
use crate::repo::fire_time_repo::{FireTimeRepository, SqliteFireTimeRepository};
use crate::repo::habit_repo::{habit_exists, HabitRepository, SqliteHabitRepository};
use crate::repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
use crate::repo::sequence_repo::{DaysSequenceRepository, SqliteDaysSequenceRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use rusqlite::Connection;
use uuid::Uuid;

/// Exclusive upper bound for generated hours.
pub const DUMMY_HOUR_BOUND: u8 = 24;
/// Exclusive upper bound for generated minutes: minute 59 is never produced.
pub const DUMMY_MINUTE_BOUND: u8 = 59;

pub const DEFAULT_SEQUENCE_DAYS: u32 = 14;

const DUMMY_HABIT_NAMES: &[&str] = &[
    "Read a book",
    "Go for a run",
    "Meditate",
    "Drink water",
    "Practice guitar",
    "Write a journal entry",
    "Study a language",
    "Stretch",
];

const MAX_NOTIFICATION_OFFSET_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Makes one persisted dummy of `Entity`.
pub trait DummyFactory {
    type Entity;

    fn make_dummy(&self) -> RepoResult<Self::Entity>;
}

pub struct UserFactory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> UserFactory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DummyFactory for UserFactory<'_> {
    type Entity = User;

    fn make_dummy(&self) -> RepoResult<User> {
        let user = User::new();
        SqliteUserRepository::new(self.conn).create_user(&user)?;
        Ok(user)
    }
}

pub struct FireTimeFactory<'conn> {
    conn: &'conn Connection,
    habit_id: Option<HabitId>,
}

impl<'conn> FireTimeFactory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            habit_id: None,
        }
    }

    /// Attaches generated fire times to `habit_id`.
    pub fn for_habit(mut self, habit_id: HabitId) -> Self {
        self.habit_id = Some(habit_id);
        self
    }
}

impl DummyFactory for FireTimeFactory<'_> {
    type Entity = FireTime;

    fn make_dummy(&self) -> RepoResult<FireTime> {
        let mut rng = rand::thread_rng();
        let fire_time = FireTime {
            id: Uuid::new_v4(),
            habit_id: self.habit_id,
            created_at: now_epoch_ms(),
            hour: rng.gen_range(0..DUMMY_HOUR_BOUND),
            minute: rng.gen_range(0..DUMMY_MINUTE_BOUND),
        };
        SqliteFireTimeRepository::new(self.conn).create_fire_time(&fire_time)?;
        Ok(fire_time)
    }
}

pub struct HabitFactory<'conn> {
    conn: &'conn Connection,
    user_id: UserId,
}

impl<'conn> HabitFactory<'conn> {
    pub fn new(conn: &'conn Connection, user_id: UserId) -> Self {
        Self { conn, user_id }
    }
}

impl DummyFactory for HabitFactory<'_> {
    type Entity = Habit;

    fn make_dummy(&self) -> RepoResult<Habit> {
        let mut rng = rand::thread_rng();
        let name = DUMMY_HABIT_NAMES[rng.gen_range(0..DUMMY_HABIT_NAMES.len())];
        let color = HabitColor::ALL[rng.gen_range(0..HabitColor::ALL.len())];

        let habit = Habit::new(self.user_id, name, color);
        SqliteHabitRepository::new(self.conn).create_habit(&habit)?;
        Ok(habit)
    }
}

pub struct NotificationFactory<'conn> {
    conn: &'conn Connection,
    habit_id: HabitId,
}

impl<'conn> NotificationFactory<'conn> {
    pub fn new(conn: &'conn Connection, habit_id: HabitId) -> Self {
        Self { conn, habit_id }
    }
}

impl DummyFactory for NotificationFactory<'_> {
    type Entity = Notification;

    /// Makes a pending notification firing within the next week.
    fn make_dummy(&self) -> RepoResult<Notification> {
        let offset = rand::thread_rng().gen_range(0..MAX_NOTIFICATION_OFFSET_MS);
        let notification = Notification::new(self.habit_id, now_epoch_ms() + offset);
        SqliteNotificationRepository::new(self.conn).create_notification(&notification)?;
        Ok(notification)
    }
}

/// Makes a sequence of consecutive tracked days for one habit.
///
/// Days before `today` get a random executed/missed outcome, `today` and
/// later stay pending. Missing calendar `days` rows are created on the way.
pub struct DaysSequenceFactory<'conn> {
    conn: &'conn Connection,
    habit_id: HabitId,
    from: NaiveDate,
    length: u32,
    today: NaiveDate,
}

impl<'conn> DaysSequenceFactory<'conn> {
    /// Defaults to a 14 day sequence centered on today.
    pub fn new(conn: &'conn Connection, habit_id: HabitId) -> Self {
        let today = Local::now().date_naive();
        let from = today
            .checked_sub_days(Days::new(u64::from(DEFAULT_SEQUENCE_DAYS / 2)))
            .unwrap_or(today);
        Self {
            conn,
            habit_id,
            from,
            length: DEFAULT_SEQUENCE_DAYS,
            today,
        }
    }

    pub fn starting(mut self, from: NaiveDate) -> Self {
        self.from = from;
        self
    }

    /// Sets the sequence length; zero is treated as one day.
    pub fn days(mut self, length: u32) -> Self {
        self.length = length.max(1);
        self
    }

    /// Overrides the date splitting past outcomes from pending days.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn date_at(&self, offset: u32) -> RepoResult<NaiveDate> {
        self.from
            .checked_add_days(Days::new(u64::from(offset)))
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "sequence starting {} overflows the calendar at day {offset}",
                    self.from
                ))
            })
    }
}

impl DummyFactory for DaysSequenceFactory<'_> {
    type Entity = DaysSequence;

    fn make_dummy(&self) -> RepoResult<DaysSequence> {
        if !habit_exists(self.conn, self.habit_id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Habit,
                id: self.habit_id,
            });
        }

        let to = self.date_at(self.length - 1)?;
        let mut sequence = DaysSequence::new(self.habit_id, self.from, to);
        let day_repo = SqliteDayRepository::new(self.conn);
        let mut rng = rand::thread_rng();

        let mut tracked = Vec::with_capacity(self.length as usize);
        for offset in 0..self.length {
            let date = self.date_at(offset)?;
            let day: Day = day_repo.get_or_create_day(date)?;
            let mut habit_day = HabitDay::new(self.habit_id, sequence.id, day.id, date);
            if date < self.today {
                habit_day.was_executed = Some(rng.gen_bool(0.5));
            }
            tracked.push(habit_day);
        }
        sequence.days = Some(tracked);

        SqliteDaysSequenceRepository::new(self.conn).create_sequence(&sequence)?;
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::{DaysSequenceFactory, DummyFactory, FireTimeFactory, HabitFactory, UserFactory};
    use crate::db::open_db_in_memory;
    use crate::model::entity::EntityKind;
    use crate::repo::count_entities;
    use crate::repo::sequence_repo::{DaysSequenceRepository, SqliteDaysSequenceRepository};
    use crate::repo::RepoError;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn fire_time_dummies_stay_in_generated_range() {
        let conn = open_db_in_memory().unwrap();
        let factory = FireTimeFactory::new(&conn);

        for _ in 0..500 {
            let fire_time = factory.make_dummy().unwrap();
            assert!(fire_time.hour <= 23);
            assert!(fire_time.minute <= 58);
        }
        assert_eq!(count_entities(&conn, EntityKind::FireTime).unwrap(), 500);
    }

    #[test]
    fn fire_time_dummy_ids_are_unique() {
        let conn = open_db_in_memory().unwrap();
        let factory = FireTimeFactory::new(&conn);

        let ids: HashSet<_> = (0..200)
            .map(|_| factory.make_dummy().unwrap().id)
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn sequence_dummy_splits_past_and_pending_days() {
        let conn = open_db_in_memory().unwrap();
        let user = UserFactory::new(&conn).make_dummy().unwrap();
        let habit = HabitFactory::new(&conn, user.id).make_dummy().unwrap();
        let from = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 5, 5).unwrap();

        let sequence = DaysSequenceFactory::new(&conn, habit.id)
            .starting(from)
            .days(10)
            .today(today)
            .make_dummy()
            .unwrap();

        assert_eq!(sequence.len_days(), 10);
        let executed = sequence.executed_days().unwrap().len();
        let missed = sequence.missed_days().unwrap().len();
        assert_eq!(executed + missed, 4);
        assert_eq!(sequence.pending_days().unwrap().len(), 6);

        let loaded = SqliteDaysSequenceRepository::new(&conn)
            .get_sequence(sequence.id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.days.as_ref().unwrap().len(), 10);
        assert_eq!(count_entities(&conn, EntityKind::Day).unwrap(), 10);
    }

    #[test]
    fn sequences_share_calendar_days() {
        let conn = open_db_in_memory().unwrap();
        let user = UserFactory::new(&conn).make_dummy().unwrap();
        let from = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        for _ in 0..2 {
            let habit = HabitFactory::new(&conn, user.id).make_dummy().unwrap();
            DaysSequenceFactory::new(&conn, habit.id)
                .starting(from)
                .days(3)
                .make_dummy()
                .unwrap();
        }

        assert_eq!(count_entities(&conn, EntityKind::Day).unwrap(), 3);
        assert_eq!(count_entities(&conn, EntityKind::HabitDay).unwrap(), 6);
    }

    #[test]
    fn sequence_dummy_requires_existing_habit() {
        let conn = open_db_in_memory().unwrap();
        let missing = Uuid::new_v4();

        let err = DaysSequenceFactory::new(&conn, missing)
            .make_dummy()
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound { entity: EntityKind::Habit, id } if id == missing
        ));
    }
}
