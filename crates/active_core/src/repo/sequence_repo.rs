//! Days sequence and tracked habit day repository.
//!
//! # Responsibility
//! - Persist sequences together with the tracked days they own.
//! - Load sequences with their day collection populated on request.
//!
//! # Invariants
//! - A tracked day belongs to exactly one sequence (`habit_days.sequence_id`)
//!   and appears at most once per calendar day in it.
//! - A tracked day's `habit_id` is the habit owning its sequence.
//! - `was_executed` is stored as NULL / 0 / 1.
//! - Tracked day dates are read from the joined `days` row, never stored twice.

use super::{bool_to_int, format_date, parse_date, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::days_sequence::{DaysSequence, DaysSequenceId};
use crate::model::entity::EntityKind;
use crate::model::habit::HabitId;
use crate::model::habit_day::{HabitDay, HabitDayId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SEQUENCE_SELECT_SQL: &str =
    "SELECT id, habit_id, from_date, to_date, created_at FROM days_sequences";

const HABIT_DAY_SELECT_SQL: &str = "SELECT
    hd.id AS id,
    hd.habit_id AS habit_id,
    hd.sequence_id AS sequence_id,
    hd.day_id AS day_id,
    d.date AS date,
    hd.was_executed AS was_executed,
    hd.created_at AS created_at
FROM habit_days hd
INNER JOIN days d ON d.id = hd.day_id";

/// Repository interface for days sequences and their tracked days.
pub trait DaysSequenceRepository {
    /// Inserts the sequence, plus its tracked days when they are loaded.
    fn create_sequence(&self, sequence: &DaysSequence) -> RepoResult<DaysSequenceId>;
    /// Loads one sequence with `days` populated.
    fn get_sequence(&self, id: DaysSequenceId) -> RepoResult<Option<DaysSequence>>;
    /// Lists a habit's sequences without loading their days.
    fn list_sequences(&self, habit_id: HabitId) -> RepoResult<Vec<DaysSequence>>;
    fn add_habit_day(&self, day: &HabitDay) -> RepoResult<HabitDayId>;
    fn remove_habit_day(&self, id: HabitDayId) -> RepoResult<()>;
    fn set_outcome(&self, id: HabitDayId, was_executed: Option<bool>) -> RepoResult<()>;
    fn list_habit_days(&self, sequence_id: DaysSequenceId) -> RepoResult<Vec<HabitDay>>;
    fn delete_sequence(&self, id: DaysSequenceId) -> RepoResult<()>;
}

/// SQLite-backed days sequence repository.
pub struct SqliteDaysSequenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDaysSequenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DaysSequenceRepository for SqliteDaysSequenceRepository<'_> {
    fn create_sequence(&self, sequence: &DaysSequence) -> RepoResult<DaysSequenceId> {
        sequence.validate()?;
        for day in sequence.days.iter().flatten() {
            if day.sequence_id != sequence.id {
                return Err(RepoError::InvalidData(format!(
                    "habit day {} belongs to sequence {}, not {}",
                    day.id, day.sequence_id, sequence.id
                )));
            }
            ensure_same_habit(day, sequence.habit_id)?;
        }

        self.conn.execute(
            "INSERT INTO days_sequences (id, habit_id, from_date, to_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                sequence.id.to_string(),
                sequence.habit_id.to_string(),
                format_date(sequence.from),
                format_date(sequence.to),
                sequence.created_at,
            ],
        )?;

        for day in sequence.days.iter().flatten() {
            self.add_habit_day(day)?;
        }

        Ok(sequence.id)
    }

    fn get_sequence(&self, id: DaysSequenceId) -> RepoResult<Option<DaysSequence>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SEQUENCE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut sequence = parse_sequence_row(row)?;
        sequence.days = Some(self.list_habit_days(sequence.id)?);
        Ok(Some(sequence))
    }

    fn list_sequences(&self, habit_id: HabitId) -> RepoResult<Vec<DaysSequence>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SEQUENCE_SELECT_SQL} WHERE habit_id = ?1 ORDER BY from_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([habit_id.to_string()])?;
        let mut sequences = Vec::new();
        while let Some(row) = rows.next()? {
            sequences.push(parse_sequence_row(row)?);
        }

        Ok(sequences)
    }

    fn add_habit_day(&self, day: &HabitDay) -> RepoResult<HabitDayId> {
        day.validate()?;

        let owner: Option<String> = self
            .conn
            .query_row(
                "SELECT habit_id FROM days_sequences WHERE id = ?1;",
                [day.sequence_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(owner) = owner else {
            return Err(RepoError::NotFound {
                entity: EntityKind::DaysSequence,
                id: day.sequence_id,
            });
        };
        ensure_same_habit(day, parse_uuid(&owner, "days_sequences.habit_id")?)?;

        self.conn.execute(
            "INSERT INTO habit_days (id, habit_id, sequence_id, day_id, was_executed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                day.id.to_string(),
                day.habit_id.to_string(),
                day.sequence_id.to_string(),
                day.day_id.to_string(),
                day.was_executed.map(bool_to_int),
                day.created_at,
            ],
        )?;

        Ok(day.id)
    }

    fn remove_habit_day(&self, id: HabitDayId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habit_days WHERE id = ?1;", [id.to_string()])?;
        ensure_changed(changed, EntityKind::HabitDay, id)
    }

    fn set_outcome(&self, id: HabitDayId, was_executed: Option<bool>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habit_days SET was_executed = ?2 WHERE id = ?1;",
            params![id.to_string(), was_executed.map(bool_to_int)],
        )?;
        ensure_changed(changed, EntityKind::HabitDay, id)
    }

    fn list_habit_days(&self, sequence_id: DaysSequenceId) -> RepoResult<Vec<HabitDay>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_DAY_SELECT_SQL} WHERE hd.sequence_id = ?1 ORDER BY d.date ASC;"
        ))?;
        let mut rows = stmt.query([sequence_id.to_string()])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            days.push(parse_habit_day_row(row)?);
        }

        Ok(days)
    }

    fn delete_sequence(&self, id: DaysSequenceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM days_sequences WHERE id = ?1;", [id.to_string()])?;
        ensure_changed(changed, EntityKind::DaysSequence, id)
    }
}

fn ensure_changed(changed: usize, entity: EntityKind, id: uuid::Uuid) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

fn ensure_same_habit(day: &HabitDay, owner: HabitId) -> RepoResult<()> {
    if day.habit_id != owner {
        return Err(RepoError::InvalidData(format!(
            "habit day {} is tagged with habit {}, but sequence {} belongs to habit {}",
            day.id, day.habit_id, day.sequence_id, owner
        )));
    }
    Ok(())
}

fn parse_sequence_row(row: &Row<'_>) -> RepoResult<DaysSequence> {
    let id_text: String = row.get("id")?;
    let habit_text: String = row.get("habit_id")?;
    let from_text: String = row.get("from_date")?;
    let to_text: String = row.get("to_date")?;

    let sequence = DaysSequence {
        id: parse_uuid(&id_text, "days_sequences.id")?,
        habit_id: parse_uuid(&habit_text, "days_sequences.habit_id")?,
        from: parse_date(&from_text, "days_sequences.from_date")?,
        to: parse_date(&to_text, "days_sequences.to_date")?,
        created_at: row.get("created_at")?,
        days: None,
    };
    sequence.validate()?;
    Ok(sequence)
}

fn parse_habit_day_row(row: &Row<'_>) -> RepoResult<HabitDay> {
    let id_text: String = row.get("id")?;
    let habit_text: String = row.get("habit_id")?;
    let sequence_text: String = row.get("sequence_id")?;
    let day_text: String = row.get("day_id")?;
    let date_text: String = row.get("date")?;
    let was_executed = match row.get::<_, Option<i64>>("was_executed")? {
        Some(value) => Some(parse_flag(value, "habit_days.was_executed")?),
        None => None,
    };

    let day = HabitDay {
        id: parse_uuid(&id_text, "habit_days.id")?,
        habit_id: parse_uuid(&habit_text, "habit_days.habit_id")?,
        sequence_id: parse_uuid(&sequence_text, "habit_days.sequence_id")?,
        day_id: parse_uuid(&day_text, "habit_days.day_id")?,
        date: parse_date(&date_text, "days.date")?,
        was_executed,
        created_at: row.get("created_at")?,
    };
    day.validate()?;
    Ok(day)
}
