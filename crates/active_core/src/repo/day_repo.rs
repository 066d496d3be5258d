//! Calendar day repository contracts and SQLite implementation.
//!
//! # Invariants
//! - At most one `days` row per date.
//! - Deleting a day deletes the tracked habit days pointing at it.

use super::{format_date, parse_date, parse_uuid, RepoError, RepoResult};
use crate::model::day::{Day, DayId};
use crate::model::entity::EntityKind;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const DAY_SELECT_SQL: &str = "SELECT id, date, created_at FROM days";

/// Repository interface for calendar days.
pub trait DayRepository {
    fn create_day(&self, day: &Day) -> RepoResult<DayId>;
    fn get_day_by_date(&self, date: NaiveDate) -> RepoResult<Option<Day>>;
    /// Returns the row for `date`, inserting it first when missing.
    fn get_or_create_day(&self, date: NaiveDate) -> RepoResult<Day>;
    fn list_days(&self) -> RepoResult<Vec<Day>>;
    fn delete_day(&self, id: DayId) -> RepoResult<()>;
}

/// SQLite-backed day repository.
pub struct SqliteDayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDayRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DayRepository for SqliteDayRepository<'_> {
    fn create_day(&self, day: &Day) -> RepoResult<DayId> {
        day.validate()?;

        self.conn.execute(
            "INSERT INTO days (id, date, created_at) VALUES (?1, ?2, ?3);",
            params![day.id.to_string(), format_date(day.date), day.created_at],
        )?;

        Ok(day.id)
    }

    fn get_day_by_date(&self, date: NaiveDate) -> RepoResult<Option<Day>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DAY_SELECT_SQL} WHERE date = ?1;"))?;
        let mut rows = stmt.query([format_date(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_day_row(row)?));
        }

        Ok(None)
    }

    fn get_or_create_day(&self, date: NaiveDate) -> RepoResult<Day> {
        if let Some(day) = self.get_day_by_date(date)? {
            return Ok(day);
        }

        let day = Day::new(date);
        self.create_day(&day)?;
        Ok(day)
    }

    fn list_days(&self) -> RepoResult<Vec<Day>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DAY_SELECT_SQL} ORDER BY date ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            days.push(parse_day_row(row)?);
        }

        Ok(days)
    }

    fn delete_day(&self, id: DayId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM days WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Day,
                id,
            });
        }

        Ok(())
    }
}

fn parse_day_row(row: &Row<'_>) -> RepoResult<Day> {
    let id_text: String = row.get("id")?;
    let date_text: String = row.get("date")?;

    let day = Day {
        id: parse_uuid(&id_text, "days.id")?,
        date: parse_date(&date_text, "days.date")?,
        created_at: row.get("created_at")?,
    };
    day.validate()?;
    Ok(day)
}
