//! Habit repository contracts and SQLite implementation.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::entity::EntityKind;
use crate::model::habit::{Habit, HabitColor, HabitId};
use crate::model::user::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const HABIT_SELECT_SQL: &str = "SELECT id, user_id, name, color, created_at FROM habits";

/// Repository interface for habit CRUD operations.
pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    fn list_habits(&self, user_id: UserId) -> RepoResult<Vec<Habit>>;
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;

        self.conn.execute(
            "INSERT INTO habits (id, user_id, name, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name.as_str(),
                habit.color.as_db(),
                habit.created_at,
            ],
        )?;

        Ok(habit.id)
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }

        Ok(None)
    }

    fn list_habits(&self, user_id: UserId) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL} WHERE user_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        Ok(habits)
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Habit,
                id,
            });
        }

        Ok(())
    }
}

/// Returns whether a habit row exists, without parsing it.
pub fn habit_exists(conn: &Connection, id: HabitId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM habits WHERE id = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let color_text: String = row.get("color")?;
    let color = HabitColor::from_db(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid habit color `{color_text}` in habits.color"))
    })?;

    let habit = Habit {
        id: parse_uuid(&id_text, "habits.id")?,
        user_id: parse_uuid(&user_text, "habits.user_id")?,
        name: row.get("name")?,
        color,
        created_at: row.get("created_at")?,
    };
    habit.validate()?;
    Ok(habit)
}
