//! Fire time repository contracts and SQLite implementation.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::entity::EntityKind;
use crate::model::fire_time::{FireTime, FireTimeId};
use crate::model::habit::HabitId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const FIRE_TIME_SELECT_SQL: &str = "SELECT id, habit_id, hour, minute, created_at FROM fire_times";

/// Repository interface for reminder fire times.
pub trait FireTimeRepository {
    fn create_fire_time(&self, fire_time: &FireTime) -> RepoResult<FireTimeId>;
    /// Lists fire times of one habit, or every fire time when `habit_id` is
    /// `None`. Ordered by time of day.
    fn list_fire_times(&self, habit_id: Option<HabitId>) -> RepoResult<Vec<FireTime>>;
    fn delete_fire_time(&self, id: FireTimeId) -> RepoResult<()>;
}

/// SQLite-backed fire time repository.
pub struct SqliteFireTimeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFireTimeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FireTimeRepository for SqliteFireTimeRepository<'_> {
    fn create_fire_time(&self, fire_time: &FireTime) -> RepoResult<FireTimeId> {
        fire_time.validate()?;

        self.conn.execute(
            "INSERT INTO fire_times (id, habit_id, hour, minute, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fire_time.id.to_string(),
                fire_time.habit_id.map(|id| id.to_string()),
                fire_time.hour,
                fire_time.minute,
                fire_time.created_at,
            ],
        )?;

        Ok(fire_time.id)
    }

    fn list_fire_times(&self, habit_id: Option<HabitId>) -> RepoResult<Vec<FireTime>> {
        let mut sql = format!("{FIRE_TIME_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(habit_id) = habit_id {
            sql.push_str(" AND habit_id = ?");
            bind_values.push(Value::Text(habit_id.to_string()));
        }
        sql.push_str(" ORDER BY hour ASC, minute ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut fire_times = Vec::new();
        while let Some(row) = rows.next()? {
            fire_times.push(parse_fire_time_row(row)?);
        }

        Ok(fire_times)
    }

    fn delete_fire_time(&self, id: FireTimeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM fire_times WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::FireTime,
                id,
            });
        }

        Ok(())
    }
}

fn parse_fire_time_row(row: &Row<'_>) -> RepoResult<FireTime> {
    let id_text: String = row.get("id")?;
    let habit_id = match row.get::<_, Option<String>>("habit_id")? {
        Some(value) => Some(parse_uuid(&value, "fire_times.habit_id")?),
        None => None,
    };

    let fire_time = FireTime {
        id: parse_uuid(&id_text, "fire_times.id")?,
        habit_id,
        created_at: row.get("created_at")?,
        hour: row.get("hour")?,
        minute: row.get("minute")?,
    };
    fire_time.validate()?;
    Ok(fire_time)
}
