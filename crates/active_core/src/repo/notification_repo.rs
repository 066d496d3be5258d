//! Notification repository contracts and SQLite implementation.

use super::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::entity::EntityKind;
use crate::model::habit::HabitId;
use crate::model::notification::{Notification, NotificationId};
use rusqlite::{params, Connection, Row};

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    id,
    habit_id,
    fire_date,
    request_id,
    was_scheduled,
    created_at
FROM notifications";

/// Repository interface for habit notifications.
pub trait NotificationRepository {
    fn create_notification(&self, notification: &Notification) -> RepoResult<NotificationId>;
    /// Lists a habit's notifications ordered by fire date.
    fn list_notifications(&self, habit_id: HabitId) -> RepoResult<Vec<Notification>>;
    /// Records the platform request id once the reminder was scheduled.
    fn mark_scheduled(&self, id: NotificationId, request_id: &str) -> RepoResult<()>;
    fn delete_notification(&self, id: NotificationId) -> RepoResult<()>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn create_notification(&self, notification: &Notification) -> RepoResult<NotificationId> {
        notification.validate()?;

        self.conn.execute(
            "INSERT INTO notifications (
                id,
                habit_id,
                fire_date,
                request_id,
                was_scheduled,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                notification.id.to_string(),
                notification.habit_id.to_string(),
                notification.fire_date,
                notification.request_id.as_deref(),
                bool_to_int(notification.was_scheduled),
                notification.created_at,
            ],
        )?;

        Ok(notification.id)
    }

    fn list_notifications(&self, habit_id: HabitId) -> RepoResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTIFICATION_SELECT_SQL} WHERE habit_id = ?1 ORDER BY fire_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([habit_id.to_string()])?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }

        Ok(notifications)
    }

    fn mark_scheduled(&self, id: NotificationId, request_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notifications SET was_scheduled = 1, request_id = ?2 WHERE id = ?1;",
            params![id.to_string(), request_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Notification,
                id,
            });
        }

        Ok(())
    }

    fn delete_notification(&self, id: NotificationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notifications WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Notification,
                id,
            });
        }

        Ok(())
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let id_text: String = row.get("id")?;
    let habit_text: String = row.get("habit_id")?;

    let notification = Notification {
        id: parse_uuid(&id_text, "notifications.id")?,
        habit_id: parse_uuid(&habit_text, "notifications.habit_id")?,
        fire_date: row.get("fire_date")?,
        request_id: row.get("request_id")?,
        was_scheduled: parse_flag(row.get("was_scheduled")?, "notifications.was_scheduled")?,
        created_at: row.get("created_at")?,
    };
    notification.validate()?;
    Ok(notification)
}
