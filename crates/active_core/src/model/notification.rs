//! Notification model. Persistence only; delivery lives in the host app.

use super::habit::HabitId;
use super::{now_epoch_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub habit_id: HabitId,
    /// Unix epoch milliseconds at which the reminder fires.
    pub fire_date: i64,
    /// Identifier handed out by the platform scheduler, once scheduled.
    pub request_id: Option<String>,
    pub was_scheduled: bool,
    pub created_at: i64,
}

impl Notification {
    pub fn new(habit_id: HabitId, fire_date: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            fire_date,
            request_id: None,
            was_scheduled: false,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("notification"));
        }
        Ok(())
    }
}
