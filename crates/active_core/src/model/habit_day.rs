//! Tracked habit day: one calendar day's outcome inside a sequence.

use super::day::DayId;
use super::days_sequence::DaysSequenceId;
use super::habit::HabitId;
use super::{now_epoch_ms, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HabitDayId = Uuid;

/// Tracking outcome of one day.
///
/// `was_executed` is tri-state: `Some(true)` executed, `Some(false)` missed,
/// `None` not yet due (no outcome recorded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitDay {
    pub id: HabitDayId,
    pub habit_id: HabitId,
    pub sequence_id: DaysSequenceId,
    pub day_id: DayId,
    pub date: NaiveDate,
    pub was_executed: Option<bool>,
    pub created_at: i64,
}

impl HabitDay {
    pub fn new(
        habit_id: HabitId,
        sequence_id: DaysSequenceId,
        day_id: DayId,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            sequence_id,
            day_id,
            date,
            was_executed: None,
            created_at: now_epoch_ms(),
        }
    }

    pub fn is_executed(&self) -> bool {
        self.was_executed == Some(true)
    }

    pub fn is_missed(&self) -> bool {
        self.was_executed == Some(false)
    }

    pub fn is_pending(&self) -> bool {
        self.was_executed.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("habit day"));
        }
        if self.sequence_id.is_nil() {
            return Err(ValidationError::NilId("habit day sequence"));
        }
        Ok(())
    }
}
