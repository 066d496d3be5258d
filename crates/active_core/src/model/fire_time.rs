//! Reminder fire time model.
//!
//! # Invariants
//! - `hour` is in `0..=23`, `minute` in `0..=59`.

use super::habit::HabitId;
use super::{now_epoch_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FireTimeId = Uuid;

pub const MAX_HOUR: u8 = 23;
pub const MAX_MINUTE: u8 = 59;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireTime {
    pub id: FireTimeId,
    /// Owning habit's notification configuration, if attached.
    pub habit_id: Option<HabitId>,
    pub created_at: i64,
    pub hour: u8,
    pub minute: u8,
}

impl FireTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        let fire_time = Self {
            id: Uuid::new_v4(),
            habit_id: None,
            created_at: now_epoch_ms(),
            hour,
            minute,
        };
        fire_time.validate()?;
        Ok(fire_time)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("fire time"));
        }
        if self.hour > MAX_HOUR {
            return Err(ValidationError::HourOutOfRange(self.hour));
        }
        if self.minute > MAX_MINUTE {
            return Err(ValidationError::MinuteOutOfRange(self.minute));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FireTime;
    use crate::model::ValidationError;

    #[test]
    fn new_accepts_last_minute_of_day() {
        let fire_time = FireTime::new(23, 59).unwrap();
        assert_eq!((fire_time.hour, fire_time.minute), (23, 59));
        assert_eq!(fire_time.habit_id, None);
    }

    #[test]
    fn new_rejects_out_of_range_values() {
        assert_eq!(
            FireTime::new(24, 0).unwrap_err(),
            ValidationError::HourOutOfRange(24)
        );
        assert_eq!(
            FireTime::new(7, 60).unwrap_err(),
            ValidationError::MinuteOutOfRange(60)
        );
    }
}
