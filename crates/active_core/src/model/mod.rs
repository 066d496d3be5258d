//! Domain model for habit tracking.
//!
//! # Responsibility
//! - Define the records persisted by the data core.
//! - Keep model-level invariants checkable without a database.
//!
//! # Invariants
//! - Every record is identified by a non-nil UUID.
//! - `created_at` values are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod day;
pub mod days_sequence;
pub mod entity;
pub mod fire_time;
pub mod habit;
pub mod habit_day;
pub mod notification;
pub mod user;

/// Model invariant violations detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NilId(&'static str),
    HourOutOfRange(u8),
    MinuteOutOfRange(u8),
    BlankHabitName,
    ReversedSequenceWindow {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId(entity) => write!(f, "{entity} id must not be nil"),
            Self::HourOutOfRange(hour) => write!(f, "hour {hour} is outside 0..=23"),
            Self::MinuteOutOfRange(minute) => write!(f, "minute {minute} is outside 0..=59"),
            Self::BlankHabitName => write!(f, "habit name must not be blank"),
            Self::ReversedSequenceWindow { from, to } => {
                write!(f, "sequence end {to} must not be before start {from}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
