//! Entity kinds known to the store, used for count-by-type queries.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Habit,
    HabitDay,
    Notification,
    Day,
    DaysSequence,
    FireTime,
}

impl EntityKind {
    /// Kinds listed in post-seed reports, in report order.
    pub const REPORTED: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Habit,
        EntityKind::HabitDay,
        EntityKind::Notification,
        EntityKind::Day,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Habit => "habits",
            Self::HabitDay => "habit_days",
            Self::Notification => "notifications",
            Self::Day => "days",
            Self::DaysSequence => "days_sequences",
            Self::FireTime => "fire_times",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Habit => "Habit",
            Self::HabitDay => "HabitDay",
            Self::Notification => "Notification",
            Self::Day => "Day",
            Self::DaysSequence => "DaysSequence",
            Self::FireTime => "FireTime",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
