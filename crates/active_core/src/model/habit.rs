//! Habit model.
//!
//! # Invariants
//! - `name` is never blank.
//! - A habit always belongs to the install's user; deleting the user deletes
//!   its habits and everything hanging off them.

use super::user::UserId;
use super::{now_epoch_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HabitId = Uuid;

/// Palette entry used to render a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitColor {
    MidnightBlue,
    Amethyst,
    Orange,
    Pomegranate,
    Alizarin,
    Emerald,
    Turquoise,
    Carrot,
}

impl HabitColor {
    pub const ALL: [HabitColor; 8] = [
        HabitColor::MidnightBlue,
        HabitColor::Amethyst,
        HabitColor::Orange,
        HabitColor::Pomegranate,
        HabitColor::Alizarin,
        HabitColor::Emerald,
        HabitColor::Turquoise,
        HabitColor::Carrot,
    ];

    pub fn as_db(self) -> &'static str {
        match self {
            Self::MidnightBlue => "midnight_blue",
            Self::Amethyst => "amethyst",
            Self::Orange => "orange",
            Self::Pomegranate => "pomegranate",
            Self::Alizarin => "alizarin",
            Self::Emerald => "emerald",
            Self::Turquoise => "turquoise",
            Self::Carrot => "carrot",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_db() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    pub color: HabitColor,
    pub created_at: i64,
}

impl Habit {
    pub fn new(user_id: UserId, name: impl Into<String>, color: HabitColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            color,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("habit"));
        }
        if self.user_id.is_nil() {
            return Err(ValidationError::NilId("habit user"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankHabitName);
        }
        Ok(())
    }
}
