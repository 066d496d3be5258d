//! User model.
//!
//! # Invariants
//! - At most one user exists per install (enforced by the `users.singleton`
//!   unique column and by the base seed step's existence check).

use super::{now_epoch_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// The app's sole local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub created_at: i64,
}

impl User {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("user"));
        }
        Ok(())
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}
