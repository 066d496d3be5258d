//! Lookup of the install's single user.
//!
//! # Invariants
//! - Lookups never fail: a store error is logged and reads as "no user".

use crate::model::user::User;
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use log::warn;
use rusqlite::Connection;

/// User lookup collaborator used by erase and by host-app screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserStorage;

impl UserStorage {
    pub fn new() -> Self {
        Self
    }

    /// Returns the current user visible through `conn`, if any.
    pub fn get_user(&self, conn: &Connection) -> Option<User> {
        match SqliteUserRepository::new(conn).current_user() {
            Ok(user) => user,
            Err(err) => {
                warn!(
                    "event=user_lookup module=service status=error error_code=user_fetch_failed error={}",
                    err
                );
                None
            }
        }
    }
}
