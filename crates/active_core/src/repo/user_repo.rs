//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - The schema allows a single user row; a second insert fails with a
//!   constraint error instead of creating a duplicate.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::entity::EntityKind;
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, created_at FROM users";

/// Repository interface for the install's user.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns the current user, if one was ever created.
    fn current_user(&self) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (id, created_at) VALUES (?1, ?2);",
            params![user.id.to_string(), user.created_at],
        )?;

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_user_columns,
            )
            .optional()?;

        row.map(parse_user).transpose()
    }

    fn current_user(&self) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} ORDER BY created_at ASC LIMIT 1;"),
                [],
                read_user_columns,
            )
            .optional()?;

        row.map(parse_user).transpose()
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let rows = stmt.query_map([], read_user_columns)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(parse_user(row?)?);
        }
        Ok(users)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }

        Ok(())
    }
}

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<(String, i64)> {
    Ok((row.get("id")?, row.get("created_at")?))
}

fn parse_user((id_text, created_at): (String, i64)) -> RepoResult<User> {
    let user = User {
        id: parse_uuid(&id_text, "users.id")?,
        created_at,
    };
    user.validate()?;
    Ok(user)
}
