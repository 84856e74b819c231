//! User records. The core only needs id and display name; email keeps
//! registrations unique.

use super::{Database, now_ms};
use crate::types::User;
use anyhow::{Result, anyhow};
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

pub(super) fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    /// Register a user. Email must be unique.
    pub fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let now = now_ms();
        let id = Uuid::new_v4().to_string();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, name, email, now],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    anyhow!("a user with email {} already exists", email)
                }
                e => e.into(),
            })?;

            Ok(User {
                id: id.clone(),
                name: name.to_string(),
                email: email.to_string(),
                created_at: now,
            })
        })
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT * FROM users WHERE id = ?1",
                    params![user_id],
                    parse_user_row,
                )
                .optional()?)
        })
    }
}
