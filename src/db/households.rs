//! Household CRUD and membership.

use super::{Database, now_ms};
use crate::types::{Household, User};
use anyhow::{Result, anyhow};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

// Invite code alphabet avoids easily-confused characters (no I/O/0/1).
const CODE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const CODE_DIGITS: &[u8] = b"23456789";
const CODE_MAX_TRIES: u32 = 10;

fn pick<R: Rng>(rng: &mut R, pool: &[u8], n: usize) -> String {
    (0..n)
        .map(|_| pool[rng.gen_range(0..pool.len())] as char)
        .collect()
}

/// Generate an invite code of the form "XXX-NNN-XXX".
fn generate_invite_code<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}-{}-{}",
        pick(rng, CODE_LETTERS, 3),
        pick(rng, CODE_DIGITS, 3),
        pick(rng, CODE_LETTERS, 3)
    )
}

fn parse_household_row(row: &Row) -> rusqlite::Result<Household> {
    Ok(Household {
        id: row.get("id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        invite_code: row.get("invite_code")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn invite_code_taken(conn: &Connection, code: &str) -> Result<bool> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM households WHERE invite_code = ?1)",
        params![code],
        |row| row.get(0),
    )?;
    Ok(taken)
}

impl Database {
    /// Create a household with a fresh unique invite code. The owner joins
    /// as the first member.
    pub fn create_household(
        &self,
        name: &str,
        address: Option<&str>,
        owner_id: &str,
    ) -> Result<Household> {
        let now = now_ms();
        let id = Uuid::new_v4().to_string();

        self.with_conn_mut(|conn| {
            let mut rng = rand::thread_rng();
            let mut code = None;
            for _ in 0..CODE_MAX_TRIES {
                let candidate = generate_invite_code(&mut rng);
                if !invite_code_taken(conn, &candidate)? {
                    code = Some(candidate);
                    break;
                }
            }
            let code = code.ok_or_else(|| anyhow!("failed to generate a unique invite code"))?;

            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO households (id, name, address, invite_code, owner_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, name, address, code, owner_id, now, now],
            )?;
            tx.execute(
                "INSERT INTO household_members (household_id, user_id, joined_at)
                 VALUES (?1, ?2, ?3)",
                params![id, owner_id, now],
            )?;
            tx.commit()?;

            Ok(Household {
                id: id.clone(),
                name: name.to_string(),
                address: address.map(str::to_string),
                invite_code: code,
                owner_id: owner_id.to_string(),
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Join a household by invite code. Joining a household the user is
    /// already in is a no-op. Codes are matched case-insensitively.
    pub fn join_household(&self, code: &str, user_id: &str) -> Result<Option<Household>> {
        let now = now_ms();
        let code = code.trim().to_uppercase();

        self.with_conn(|conn| {
            let household = conn
                .query_row(
                    "SELECT * FROM households WHERE invite_code = ?1",
                    params![code],
                    parse_household_row,
                )
                .optional()?;

            let Some(household) = household else {
                return Ok(None);
            };

            conn.execute(
                "INSERT OR IGNORE INTO household_members (household_id, user_id, joined_at)
                 VALUES (?1, ?2, ?3)",
                params![household.id, user_id, now],
            )?;

            Ok(Some(household))
        })
    }

    /// Get a household by ID.
    pub fn get_household(&self, household_id: &str) -> Result<Option<Household>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT * FROM households WHERE id = ?1",
                    params![household_id],
                    parse_household_row,
                )
                .optional()?)
        })
    }

    /// All households the user belongs to.
    pub fn households_for_user(&self, user_id: &str) -> Result<Vec<Household>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT h.* FROM households h
                 INNER JOIN household_members m ON m.household_id = h.id
                 WHERE m.user_id = ?1
                 ORDER BY m.joined_at",
            )?;
            let households = stmt
                .query_map(params![user_id], parse_household_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(households)
        })
    }

    /// Members of a household, in join order.
    pub fn household_members(&self, household_id: &str) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.* FROM users u
                 INNER JOIN household_members m ON m.user_id = u.id
                 WHERE m.household_id = ?1
                 ORDER BY m.joined_at",
            )?;
            let members = stmt
                .query_map(params![household_id], super::users::parse_user_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(members)
        })
    }

    /// Whether the user is a member of the household.
    pub fn is_member(&self, household_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let member: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM household_members
                 WHERE household_id = ?1 AND user_id = ?2)",
                params![household_id, user_id],
                |row| row.get(0),
            )?;
            Ok(member)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_code_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let code = generate_invite_code(&mut rng);
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert!(parts[0].bytes().all(|b| CODE_LETTERS.contains(&b)));
            assert!(parts[1].bytes().all(|b| CODE_DIGITS.contains(&b)));
            assert!(parts[2].bytes().all(|b| CODE_LETTERS.contains(&b)));
        }
    }
}
