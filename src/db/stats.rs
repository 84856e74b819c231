//! Aggregate task counts for dashboard views.
//!
//! Counts are computed from the task table on every request; household
//! records carry no running counters.

use super::Database;
use crate::types::TaskStats;
use anyhow::Result;
use chrono::Local;
use rusqlite::params;

/// Scope for a stats query: one household's group tasks, or one user's
/// personal view.
#[derive(Debug, Clone)]
pub enum StatsScope {
    Household(String),
    Owner(String),
}

impl Database {
    /// Completed/total/due-today counts plus points earned from completed
    /// tasks.
    pub fn task_stats(&self, scope: &StatsScope) -> Result<TaskStats> {
        let today = Local::now().date_naive().to_string();

        let (where_clause, key) = match scope {
            StatsScope::Household(id) => ("household_id = ?1 AND kind = 'group'", id.clone()),
            StatsScope::Owner(id) => ("owner_id = ?1", id.clone()),
        };

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT
                    COUNT(*) AS total,
                    COALESCE(SUM(status = 'completed'), 0) AS completed,
                    COALESCE(SUM(status = 'active' AND due_date = ?2), 0) AS today,
                    COALESCE(SUM(CASE WHEN status = 'completed' THEN points ELSE 0 END), 0) AS points
                 FROM tasks WHERE {}",
                where_clause
            );

            let stats = conn.query_row(&sql, params![key, today], |row| {
                Ok(TaskStats {
                    total: row.get("total")?,
                    completed: row.get("completed")?,
                    today: row.get("today")?,
                    points: row.get("points")?,
                })
            })?;

            Ok(stats)
        })
    }
}
