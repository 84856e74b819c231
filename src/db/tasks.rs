//! Task CRUD, lifecycle persistence and the deadline sweep.

use super::{Database, now_ms};
use crate::engine::lifecycle;
use crate::types::{ShoppingItem, Task, TaskKind, TaskStatus};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub kind: Option<TaskKind>,
    pub household_id: Option<String>,
    pub assigned_to: Option<String>,
    pub owner_id: String,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<String>,
    pub points: i64,
    pub shopping_list: Vec<ShoppingItem>,
}

/// Field updates for a task. Inner `Option` distinguishes "set to NULL"
/// from "leave unchanged". Status changes go through the lifecycle
/// operations instead.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub assigned_to: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<String>>,
    pub points: Option<i64>,
    pub shopping_list: Option<Vec<ShoppingItem>>,
    pub photo: Option<Option<String>>,
}

/// Filters for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub kind: Option<TaskKind>,
    pub household_id: Option<String>,
    pub owner_id: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let kind: String = row.get("kind")?;
    let status: String = row.get("status")?;
    let due_date: Option<String> = row.get("due_date")?;
    let shopping_json: Option<String> = row.get("shopping_list")?;
    let completed_on_time: Option<bool> = row.get("completed_on_time")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        kind: TaskKind::from_str(&kind).unwrap_or(TaskKind::Personal),
        household_id: row.get("household_id")?,
        assigned_to: row.get("assigned_to")?,
        owner_id: row.get("owner_id")?,
        category: row.get("category")?,
        status: TaskStatus::from_str(&status).unwrap_or(TaskStatus::Active),
        due_date: due_date.and_then(|s| s.parse().ok()),
        due_time: row.get("due_time")?,
        points: row.get("points")?,
        shopping_list: shopping_json
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default(),
        photo: row.get("photo")?,
        completed_at: row.get("completed_at")?,
        completed_by: row.get("completed_by")?,
        time_to_complete: row.get("time_to_complete")?,
        completed_on_time,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a task using an existing connection.
fn get_task_internal(conn: &Connection, task_id: &str) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
    let result = stmt.query_row(params![task_id], parse_task_row);
    match result {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn shopping_list_json(list: &[ShoppingItem]) -> Result<Option<String>> {
    if list.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(list)?))
    }
}

impl Database {
    /// Create a new task in the initial `active` state.
    pub fn create_task(&self, new: NewTask) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            kind: new.kind.unwrap_or(TaskKind::Personal),
            household_id: new.household_id,
            assigned_to: new.assigned_to,
            owner_id: new.owner_id,
            category: new.category,
            status: TaskStatus::Active,
            due_date: new.due_date,
            due_time: new.due_time,
            points: new.points,
            shopping_list: new.shopping_list,
            photo: None,
            completed_at: None,
            completed_by: None,
            time_to_complete: None,
            completed_on_time: None,
            created_at: now_ms(),
            updated_at: now_ms(),
        };
        self.insert_task(&task)?;
        Ok(task)
    }

    /// Insert a fully-populated task row as-is. Used by task creation and
    /// by the seeder, which needs backdated timestamps.
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (
                    id, title, description, kind, household_id, assigned_to,
                    owner_id, category, status, due_date, due_time, points,
                    shopping_list, photo, completed_at, completed_by,
                    time_to_complete, completed_on_time, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                          ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                params![
                    task.id,
                    task.title,
                    task.description,
                    task.kind.as_str(),
                    task.household_id,
                    task.assigned_to,
                    task.owner_id,
                    task.category,
                    task.status.as_str(),
                    task.due_date.map(|d| d.to_string()),
                    task.due_time,
                    task.points,
                    shopping_list_json(&task.shopping_list)?,
                    task.photo,
                    task.completed_at,
                    task.completed_by,
                    task.time_to_complete,
                    task.completed_on_time,
                    task.created_at,
                    task.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List tasks matching the filter, newest first.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut sql = String::from("SELECT * FROM tasks WHERE 1=1");
            let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(kind) = filter.kind {
                sql.push_str(" AND kind = ?");
                params_vec.push(Box::new(kind.as_str().to_string()));
            }
            if let Some(ref hid) = filter.household_id {
                sql.push_str(" AND household_id = ?");
                params_vec.push(Box::new(hid.clone()));
            }
            if let Some(ref oid) = filter.owner_id {
                sql.push_str(" AND owner_id = ?");
                params_vec.push(Box::new(oid.clone()));
            }
            if let Some(ref aid) = filter.assigned_to {
                sql.push_str(" AND assigned_to = ?");
                params_vec.push(Box::new(aid.clone()));
            }
            if let Some(status) = filter.status {
                sql.push_str(" AND status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }
            if let Some(ref category) = filter.category {
                sql.push_str(" AND category = ?");
                params_vec.push(Box::new(category.clone()));
            }

            sql.push_str(" ORDER BY created_at DESC");

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|b| b.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map(params_refs.as_slice(), parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(tasks)
        })
    }

    /// A member's full task history within a household, oldest first.
    /// This ordering is what the scoring engine expects.
    pub fn member_task_history(&self, household_id: &str, member_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM tasks
                 WHERE household_id = ?1 AND assigned_to = ?2
                 ORDER BY created_at ASC",
            )?;
            let tasks = stmt
                .query_map(params![household_id, member_id], parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(tasks)
        })
    }

    /// Apply field updates without touching the lifecycle state.
    pub fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| {
            let task =
                get_task_internal(conn, task_id)?.ok_or_else(|| anyhow!("task not found"))?;

            let merged = Task {
                title: update.title.unwrap_or(task.title.clone()),
                description: update.description.unwrap_or(task.description.clone()),
                category: update.category.unwrap_or(task.category.clone()),
                assigned_to: update.assigned_to.unwrap_or(task.assigned_to.clone()),
                due_date: update.due_date.unwrap_or(task.due_date),
                due_time: update.due_time.unwrap_or(task.due_time.clone()),
                points: update.points.unwrap_or(task.points),
                shopping_list: update
                    .shopping_list
                    .unwrap_or(task.shopping_list.clone()),
                photo: update.photo.unwrap_or(task.photo.clone()),
                updated_at: now,
                ..task
            };

            conn.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, category = ?3, assigned_to = ?4,
                    due_date = ?5, due_time = ?6, points = ?7, shopping_list = ?8,
                    photo = ?9, updated_at = ?10
                 WHERE id = ?11",
                params![
                    merged.title,
                    merged.description,
                    merged.category,
                    merged.assigned_to,
                    merged.due_date.map(|d| d.to_string()),
                    merged.due_time,
                    merged.points,
                    shopping_list_json(&merged.shopping_list)?,
                    merged.photo,
                    now,
                    task_id,
                ],
            )?;

            Ok(merged)
        })
    }

    /// Transition an active task to completed and persist the derived
    /// timing metrics. Completing an already-completed task is a no-op;
    /// a failed task cannot be completed.
    pub fn complete_task(
        &self,
        task_id: &str,
        user_id: &str,
        photo: Option<String>,
    ) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| {
            let mut task =
                get_task_internal(conn, task_id)?.ok_or_else(|| anyhow!("task not found"))?;

            match task.status {
                TaskStatus::Completed => return Ok(task),
                TaskStatus::Failed => {
                    return Err(anyhow!("task has failed its deadline and cannot be completed"));
                }
                TaskStatus::Active => {}
            }

            lifecycle::complete(&mut task, user_id, now);
            if photo.is_some() {
                task.photo = photo;
            }

            conn.execute(
                "UPDATE tasks SET
                    status = ?1, completed_at = ?2, completed_by = ?3,
                    time_to_complete = ?4, completed_on_time = ?5, photo = ?6,
                    updated_at = ?7
                 WHERE id = ?8",
                params![
                    task.status.as_str(),
                    task.completed_at,
                    task.completed_by,
                    task.time_to_complete,
                    task.completed_on_time,
                    task.photo,
                    task.updated_at,
                    task_id,
                ],
            )?;

            Ok(task)
        })
    }

    /// Undo a completion: back to active, completion fields cleared.
    pub fn reopen_task(&self, task_id: &str) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| {
            let mut task =
                get_task_internal(conn, task_id)?.ok_or_else(|| anyhow!("task not found"))?;

            match task.status {
                TaskStatus::Active => return Ok(task),
                TaskStatus::Failed => {
                    return Err(anyhow!("a failed task cannot be reopened"));
                }
                TaskStatus::Completed => {}
            }

            lifecycle::reopen(&mut task, now);

            conn.execute(
                "UPDATE tasks SET
                    status = ?1, completed_at = NULL, completed_by = NULL,
                    time_to_complete = NULL, completed_on_time = NULL, updated_at = ?2
                 WHERE id = ?3",
                params![task.status.as_str(), now, task_id],
            )?;

            Ok(task)
        })
    }

    /// Delete a task. Returns false when no such task exists.
    pub fn delete_task(&self, task_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(deleted > 0)
        })
    }

    /// One sweep pass: fail every active task whose deadline has passed.
    ///
    /// The UPDATE re-checks `status = 'active'`, so a task completed by a
    /// concurrent user action between our read and write is left alone.
    /// Returns the number of tasks transitioned.
    pub fn sweep_overdue(&self, now: i64) -> Result<u32> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM tasks WHERE status = 'active' AND due_date IS NOT NULL",
            )?;
            let candidates: Vec<Task> = stmt
                .query_map([], parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();

            let mut failed = 0u32;
            for task in candidates {
                if !lifecycle::is_overdue(&task, now) {
                    continue;
                }
                let changed = conn.execute(
                    "UPDATE tasks SET status = 'failed', updated_at = ?1
                     WHERE id = ?2 AND status = 'active'",
                    params![now, task.id],
                )?;
                if changed > 0 {
                    failed += 1;
                    tracing::debug!(task_id = %task.id, title = %task.title, "task failed: deadline passed");
                }
            }

            Ok(failed)
        })
    }
}
