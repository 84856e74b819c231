//! Task handlers: creation, listing, field updates, lifecycle toggles,
//! deletion and dashboard stats.

use super::{AppState, UserId};
use crate::db::now_ms;
use crate::db::stats::StatsScope;
use crate::db::tasks::{NewTask, TaskFilter, TaskUpdate};
use crate::engine::parse_due_time;
use crate::error::{ApiError, ApiResult};
use crate::types::{ShoppingItem, Task, TaskKind, TaskStats, TaskStatus};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// "group" or "personal".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub household_id: Option<String>,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
    pub due_time: Option<String>,
    pub points: Option<i64>,
    #[serde(default)]
    pub shopping_list: Vec<ShoppingItem>,
}

pub async fn create(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("title"))?;
    let kind = body
        .kind
        .as_deref()
        .ok_or_else(|| ApiError::missing_field("type"))
        .and_then(|s| {
            TaskKind::from_str(s)
                .ok_or_else(|| ApiError::invalid_value("type", "type must be group or personal"))
        })?;

    if let Some(ref due_time) = body.due_time
        && parse_due_time(due_time).is_none()
    {
        return Err(ApiError::invalid_value(
            "dueTime",
            "dueTime must be a valid HH:mm time",
        ));
    }

    let mut new = NewTask {
        title: title.to_string(),
        description: body.description,
        kind: Some(kind),
        owner_id: user_id.clone(),
        due_date: body.due_date,
        due_time: body.due_time,
        points: body.points.unwrap_or(0),
        shopping_list: stamp_items(body.shopping_list),
        ..NewTask::default()
    };

    match kind {
        TaskKind::Group => {
            let household_id = body
                .household_id
                .ok_or_else(|| ApiError::missing_field("householdId"))?;
            if state.db.get_household(&household_id)?.is_none() {
                return Err(ApiError::household_not_found(&household_id));
            }
            if !state.db.is_member(&household_id, &user_id)? {
                return Err(ApiError::not_member(&household_id));
            }
            new.household_id = Some(household_id);
            new.assigned_to = body.assigned_to;
        }
        TaskKind::Personal => {
            new.category = body.category;
        }
    }

    let task = state.db.create_task(new)?;
    Ok(Json(task))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    /// "group" or "personal".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub household_id: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let kind = query
        .kind
        .as_deref()
        .ok_or_else(|| ApiError::missing_field("type"))
        .and_then(|s| {
            TaskKind::from_str(s)
                .ok_or_else(|| ApiError::invalid_value("type", "type must be group or personal"))
        })?;

    let mut filter = TaskFilter {
        kind: Some(kind),
        ..TaskFilter::default()
    };

    match kind {
        TaskKind::Group => {
            let household_id = query
                .household_id
                .ok_or_else(|| ApiError::missing_field("householdId"))?;
            filter.household_id = Some(household_id);
        }
        TaskKind::Personal => {
            filter.owner_id = Some(user_id);
        }
    }

    if let Some(status) = query.status.as_deref().filter(|s| *s != "all") {
        filter.status = Some(
            TaskStatus::from_str(status)
                .ok_or_else(|| ApiError::invalid_value("status", "unknown status"))?,
        );
    }
    filter.category = query.category;

    let tasks = state.db.list_tasks(&filter)?;
    Ok(Json(tasks))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
    pub due_time: Option<String>,
    pub points: Option<i64>,
    pub shopping_list: Option<Vec<ShoppingItem>>,
    pub photo: Option<String>,
    /// "completed" toggles completion, "active" undoes it. "failed" is
    /// reserved for the deadline sweeper.
    pub status: Option<String>,
}

impl UpdateTaskRequest {
    fn has_field_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.category.is_some()
            || self.assigned_to.is_some()
            || self.due_date.is_some()
            || self.due_time.is_some()
            || self.points.is_some()
            || self.shopping_list.is_some()
    }
}

pub async fn update(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .db
        .get_task(&task_id)?
        .ok_or_else(|| ApiError::task_not_found(&task_id))?;
    authorize(&state, &task, &user_id)?;

    if let Some(ref due_time) = body.due_time
        && parse_due_time(due_time).is_none()
    {
        return Err(ApiError::invalid_value(
            "dueTime",
            "dueTime must be a valid HH:mm time",
        ));
    }

    if body.has_field_updates() {
        let update = TaskUpdate {
            title: body.title.clone(),
            description: body.description.clone().map(Some),
            category: body.category.clone().map(Some),
            assigned_to: body.assigned_to.clone().map(Some),
            due_date: body.due_date.map(Some),
            due_time: body.due_time.clone().map(Some),
            points: body.points,
            shopping_list: body.shopping_list.clone().map(stamp_items),
            photo: None,
        };
        state.db.update_task(&task_id, update)?;
    }

    match body.status.as_deref() {
        None => {
            // Photo without a status change still gets persisted.
            if body.photo.is_some() {
                state.db.update_task(
                    &task_id,
                    TaskUpdate {
                        photo: Some(body.photo.clone()),
                        ..TaskUpdate::default()
                    },
                )?;
            }
        }
        Some("completed") => {
            if task.status == TaskStatus::Failed {
                return Err(ApiError::invalid_state(
                    "task has failed its deadline and cannot be completed",
                ));
            }
            state.db.complete_task(&task_id, &user_id, body.photo.clone())?;
        }
        Some("active") => {
            if task.status == TaskStatus::Failed {
                return Err(ApiError::invalid_state("a failed task cannot be reopened"));
            }
            if task.status == TaskStatus::Completed {
                state.db.reopen_task(&task_id)?;
            }
        }
        Some("failed") => {
            return Err(ApiError::invalid_state(
                "tasks are failed by the deadline sweeper, not by request",
            ));
        }
        Some(_) => {
            return Err(ApiError::invalid_value("status", "unknown status"));
        }
    }

    let task = state
        .db
        .get_task(&task_id)?
        .ok_or_else(|| ApiError::task_not_found(&task_id))?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(task_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = state
        .db
        .get_task(&task_id)?
        .ok_or_else(|| ApiError::task_not_found(&task_id))?;
    authorize(&state, &task, &user_id)?;

    state.db.delete_task(&task_id)?;
    Ok(Json(serde_json::json!({ "message": "task deleted", "id": task_id })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub household_id: Option<String>,
}

pub async fn stats(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<TaskStats>> {
    let scope = match query.household_id {
        Some(household_id) => {
            if state.db.get_household(&household_id)?.is_none() {
                return Err(ApiError::household_not_found(&household_id));
            }
            StatsScope::Household(household_id)
        }
        None => StatsScope::Owner(user_id),
    };
    let stats = state.db.task_stats(&scope)?;
    Ok(Json(stats))
}

/// Personal tasks may only be touched by their owner; group tasks by any
/// household member.
fn authorize(state: &AppState, task: &Task, user_id: &str) -> ApiResult<()> {
    match task.kind {
        TaskKind::Personal => {
            if task.owner_id != user_id {
                return Err(ApiError::not_owner(&task.id));
            }
        }
        TaskKind::Group => {
            let household_id = task
                .household_id
                .as_deref()
                .ok_or_else(|| ApiError::internal("group task without household"))?;
            if !state.db.is_member(household_id, user_id)? {
                return Err(ApiError::not_member(household_id));
            }
        }
    }
    Ok(())
}

/// Stamp unset `addedAt` fields on incoming shopping list items.
fn stamp_items(items: Vec<ShoppingItem>) -> Vec<ShoppingItem> {
    let now = now_ms();
    items
        .into_iter()
        .map(|mut item| {
            if item.added_at == 0 {
                item.added_at = now;
            }
            item
        })
        .collect()
}
