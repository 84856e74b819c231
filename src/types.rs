//! Core types for the choreboard backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task ownership kind: shared household task or individual task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Group,
    Personal,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Group => "group",
            TaskKind::Personal => "personal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "group" => Some(TaskKind::Group),
            "personal" => Some(TaskKind::Personal),
            _ => None,
        }
    }
}

/// Task lifecycle state.
///
/// `Active` is the initial state. `Completed` is reachable from `Active` and
/// can be undone back to `Active`. `Failed` is entered only by the deadline
/// sweeper and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TaskStatus::Active),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }
}

/// An entry on a task's shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub item: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub added_at: i64,
}

/// A household task.
///
/// Invariant: `completed_at`, `completed_by` and `time_to_complete` are set
/// if and only if `status == Completed`. `completed_on_time` is additionally
/// `None` for tasks that never had a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: TaskKind,

    // Group tasks belong to a household and may be assigned to a member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    // Personal tasks carry a free-text category instead.
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Deadline time of day, "HH:mm". Only meaningful with `due_date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,

    pub points: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shopping_list: Vec<ShoppingItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    // Completion tracking, set on the transition into Completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    /// Minutes from creation to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_complete: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on_time: Option<bool>,

    pub created_at: i64,
    pub updated_at: i64,
}

/// A household: a group of members sharing tasks, joined via invite code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub invite_code: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Member projection: the scoring layer only needs id and display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: i64,
}

/// Per-category performance breakdown for one member.
///
/// `score` is rounded to one decimal, the rates to whole percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub display_name: String,
    pub score: f64,
    pub total_tasks: i64,
    pub completed: i64,
    pub completion_rate: i64,
    pub on_time: i64,
    pub on_time_rate: i64,
}

/// Full performance analysis for one member, computed fresh from the task
/// snapshot on every request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAnalysis {
    pub member_id: String,
    pub member_name: String,
    /// 1-based position in the household ranking; absent outside a ranking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub total_tasks: i64,
    pub total_completed: i64,
    pub overall_completion_rate: i64,
    pub top3_strengths: Vec<CategoryScore>,
    pub all_categories: Vec<CategoryScore>,
}

/// Household-wide ranking of members by overall completion rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRanking {
    pub household_id: String,
    pub household_name: String,
    pub members: Vec<MemberAnalysis>,
    pub generated_at: String,
}

/// Aggregate task counts for a dashboard view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed: i64,
    pub total: i64,
    pub today: i64,
    pub points: i64,
}
