//! Task lifecycle transitions.
//!
//! Pure helpers that compute the field changes for each status transition;
//! the storage layer persists what these produce. Transitions:
//! active -> completed (user action), completed -> active (undo),
//! active -> failed (sweeper only, terminal).

use crate::types::{Task, TaskStatus};

/// Complete a task: stamp who and when, then derive the timing metrics.
///
/// `time_to_complete` is minutes from creation to completion, rounded.
/// `completed_on_time` is only set when the task has a deadline.
pub fn complete(task: &mut Task, completed_by: &str, now: i64) {
    task.status = TaskStatus::Completed;
    task.completed_at = Some(now);
    task.completed_by = Some(completed_by.to_string());
    task.time_to_complete = Some(((now - task.created_at) as f64 / 60_000.0).round() as i64);
    task.completed_on_time = task.deadline_ms().map(|deadline| now <= deadline);
    task.updated_at = now;
}

/// Undo a completion: back to active, all completion-derived fields cleared.
pub fn reopen(task: &mut Task, now: i64) {
    task.status = TaskStatus::Active;
    task.completed_at = None;
    task.completed_by = None;
    task.time_to_complete = None;
    task.completed_on_time = None;
    task.updated_at = now;
}

/// Whether an active task's deadline has passed.
pub fn is_overdue(task: &Task, now: i64) -> bool {
    task.status == TaskStatus::Active && task.deadline_ms().is_some_and(|deadline| now > deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskKind;
    use chrono::NaiveDate;

    fn base_task(created_at: i64) -> Task {
        Task {
            id: "t1".into(),
            title: "Take out trash".into(),
            description: None,
            kind: TaskKind::Personal,
            household_id: None,
            assigned_to: None,
            owner_id: "u1".into(),
            category: None,
            status: TaskStatus::Active,
            due_date: None,
            due_time: None,
            points: 0,
            shopping_list: vec![],
            photo: None,
            completed_at: None,
            completed_by: None,
            time_to_complete: None,
            completed_on_time: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn complete_derives_minutes_and_on_time() {
        let t0 = 1_700_000_000_000;
        let mut task = base_task(t0);
        // Deadline far in the future, so completion is on time.
        task.due_date = NaiveDate::from_ymd_opt(2099, 1, 1);
        task.due_time = Some("09:00".into());

        // 20 hours later
        complete(&mut task, "u2", t0 + 20 * 60 * 60 * 1000);

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_by.as_deref(), Some("u2"));
        assert_eq!(task.time_to_complete, Some(1200));
        assert_eq!(task.completed_on_time, Some(true));
    }

    #[test]
    fn complete_after_deadline_is_late() {
        let t0 = 1_700_000_000_000;
        let mut task = base_task(t0);
        task.due_date = NaiveDate::from_ymd_opt(2000, 1, 1);

        complete(&mut task, "u1", t0 + 60_000);

        assert_eq!(task.completed_on_time, Some(false));
    }

    #[test]
    fn complete_without_deadline_leaves_on_time_unset() {
        let t0 = 1_700_000_000_000;
        let mut task = base_task(t0);

        complete(&mut task, "u1", t0 + 90_000);

        assert_eq!(task.time_to_complete, Some(2)); // 1.5 min rounds to 2
        assert_eq!(task.completed_on_time, None);
    }

    #[test]
    fn reopen_clears_completion_fields() {
        let t0 = 1_700_000_000_000;
        let mut task = base_task(t0);
        task.due_date = NaiveDate::from_ymd_opt(2099, 1, 1);
        complete(&mut task, "u1", t0 + 1200 * 60_000);

        reopen(&mut task, t0 + 1300 * 60_000);

        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.completed_by, None);
        assert_eq!(task.time_to_complete, None);
        assert_eq!(task.completed_on_time, None);
    }

    #[test]
    fn overdue_requires_active_and_past_deadline() {
        let t0 = 1_700_000_000_000;
        let mut task = base_task(t0);
        assert!(!is_overdue(&task, t0)); // no deadline

        task.due_date = NaiveDate::from_ymd_opt(2000, 1, 1);
        assert!(is_overdue(&task, t0));

        complete(&mut task, "u1", t0);
        assert!(!is_overdue(&task, t0)); // completed tasks never go overdue
    }
}
