//! Integration tests for the storage layer, using an in-memory SQLite
//! database.

use choreboard::config::Config;
use choreboard::db::tasks::{NewTask, TaskFilter, TaskUpdate};
use choreboard::db::{Database, now_ms};
use choreboard::performance::PerformanceService;
use choreboard::types::{Household, Task, TaskKind, TaskStatus, User};
use chrono::{Days, Local};
use uuid::Uuid;

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn make_user(db: &Database, name: &str) -> User {
    db.create_user(name, &format!("{}@example.com", name))
        .expect("Failed to create user")
}

fn make_household(db: &Database, owner: &User) -> Household {
    db.create_household("The Flat", None, &owner.id)
        .expect("Failed to create household")
}

fn personal_task(db: &Database, owner: &User, title: &str) -> Task {
    db.create_task(NewTask {
        title: title.to_string(),
        owner_id: owner.id.clone(),
        kind: Some(TaskKind::Personal),
        ..NewTask::default()
    })
    .expect("Failed to create task")
}

/// Build a group task value with explicit timestamps, the way the seeder
/// does. The caller inserts it.
fn group_task(household: &Household, member: &User, title: &str, created_at: i64) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: None,
        kind: TaskKind::Group,
        household_id: Some(household.id.clone()),
        assigned_to: Some(member.id.clone()),
        owner_id: member.id.clone(),
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

mod user_tests {
    use super::*;

    #[test]
    fn create_and_get_user() {
        let db = setup_db();
        let user = make_user(&db, "ada");

        let found = db.get_user(&user.id).unwrap();
        assert_eq!(found.unwrap().name, "ada");
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = setup_db();
        make_user(&db, "ada");

        let result = db.create_user("other", "ada@example.com");
        assert!(result.is_err());
    }

    #[test]
    fn get_unknown_user_returns_none() {
        let db = setup_db();
        assert!(db.get_user("nope").unwrap().is_none());
    }
}

mod household_tests {
    use super::*;

    #[test]
    fn create_generates_invite_code_and_adds_owner() {
        let db = setup_db();
        let owner = make_user(&db, "ada");
        let hh = make_household(&db, &owner);

        // XXX-NNN-XXX
        let parts: Vec<&str> = hh.invite_code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 3);
        assert_eq!(parts[1].len(), 3);

        let members = db.household_members(&hh.id).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, owner.id);
    }

    #[test]
    fn join_by_code_is_idempotent_and_case_insensitive() {
        let db = setup_db();
        let owner = make_user(&db, "ada");
        let joiner = make_user(&db, "grace");
        let hh = make_household(&db, &owner);

        let joined = db
            .join_household(&hh.invite_code.to_lowercase(), &joiner.id)
            .unwrap();
        assert_eq!(joined.unwrap().id, hh.id);

        // Joining again changes nothing.
        db.join_household(&hh.invite_code, &joiner.id).unwrap();
        assert_eq!(db.household_members(&hh.id).unwrap().len(), 2);
    }

    #[test]
    fn join_with_bad_code_returns_none() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        assert!(db.join_household("ZZZ-999-ZZZ", &user.id).unwrap().is_none());
    }

    #[test]
    fn members_are_listed_in_join_order() {
        let db = setup_db();
        let owner = make_user(&db, "ada");
        let hh = make_household(&db, &owner);
        for name in ["grace", "edsger"] {
            let user = make_user(&db, name);
            std::thread::sleep(std::time::Duration::from_millis(5));
            db.join_household(&hh.invite_code, &user.id).unwrap();
        }

        let names: Vec<String> = db
            .household_members(&hh.id)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["ada", "grace", "edsger"]);
    }

    #[test]
    fn is_member_checks_membership() {
        let db = setup_db();
        let owner = make_user(&db, "ada");
        let outsider = make_user(&db, "mallory");
        let hh = make_household(&db, &owner);

        assert!(db.is_member(&hh.id, &owner.id).unwrap());
        assert!(!db.is_member(&hh.id, &outsider.id).unwrap());
    }

    #[test]
    fn households_for_user_lists_memberships() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        make_household(&db, &user);
        make_household(&db, &user);

        assert_eq!(db.households_for_user(&user.id).unwrap().len(), 2);
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn new_task_starts_active_without_completion_fields() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");

        assert_eq!(task.status, TaskStatus::Active);
        assert!(task.completed_at.is_none());
        assert!(task.completed_by.is_none());
        assert!(task.time_to_complete.is_none());
        assert!(task.completed_on_time.is_none());
    }

    #[test]
    fn complete_sets_all_completion_fields() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");

        let done = db.complete_task(&task.id, &user.id, None).unwrap();

        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.completed_by.as_deref(), Some(user.id.as_str()));
        assert!(done.time_to_complete.is_some());
        // No deadline, so the on-time flag stays unset.
        assert!(done.completed_on_time.is_none());
    }

    #[test]
    fn complete_with_future_deadline_is_on_time() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let mut task = personal_task(&db, &user, "Water the plants");
        task = db
            .update_task(
                &task.id,
                TaskUpdate {
                    due_date: Some(Local::now().date_naive().checked_add_days(Days::new(1))),
                    due_time: Some(Some("09:00".to_string())),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();

        let done = db.complete_task(&task.id, &user.id, None).unwrap();
        assert_eq!(done.completed_on_time, Some(true));
    }

    #[test]
    fn complete_twice_is_a_noop() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");

        let first = db.complete_task(&task.id, &user.id, None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = db.complete_task(&task.id, &user.id, None).unwrap();

        assert_eq!(first.completed_at, second.completed_at);
    }

    #[test]
    fn reopen_clears_completion_fields() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");
        db.complete_task(&task.id, &user.id, None).unwrap();

        let reopened = db.reopen_task(&task.id).unwrap();

        assert_eq!(reopened.status, TaskStatus::Active);
        assert!(reopened.completed_at.is_none());
        assert!(reopened.completed_by.is_none());
        assert!(reopened.time_to_complete.is_none());
        assert!(reopened.completed_on_time.is_none());

        // And the cleared state is what was persisted.
        let stored = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Active);
        assert!(stored.completed_at.is_none());
    }

    #[test]
    fn failed_tasks_cannot_be_completed_or_reopened() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");
        db.update_task(
            &task.id,
            TaskUpdate {
                due_date: Some(Local::now().date_naive().checked_sub_days(Days::new(2))),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 1);

        assert!(db.complete_task(&task.id, &user.id, None).is_err());
        assert!(db.reopen_task(&task.id).is_err());
    }

    #[test]
    fn update_changes_fields_but_not_status() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "Water the plants");

        let updated = db
            .update_task(
                &task.id,
                TaskUpdate {
                    title: Some("Water all the plants".to_string()),
                    points: Some(7),
                    category: Some(Some("garden".to_string())),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Water all the plants");
        assert_eq!(updated.points, 7);
        assert_eq!(updated.category.as_deref(), Some("garden"));
        assert_eq!(updated.status, TaskStatus::Active);
    }

    #[test]
    fn list_filters_by_status_and_kind() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let t1 = personal_task(&db, &user, "one");
        personal_task(&db, &user, "two");
        db.complete_task(&t1.id, &user.id, None).unwrap();

        let completed = db
            .list_tasks(&TaskFilter {
                kind: Some(TaskKind::Personal),
                owner_id: Some(user.id.clone()),
                status: Some(TaskStatus::Completed),
                ..TaskFilter::default()
            })
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "one");
    }

    #[test]
    fn member_history_is_ordered_by_creation_ascending() {
        let db = setup_db();
        let owner = make_user(&db, "ada");
        let hh = make_household(&db, &owner);
        let t0 = now_ms();
        // Insert out of order
        db.insert_task(&group_task(&hh, &owner, "second", t0 - 1000)).unwrap();
        db.insert_task(&group_task(&hh, &owner, "third", t0)).unwrap();
        db.insert_task(&group_task(&hh, &owner, "first", t0 - 2000)).unwrap();

        let titles: Vec<String> = db
            .member_task_history(&hh.id, &owner.id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn delete_removes_the_task() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "gone soon");

        assert!(db.delete_task(&task.id).unwrap());
        assert!(db.get_task(&task.id).unwrap().is_none());
        assert!(!db.delete_task(&task.id).unwrap());
    }
}

mod sweeper_tests {
    use super::*;

    fn overdue_task(db: &Database, user: &User, title: &str) -> Task {
        let task = personal_task(db, user, title);
        db.update_task(
            &task.id,
            TaskUpdate {
                due_date: Some(Local::now().date_naive().checked_sub_days(Days::new(1))),
                ..TaskUpdate::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn sweep_fails_overdue_active_tasks() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let overdue = overdue_task(&db, &user, "too late");
        // Due in the future: untouched.
        let task = personal_task(&db, &user, "still fine");
        db.update_task(
            &task.id,
            TaskUpdate {
                due_date: Some(Local::now().date_naive().checked_add_days(Days::new(1))),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
        // No deadline at all: untouched.
        personal_task(&db, &user, "open ended");

        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 1);

        assert_eq!(
            db.get_task(&overdue.id).unwrap().unwrap().status,
            TaskStatus::Failed
        );
        assert_eq!(
            db.get_task(&task.id).unwrap().unwrap().status,
            TaskStatus::Active
        );
    }

    #[test]
    fn sweep_is_idempotent() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        overdue_task(&db, &user, "too late");

        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 1);
        // Second pass with no intervening changes finds nothing new.
        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 0);
    }

    #[test]
    fn sweep_never_touches_completed_tasks() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = overdue_task(&db, &user, "done before the sweep");
        db.complete_task(&task.id, &user.id, None).unwrap();

        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 0);
        assert_eq!(
            db.get_task(&task.id).unwrap().unwrap().status,
            TaskStatus::Completed
        );
    }

    #[test]
    fn sweep_respects_the_given_instant() {
        let db = setup_db();
        let user = make_user(&db, "ada");
        let task = personal_task(&db, &user, "due tomorrow morning");
        db.update_task(
            &task.id,
            TaskUpdate {
                due_date: Some(Local::now().date_naive().checked_add_days(Days::new(1))),
                due_time: Some(Some("09:00".to_string())),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

        // Not overdue now, but overdue two days from now.
        assert_eq!(db.sweep_overdue(now_ms()).unwrap(), 0);
        let in_two_days = now_ms() + 2 * 24 * 3600 * 1000;
        assert_eq!(db.sweep_overdue(in_two_days).unwrap(), 1);
    }
}

mod stats_tests {
    use super::*;
    use choreboard::db::stats::StatsScope;

    #[test]
    fn owner_scope_counts_and_points() {
        let db = setup_db();
        let user = make_user(&db, "ada");

        let t1 = db
            .create_task(NewTask {
                title: "one".into(),
                owner_id: user.id.clone(),
                points: 10,
                ..NewTask::default()
            })
            .unwrap();
        db.complete_task(&t1.id, &user.id, None).unwrap();

        // Active, due today.
        let t2 = personal_task(&db, &user, "due today");
        db.update_task(
            &t2.id,
            TaskUpdate {
                due_date: Some(Some(Local::now().date_naive())),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

        personal_task(&db, &user, "someday");

        let stats = db.task_stats(&StatsScope::Owner(user.id.clone())).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.today, 1);
        // Only completed tasks pay out points.
        assert_eq!(stats.points, 10);
    }
}

mod performance_tests {
    use super::*;
    use choreboard::engine::lifecycle;

    /// Build a member history: `done` of `total` trash tasks completed on
    /// time, the rest failed.
    fn build_history(db: &Database, hh: &Household, member: &User, total: usize, done: usize) {
        let t0 = now_ms() - 30 * 24 * 3600 * 1000;
        for i in 0..total {
            let mut task =
                group_task(hh, member, "Take out trash", t0 + (i as i64) * 3600 * 1000);
            if i < done {
                task.due_date = chrono::NaiveDate::from_ymd_opt(2099, 1, 1);
                let completed_at = task.created_at + 60_000;
                lifecycle::complete(&mut task, &member.id, completed_at);
            } else {
                task.status = TaskStatus::Failed;
            }
            db.insert_task(&task).unwrap();
        }
    }

    #[test]
    fn ranking_orders_members_and_skips_empty_histories() {
        let db = setup_db();
        let ada = make_user(&db, "ada");
        let grace = make_user(&db, "grace");
        let idle = make_user(&db, "idle");
        let hh = make_household(&db, &ada);
        db.join_household(&hh.invite_code, &grace.id).unwrap();
        db.join_household(&hh.invite_code, &idle.id).unwrap();

        build_history(&db, &hh, &ada, 10, 7);
        build_history(&db, &hh, &grace, 10, 9);

        let config = Config::default();
        let service = PerformanceService::new(&db, &config);
        let ranking = service.rank_household(&hh.id).unwrap().unwrap();

        assert_eq!(ranking.household_id, hh.id);
        // The member with no tasks is omitted entirely.
        assert_eq!(ranking.members.len(), 2);
        assert_eq!(ranking.members[0].member_name, "grace");
        assert_eq!(ranking.members[0].rank, Some(1));
        assert_eq!(ranking.members[0].overall_completion_rate, 90);
        assert_eq!(ranking.members[1].member_name, "ada");
        assert_eq!(ranking.members[1].rank, Some(2));
    }

    #[test]
    fn unknown_household_yields_no_ranking() {
        let db = setup_db();
        let config = Config::default();
        let service = PerformanceService::new(&db, &config);
        assert!(service.rank_household("nope").unwrap().is_none());
    }

    #[test]
    fn member_analysis_includes_category_strengths() {
        let db = setup_db();
        let ada = make_user(&db, "ada");
        let hh = make_household(&db, &ada);
        build_history(&db, &hh, &ada, 5, 5);

        let config = Config::default();
        let service = PerformanceService::new(&db, &config);
        let analysis = service
            .analyze_member(&hh.id, &ada.id, &ada.name)
            .unwrap()
            .unwrap();

        assert_eq!(analysis.total_tasks, 5);
        assert_eq!(analysis.overall_completion_rate, 100);
        assert_eq!(analysis.all_categories.len(), 1);
        assert_eq!(analysis.all_categories[0].category, "trash");
        assert_eq!(analysis.top3_strengths.len(), 1);
    }

    #[test]
    fn member_without_tasks_has_no_analysis() {
        let db = setup_db();
        let ada = make_user(&db, "ada");
        let hh = make_household(&db, &ada);

        let config = Config::default();
        let service = PerformanceService::new(&db, &config);
        assert!(
            service
                .analyze_member(&hh.id, &ada.id, &ada.name)
                .unwrap()
                .is_none()
        );
    }
}
