//! Sample data generation.
//!
//! Backfills a household with a few weeks of realistic chore history per
//! member so the scoring and ranking endpoints have something to chew on.
//! Each member gets a random reliability level, so the generated ranking
//! has an actual spread.

use crate::db::{Database, now_ms};
use crate::engine::lifecycle;
use crate::types::{Task, TaskKind, TaskStatus};
use anyhow::{Result, anyhow, bail};
use chrono::{Local, TimeZone};
use rand::Rng;
use uuid::Uuid;

const WEEK_MS: i64 = 7 * 24 * 3600 * 1000;
const HOUR_MS: i64 = 3600 * 1000;

struct ChoreProfile {
    titles: &'static [&'static str],
    /// Average occurrences per member per week.
    weekly_frequency: f64,
    /// Deadline this many hours after creation.
    deadline_hours: i64,
    points: i64,
}

const CHORE_PROFILES: &[ChoreProfile] = &[
    ChoreProfile {
        titles: &[
            "Grocery shopping Lidl",
            "Shopping at Kaufland",
            "Farmers market",
            "Weekly groceries",
        ],
        weekly_frequency: 1.0,
        deadline_hours: 48,
        points: 15,
    },
    ChoreProfile {
        titles: &[
            "Take out trash",
            "Empty trash bins",
            "Take out recycling",
            "Take out glass",
        ],
        weekly_frequency: 3.5,
        deadline_hours: 12,
        points: 5,
    },
    ChoreProfile {
        titles: &["Vacuum living room", "Vacuum bedroom", "Vacuum entire house"],
        weekly_frequency: 0.7,
        deadline_hours: 72,
        points: 10,
    },
    ChoreProfile {
        titles: &["Dust surfaces", "Dust and vacuum", "Clean surfaces"],
        weekly_frequency: 0.5,
        deadline_hours: 72,
        points: 8,
    },
    ChoreProfile {
        titles: &[
            "Clean living room windows",
            "Clean all windows",
            "Windows and mirrors",
        ],
        weekly_frequency: 0.3,
        deadline_hours: 96,
        points: 12,
    },
    ChoreProfile {
        titles: &["Clean bathroom", "Bathroom and toilet", "Deep clean bathroom"],
        weekly_frequency: 0.5,
        deadline_hours: 72,
        points: 12,
    },
    ChoreProfile {
        titles: &["Start dishwasher", "Load dishwasher", "Run dishwasher"],
        weekly_frequency: 2.5,
        deadline_hours: 6,
        points: 3,
    },
    ChoreProfile {
        titles: &["Unload dishwasher", "Empty dishwasher", "Put dishes away"],
        weekly_frequency: 2.5,
        deadline_hours: 8,
        points: 3,
    },
    ChoreProfile {
        titles: &["Prepare breakfast", "Make breakfast", "Coffee and breakfast"],
        weekly_frequency: 2.0,
        deadline_hours: 3,
        points: 5,
    },
    ChoreProfile {
        titles: &["Cook lunch", "Prepare lunch", "Make lunch"],
        weekly_frequency: 1.5,
        deadline_hours: 5,
        points: 8,
    },
    ChoreProfile {
        titles: &["Cook dinner", "Prepare dinner", "Make dinner"],
        weekly_frequency: 2.0,
        deadline_hours: 6,
        points: 10,
    },
    ChoreProfile {
        titles: &["Start laundry", "Run washing machine", "Do laundry"],
        weekly_frequency: 1.5,
        deadline_hours: 24,
        points: 5,
    },
    ChoreProfile {
        titles: &["Hang laundry to dry", "Take out laundry", "Hang clothes"],
        weekly_frequency: 1.5,
        deadline_hours: 12,
        points: 5,
    },
];

/// Generate `weeks` of backdated task history for every household member.
/// Returns the number of tasks created.
pub fn seed_household(db: &Database, household_id: &str, weeks: u32) -> Result<u32> {
    let household = db
        .get_household(household_id)?
        .ok_or_else(|| anyhow!("household not found: {}", household_id))?;
    let members = db.household_members(household_id)?;
    if members.is_empty() {
        bail!("household {} has no members", household_id);
    }

    let mut rng = rand::thread_rng();
    let now = now_ms();
    let mut created = 0u32;

    for member in &members {
        // How likely this member is to finish a chore at all.
        let reliability: f64 = rng.gen_range(0.55..0.95);

        for profile in CHORE_PROFILES {
            for week in 0..weeks {
                let mut occurrences = profile.weekly_frequency.trunc() as u32;
                if rng.gen_bool(profile.weekly_frequency.fract()) {
                    occurrences += 1;
                }

                for _ in 0..occurrences {
                    let week_start = now - i64::from(week + 1) * WEEK_MS;
                    let created_at = week_start + rng.gen_range(0..WEEK_MS);
                    let deadline_at = created_at + profile.deadline_hours * HOUR_MS;
                    let title = profile.titles[rng.gen_range(0..profile.titles.len())];

                    let mut task = make_task(&household.id, &member.id, title, created_at);
                    task.points = profile.points;
                    if let Some(local) = Local.timestamp_millis_opt(deadline_at).single() {
                        task.due_date = Some(local.date_naive());
                        task.due_time = Some(local.format("%H:%M").to_string());
                    }

                    if rng.gen_bool(reliability) {
                        // Completed somewhere in (or slightly past) the
                        // deadline window; >1.0 means a late completion.
                        let window = deadline_at - created_at;
                        let frac: f64 = rng.gen_range(0.05..1.25);
                        let completed_at =
                            (created_at + (window as f64 * frac) as i64).min(now);
                        lifecycle::complete(&mut task, &member.id, completed_at);
                    } else if deadline_at < now {
                        // What the sweeper would have done by now.
                        task.status = TaskStatus::Failed;
                    }

                    db.insert_task(&task)?;
                    created += 1;
                }
            }
        }
    }

    Ok(created)
}

fn make_task(household_id: &str, member_id: &str, title: &str, created_at: i64) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: None,
        kind: TaskKind::Group,
        household_id: Some(household_id.to_string()),
        assigned_to: Some(member_id.to_string()),
        owner_id: member_id.to_string(),
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
