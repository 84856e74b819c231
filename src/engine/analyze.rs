//! Member performance analysis and household ranking.
//!
//! Buckets a member's task history by category, scores each bucket with
//! enough data, and ranks members by overall completion rate. Everything
//! here is computed fresh from a task snapshot; nothing is persisted.

use super::categorize::Categorizer;
use super::score::Scorer;
use crate::types::{CategoryScore, MemberAnalysis, Task, TaskStatus};
use std::cmp::Ordering;

/// Analyze one member's full task history.
///
/// Categories with fewer than `min_category_tasks` tasks are excluded from
/// the category breakdown entirely; the overall stats always cover the whole
/// history. Returns `None` when the member has no tasks at all.
pub fn analyze_member(
    member_id: &str,
    member_name: &str,
    tasks: &[Task],
    categorizer: Categorizer,
    scorer: &dyn Scorer,
    min_category_tasks: usize,
) -> Option<MemberAnalysis> {
    if tasks.is_empty() {
        return None;
    }

    // Bucket by category, preserving first-seen order so ties in the score
    // sort stay deterministic.
    let mut buckets: Vec<(&'static str, Vec<Task>)> = Vec::new();
    for task in tasks {
        let key = categorizer.categorize(&task.title);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(task.clone()),
            None => buckets.push((key, vec![task.clone()])),
        }
    }

    let mut category_scores: Vec<CategoryScore> = Vec::new();
    for (key, bucket) in &buckets {
        if bucket.len() < min_category_tasks {
            continue;
        }
        let score = scorer.score(bucket);
        let completed = bucket
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count() as i64;
        let on_time = bucket
            .iter()
            .filter(|t| t.completed_on_time == Some(true))
            .count() as i64;
        category_scores.push(CategoryScore {
            category: key.to_string(),
            display_name: categorizer.display_name(key).to_string(),
            score: (score * 10.0).round() / 10.0,
            total_tasks: bucket.len() as i64,
            completed,
            completion_rate: percent(completed, bucket.len() as i64),
            on_time,
            on_time_rate: if completed > 0 {
                percent(on_time, completed)
            } else {
                0
            },
        });
    }

    category_scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    let top3 = category_scores.iter().take(3).cloned().collect();

    let total_completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count() as i64;

    Some(MemberAnalysis {
        member_id: member_id.to_string(),
        member_name: member_name.to_string(),
        rank: None,
        total_tasks: tasks.len() as i64,
        total_completed,
        overall_completion_rate: percent(total_completed, tasks.len() as i64),
        top3_strengths: top3,
        all_categories: category_scores,
    })
}

/// Order analyses by overall completion rate descending and assign 1-based
/// ranks. The sort is stable, so equal rates keep their input order.
pub fn rank_members(mut analyses: Vec<MemberAnalysis>) -> Vec<MemberAnalysis> {
    analyses.sort_by(|a, b| b.overall_completion_rate.cmp(&a.overall_completion_rate));
    for (i, analysis) in analyses.iter_mut().enumerate() {
        analysis.rank = Some(i as u32 + 1);
    }
    analyses
}

fn percent(part: i64, whole: i64) -> i64 {
    ((part as f64 / whole as f64) * 100.0).round() as i64
}
