//! Performance scoring.
//!
//! Scores an ordered task sequence (creation time ascending, one member,
//! usually one category) on a 0-100 scale from four weighted sub-metrics:
//! completion rate, on-time rate, speed efficiency and consistency.

use crate::types::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// Sub-metric weights. The defaults sum to 100 so each rate in [0, 1]
/// contributes its weight directly to the final score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub completion: f64,
    pub on_time: f64,
    pub speed: f64,
    pub consistency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completion: 40.0,
            on_time: 30.0,
            speed: 20.0,
            consistency: 10.0,
        }
    }
}

/// Scoring behavior, passed in explicitly wherever scores are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Completion slower than this many hours scores zero on speed.
    pub speed_horizon_hours: f64,
    /// Categories with fewer tasks than this are excluded from analysis.
    pub min_category_tasks: usize,
    /// Number of chunks the sequence is split into for the consistency
    /// sub-metric; sequences shorter than this score zero on it.
    pub consistency_chunks: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            speed_horizon_hours: 48.0,
            min_category_tasks: 3,
            consistency_chunks: 4,
        }
    }
}

/// A scoring strategy: task sequence in, score in [0, 100] out.
///
/// The deterministic [`WeightedScorer`] is the authoritative implementation;
/// the trait is the seam an alternate strategy would plug into.
pub trait Scorer {
    fn score(&self, tasks: &[Task]) -> f64;
}

/// The deterministic multi-metric scorer.
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: ScoreWeights,
    speed_horizon_hours: f64,
    chunks: usize,
}

impl WeightedScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            speed_horizon_hours: config.speed_horizon_hours,
            chunks: config.consistency_chunks,
        }
    }

    /// Fraction of the sequence that is completed.
    pub fn completion_rate(&self, tasks: &[Task]) -> f64 {
        if tasks.is_empty() {
            return 0.0;
        }
        completed_count(tasks) as f64 / tasks.len() as f64
    }

    /// Among completed tasks, the fraction completed at or before the
    /// deadline. Zero when nothing is completed.
    pub fn on_time_rate(&self, tasks: &[Task]) -> f64 {
        let completed = completed_count(tasks);
        if completed == 0 {
            return 0.0;
        }
        let on_time = tasks
            .iter()
            .filter(|t| t.completed_on_time == Some(true))
            .count();
        on_time as f64 / completed as f64
    }

    /// Average speed of on-time completions: 1.0 for instant, 0.0 at the
    /// horizon (48h by default) or beyond. Late completions and tasks
    /// without timing data are excluded from the average, not counted as
    /// zero.
    pub fn speed_score(&self, tasks: &[Task]) -> f64 {
        let samples: Vec<f64> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed && t.completed_on_time == Some(true))
            .filter_map(|t| t.time_to_complete)
            .map(|minutes| {
                let hours = minutes as f64 / 60.0;
                (1.0 - hours / self.speed_horizon_hours).max(0.0)
            })
            .collect();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// How evenly completions are spread over the sequence.
    ///
    /// The sequence is split in creation order into `chunks` contiguous
    /// chunks of size floor(n/chunks), the last chunk absorbing the
    /// remainder. The score is `max(0, 1 - 2 * variance)` of the chunk
    /// completion rates (population variance). Zero for sequences shorter
    /// than `chunks`.
    pub fn consistency_score(&self, tasks: &[Task]) -> f64 {
        let n = tasks.len();
        if n < self.chunks {
            return 0.0;
        }
        let chunk_size = n / self.chunks;
        let mut rates = Vec::with_capacity(self.chunks);
        for i in 0..self.chunks {
            let start = i * chunk_size;
            let end = if i == self.chunks - 1 {
                n
            } else {
                start + chunk_size
            };
            let chunk = &tasks[start..end];
            rates.push(completed_count(chunk) as f64 / chunk.len() as f64);
        }
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        let variance =
            rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / rates.len() as f64;
        (1.0 - variance * 2.0).max(0.0)
    }
}

impl Scorer for WeightedScorer {
    fn score(&self, tasks: &[Task]) -> f64 {
        if tasks.is_empty() {
            return 0.0;
        }
        self.completion_rate(tasks) * self.weights.completion
            + self.on_time_rate(tasks) * self.weights.on_time
            + self.speed_score(tasks) * self.weights.speed
            + self.consistency_score(tasks) * self.weights.consistency
    }
}

fn completed_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count()
}
