//! The performance-scoring and deadline engine.
//!
//! Pure, CPU-bound computation: title categorization, deadline math,
//! lifecycle transition helpers, multi-metric scoring and member ranking.
//! Storage access lives in [`crate::db`]; these modules never do I/O.

pub mod analyze;
pub mod categorize;
pub mod deadline;
pub mod lifecycle;
pub mod score;

pub use analyze::{analyze_member, rank_members};
pub use categorize::Categorizer;
pub use deadline::{parse_due_time, resolve_deadline, resolve_deadline_ms};
pub use score::{Scorer, ScoreWeights, ScoringConfig, WeightedScorer};
