//! Performance analysis service.
//!
//! Wires the pure engine over the storage layer: fetches task snapshots,
//! runs the categorizer and scorer per member, and assembles household
//! rankings. Built explicitly from configuration; there is no shared
//! mutable scoring state.

use crate::config::Config;
use crate::db::Database;
use crate::engine::{self, Categorizer, WeightedScorer};
use crate::types::{HouseholdRanking, MemberAnalysis};
use anyhow::Result;
use chrono::Utc;

pub struct PerformanceService<'a> {
    db: &'a Database,
    categorizer: Categorizer,
    scorer: WeightedScorer,
    min_category_tasks: usize,
}

impl<'a> PerformanceService<'a> {
    pub fn new(db: &'a Database, config: &Config) -> Self {
        Self {
            db,
            categorizer: config.categorizer,
            scorer: WeightedScorer::new(&config.scoring),
            min_category_tasks: config.scoring.min_category_tasks,
        }
    }

    /// Analyze one member's performance within a household.
    ///
    /// `Ok(None)` means the member has no task history; that is data
    /// absence, not an error.
    pub fn analyze_member(
        &self,
        household_id: &str,
        member_id: &str,
        member_name: &str,
    ) -> Result<Option<MemberAnalysis>> {
        let history = self.db.member_task_history(household_id, member_id)?;
        Ok(engine::analyze_member(
            member_id,
            member_name,
            &history,
            self.categorizer,
            &self.scorer,
            self.min_category_tasks,
        ))
    }

    /// Rank all household members by overall completion rate. Members with
    /// no tasks are omitted. `Ok(None)` when the household does not exist.
    pub fn rank_household(&self, household_id: &str) -> Result<Option<HouseholdRanking>> {
        let Some(household) = self.db.get_household(household_id)? else {
            return Ok(None);
        };

        let mut analyses = Vec::new();
        for member in self.db.household_members(household_id)? {
            if let Some(analysis) = self.analyze_member(household_id, &member.id, &member.name)? {
                analyses.push(analysis);
            }
        }

        Ok(Some(HouseholdRanking {
            household_id: household.id,
            household_name: household.name,
            members: engine::rank_members(analyses),
            generated_at: Utc::now().to_rfc3339(),
        }))
    }
}
