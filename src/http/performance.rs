//! Performance analysis endpoints.

use super::{AppState, UserId};
use crate::error::{ApiError, ApiResult};
use crate::performance::PerformanceService;
use crate::types::{HouseholdRanking, MemberAnalysis};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceQuery {
    pub household_id: Option<String>,
}

/// One member's category strengths and overall stats. Responds with JSON
/// `null` when the member has no task history; absence of data is not an
/// error.
pub async fn member(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Path(member_id): Path<String>,
    Query(query): Query<PerformanceQuery>,
) -> ApiResult<Json<Option<MemberAnalysis>>> {
    let household_id = query
        .household_id
        .ok_or_else(|| ApiError::missing_field("householdId"))?;
    if state.db.get_household(&household_id)?.is_none() {
        return Err(ApiError::household_not_found(&household_id));
    }
    let member = state
        .db
        .get_user(&member_id)?
        .ok_or_else(|| ApiError::user_not_found(&member_id))?;

    let service = PerformanceService::new(&state.db, &state.config);
    let analysis = service.analyze_member(&household_id, &member.id, &member.name)?;
    Ok(Json(analysis))
}

/// Household ranking by overall completion rate, freshly computed.
pub async fn ranking(
    State(state): State<AppState>,
    UserId(_user_id): UserId,
    Query(query): Query<PerformanceQuery>,
) -> ApiResult<Json<HouseholdRanking>> {
    let household_id = query
        .household_id
        .ok_or_else(|| ApiError::missing_field("householdId"))?;

    let service = PerformanceService::new(&state.db, &state.config);
    let ranking = service
        .rank_household(&household_id)?
        .ok_or_else(|| ApiError::household_not_found(&household_id))?;
    Ok(Json(ranking))
}
