//! Household creation, joining and listing.

use super::{AppState, UserId};
use crate::error::{ApiError, ApiResult};
use crate::types::Household;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateHouseholdRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<CreateHouseholdRequest>,
) -> ApiResult<Json<Household>> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("name"))?;

    if state.db.get_user(&user_id)?.is_none() {
        return Err(ApiError::user_not_found(&user_id));
    }

    let household = state
        .db
        .create_household(name, body.address.as_deref(), &user_id)?;
    Ok(Json(household))
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub code: Option<String>,
}

pub async fn join(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<JoinRequest>,
) -> ApiResult<Json<Household>> {
    let code = body
        .code
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("code"))?;

    if state.db.get_user(&user_id)?.is_none() {
        return Err(ApiError::user_not_found(&user_id));
    }

    let household = state
        .db
        .join_household(code, &user_id)?
        .ok_or_else(ApiError::invalid_invite_code)?;
    Ok(Json(household))
}

pub async fn mine(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Vec<Household>>> {
    let households = state.db.households_for_user(&user_id)?;
    Ok(Json(households))
}
