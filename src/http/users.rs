//! User registration.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::User;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("name"))?;
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_field("email"))?;

    let user = state.db.create_user(name, email).map_err(|e| {
        if e.to_string().contains("already exists") {
            ApiError::already_exists("user")
        } else {
            ApiError::database(e)
        }
    })?;

    Ok(Json(user))
}
