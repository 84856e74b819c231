//! Structured error types for API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,
    InvalidState,

    // Identity / authorization
    Unauthorized,
    NotMember,
    NotOwner,

    // Not found
    UserNotFound,
    TaskNotFound,
    HouseholdNotFound,
    InvalidInviteCode,

    // Conflict
    AlreadyExists,

    // Internal
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status class for this code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFieldValue
            | ErrorCode::InvalidState => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotMember | ErrorCode::NotOwner => StatusCode::FORBIDDEN,
            ErrorCode::UserNotFound
            | ErrorCode::TaskNotFound
            | ErrorCode::HouseholdNotFound
            | ErrorCode::InvalidInviteCode => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error returned by API handlers.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "user identity is required")
    }

    pub fn not_member(household_id: &str) -> Self {
        Self::new(
            ErrorCode::NotMember,
            format!("not a member of household {}", household_id),
        )
    }

    pub fn not_owner(task_id: &str) -> Self {
        Self::new(
            ErrorCode::NotOwner,
            format!("not the owner of task {}", task_id),
        )
    }

    pub fn user_not_found(user_id: &str) -> Self {
        Self::new(ErrorCode::UserNotFound, format!("user not found: {}", user_id))
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("task not found: {}", task_id))
    }

    pub fn household_not_found(household_id: &str) -> Self {
        Self::new(
            ErrorCode::HouseholdNotFound,
            format!("household not found: {}", household_id),
        )
    }

    pub fn invalid_invite_code() -> Self {
        Self::new(ErrorCode::InvalidInviteCode, "invalid invite code")
    }

    pub fn already_exists(what: &str) -> Self {
        Self::new(ErrorCode::AlreadyExists, format!("{} already exists", what))
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::missing_field("title").code.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::task_not_found("t1").code.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::not_member("h1").code.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn anyhow_downcast_preserves_code() {
        let err: anyhow::Error = ApiError::task_not_found("t1").into();
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::TaskNotFound);
    }
}
