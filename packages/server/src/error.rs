use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::Mood;
use sea_orm::DbErr;
use serde::Serialize;

use crate::services::protection::DenialReason;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `REQUEST_BLOCKED`, `USER_NOT_FOUND`, `INVALID_MOOD`,
    /// `NOT_FOUND`, `CONFLICT`, `RATE_LIMITED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    /// Request refused by the abuse-protection screen (automated client).
    RequestBlocked,
    /// Token subject has no provisioned account.
    UserNotFound,
    /// Submitted mood key is outside the catalog. Contains the offending key.
    InvalidMood(String),
    NotFound(String),
    Conflict(String),
    /// Rate limit exceeded. Contains the tokens left in the bucket and
    /// seconds until retry is allowed.
    RateLimited {
        remaining: u32,
        retry_after: u64,
    },
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::RequestBlocked => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "REQUEST_BLOCKED",
                    message: "Request blocked".into(),
                },
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "USER_NOT_FOUND",
                    message: "User not found".into(),
                },
            ),
            AppError::InvalidMood(key) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_MOOD",
                    message: format!(
                        "Invalid mood '{}'. Valid values: {}",
                        key,
                        Mood::ALL
                            .iter()
                            .map(|m| m.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::RateLimited { retry_after, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    code: "RATE_LIMITED",
                    message: format!("Rate limit exceeded. Try again in {} seconds", retry_after),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = if let AppError::RateLimited { retry_after, .. } = &self {
            Some(*retry_after)
        } else {
            None
        };

        let (status, body) = self.status_and_body();

        if let Some(seconds) = retry_after {
            (status, [("Retry-After", seconds.to_string())], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<DenialReason> for AppError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::RateLimit {
                remaining,
                reset_seconds,
            } => {
                tracing::warn!(remaining, reset_seconds, "Rate limit exceeded");
                AppError::RateLimited {
                    remaining,
                    retry_after: reset_seconds,
                }
            }
            DenialReason::Automated { detail } => {
                tracing::warn!("Request blocked: {detail}");
                AppError::RequestBlocked
            }
        }
    }
}
