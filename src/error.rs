//! Error types for Forecourt server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error codes surfaced in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchResource = 3,
    NoSuchBooking = 4,
    NoSuchDraft = 5,
    DraftExpired = 6,
    SlotTaken = 7,
    Duplicate = 8,
    BadValue = 9,
    ConversionFailure = 10,
    RuleViolation = 11,
    NoSuchData = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Draft booking {0} not found")]
    DraftNotFound(Uuid),

    #[error("Draft booking {0} has expired")]
    DraftExpired(Uuid),

    #[error("The {time} slot on {date} is no longer available")]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::DraftNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchDraft, self.to_string())
            }
            AppError::DraftExpired(_) => {
                (StatusCode::GONE, ErrorCode::DraftExpired, self.to_string())
            }
            AppError::SlotUnavailable { .. } => {
                (StatusCode::CONFLICT, ErrorCode::SlotTaken, self.to_string())
            }
            AppError::ConversionFailed(msg) => {
                tracing::error!("Conversion failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ConversionFailure,
                    "Booking conversion failed".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::RuleViolation, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
