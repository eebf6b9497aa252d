//! Unified error types for the tutorgate API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core scheduling/progress errors returned by services and repositories
//! - `DeliveryError`: Email delivery client errors (recorded, never fatal)
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//!
//! Delivery failures never reach `AppError`: the homework dispatcher records
//! them on the notification log and the learner's request succeeds.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a request collided with existing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Another learner already holds this professor/time slot
    SlotTaken,
    /// The learner has another session within two days
    TooSoon,
    /// Professor and learner are not paired under the matching policy
    GenderMismatch,
    /// The professor already publishes an intersecting window that day
    OverlappingAvailability,
    /// A scheduled booking still references the availability
    AvailabilityInUse,
}

impl ConflictReason {
    pub fn code(&self) -> &'static str {
        match self {
            ConflictReason::SlotTaken => "slot_taken",
            ConflictReason::TooSoon => "too_soon",
            ConflictReason::GenderMismatch => "gender_mismatch",
            ConflictReason::OverlappingAvailability => "overlapping_availability",
            ConflictReason::AvailabilityInUse => "availability_in_use",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ConflictReason::SlotTaken => "this slot has just been taken, try a different slot",
            ConflictReason::TooSoon => "sessions must be at least two days apart",
            ConflictReason::GenderMismatch => "this professor is not available for your profile",
            ConflictReason::OverlappingAvailability => {
                "availability overlaps an existing window on the same day"
            }
            ConflictReason::AvailabilityInUse => {
                "availability is referenced by a scheduled booking"
            }
        };
        write!(f, "{}", msg)
    }
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not entitled: {0}")]
    Entitlement(String),

    #[error("Capacity exceeded: {scheduled} of {capacity} sessions already scheduled")]
    CapacityExceeded { scheduled: u32, capacity: u32 },

    #[error("Conflict: {0}")]
    Conflict(ConflictReason),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Storage I/O failures are the only errors a caller may blindly retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Database(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Email delivery client errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    /// Machine-readable reason the booking UI switches on
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str, Option<String>) {
        match self {
            AppError::Domain(DomainError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                "Not found",
                "not_found",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                "validation",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Entitlement(msg)) => (
                StatusCode::FORBIDDEN,
                "Sessions not unlocked yet",
                "not_entitled",
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::CapacityExceeded { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "All unlocked sessions are in use",
                "capacity_exceeded",
                Some(e.to_string()),
            ),
            AppError::Domain(DomainError::Conflict(reason)) => (
                StatusCode::CONFLICT,
                "Conflict",
                reason.code(),
                Some(reason.to_string()),
            ),
            AppError::Domain(DomainError::Forbidden(msg)) => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "forbidden",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable, retry the request",
                    "retryable",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "internal",
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "internal",
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code, details) = self.parts();

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code,
            details,
        });

        (status, body).into_response()
    }
}
