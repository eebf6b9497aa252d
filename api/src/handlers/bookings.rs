//! Booking handlers
//!
//! Endpoints for the booking UI: reserve a slot, cancel, list sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    Actor, AvailabilityId, Booking, BookingId, Cancellation, CancellationReason, LearnerId,
};
use crate::error::AppError;
use crate::AppState;

/// Request to reserve a slot
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub learner_id: Uuid,
    pub availability_id: Uuid,
    /// Calendar day of the session, `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// Request to cancel a booking
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub actor: Actor,
    pub reason: CancellationReason,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub learner_id: String,
    pub professor_id: String,
    pub availability_id: String,
    pub scheduled_at: String,
    pub status: String,
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<Cancellation>,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse {
            id: b.id.to_string(),
            learner_id: b.learner_id.to_string(),
            professor_id: b.professor_id.to_string(),
            availability_id: b.availability_id.to_string(),
            scheduled_at: b.scheduled_at.to_rfc3339(),
            status: b.status.to_string(),
            meeting_link: b.meeting_link,
            cancellation: b.cancellation,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// POST /bookings
///
/// Reserve the slot an availability produces on a given date.
pub async fn reserve(
    State(state): State<AppState>,
    Json(request): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state
        .booking_service
        .reserve(
            &LearnerId(request.learner_id),
            &AvailabilityId(request.availability_id),
            request.date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// POST /bookings/:id/cancel
///
/// Cancel a booking. Cancelling an already cancelled booking succeeds.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .booking_service
        .cancel(&BookingId(id), request.actor, request.reason)
        .await?;

    Ok(Json(booking.into()))
}

/// GET /learners/:id/bookings
///
/// All bookings of a learner, latest session first.
pub async fn list_learner_bookings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.booking_service.list_bookings(&LearnerId(id)).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
