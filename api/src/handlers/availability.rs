//! Availability handlers
//!
//! Endpoints for professors to publish and withdraw bookable windows.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Availability, AvailabilityId, ProfessorId, Schedule};
use crate::error::AppError;
use crate::AppState;

/// Request to publish a window
#[derive(Debug, Deserialize)]
pub struct PublishAvailabilityRequest {
    pub schedule: Schedule,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    /// Defaults to true for weekly windows, false for dated ones
    pub is_recurring: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: String,
    pub professor_id: String,
    pub schedule: Schedule,
    pub start_time: String,
    pub end_time: String,
    pub is_recurring: bool,
    pub is_active: bool,
}

impl From<Availability> for AvailabilityResponse {
    fn from(a: Availability) -> Self {
        AvailabilityResponse {
            id: a.id.to_string(),
            professor_id: a.professor_id.to_string(),
            schedule: a.schedule,
            start_time: a.start_time.format("%H:%M").to_string(),
            end_time: a.end_time.format("%H:%M").to_string(),
            is_recurring: a.is_recurring,
            is_active: a.is_active,
        }
    }
}

/// POST /professors/:id/availability
pub async fn publish_availability(
    State(state): State<AppState>,
    Path(professor_id): Path<Uuid>,
    Json(request): Json<PublishAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityResponse>), AppError> {
    let is_recurring = request
        .is_recurring
        .unwrap_or(matches!(request.schedule, Schedule::Weekly { .. }));

    let availability = state
        .availability_service
        .publish(
            &ProfessorId(professor_id),
            request.schedule,
            &request.start_time,
            &request.end_time,
            is_recurring,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(availability.into())))
}

/// DELETE /availability/:id
pub async fn retract_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = state
        .availability_service
        .retract(&AvailabilityId(id))
        .await?;

    Ok(Json(availability.into()))
}

/// GET /professors/:id/availability
pub async fn list_availability(
    State(state): State<AppState>,
    Path(professor_id): Path<Uuid>,
) -> Result<Json<Vec<AvailabilityResponse>>, AppError> {
    let windows = state
        .availability_service
        .list(&ProfessorId(professor_id))
        .await?;

    Ok(Json(windows.into_iter().map(Into::into).collect()))
}
