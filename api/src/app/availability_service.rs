//! Availability service
//!
//! Professors publish the windows learners can book. Input is validated
//! before any storage access; the overlap check and the insert happen
//! atomically in the repository.

use std::sync::Arc;

use crate::domain::entities::{
    Availability, AvailabilityId, NewAvailability, ProfessorId, Schedule, TimeWindow,
};
use crate::domain::ports::{AvailabilityRepository, ProfessorRepository};
use crate::error::{AppError, DomainError};

/// Service for managing professor availability
pub struct AvailabilityService<AR, PFR>
where
    AR: AvailabilityRepository,
    PFR: ProfessorRepository,
{
    availabilities: Arc<AR>,
    professors: Arc<PFR>,
}

impl<AR, PFR> AvailabilityService<AR, PFR>
where
    AR: AvailabilityRepository,
    PFR: ProfessorRepository,
{
    pub fn new(availabilities: Arc<AR>, professors: Arc<PFR>) -> Self {
        Self {
            availabilities,
            professors,
        }
    }

    /// Publish a new bookable window
    pub async fn publish(
        &self,
        professor_id: &ProfessorId,
        schedule: Schedule,
        start_time: &str,
        end_time: &str,
        is_recurring: bool,
    ) -> Result<Availability, AppError> {
        let window = TimeWindow::parse(start_time, end_time)?;

        if self.professors.find_by_id(professor_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Professor {} not found", professor_id)).into());
        }

        let availability = self
            .availabilities
            .create_if_free(&NewAvailability {
                professor_id: *professor_id,
                schedule,
                window,
                is_recurring,
            })
            .await?;

        tracing::info!(
            professor = %professor_id,
            availability = %availability.id,
            "Availability published"
        );
        Ok(availability)
    }

    /// Withdraw a window. Fails while a scheduled booking still uses it.
    pub async fn retract(&self, id: &AvailabilityId) -> Result<Availability, AppError> {
        let availability = self.availabilities.deactivate_if_unbooked(id).await?;
        tracing::info!(availability = %id, "Availability retracted");
        Ok(availability)
    }

    /// Active windows of a professor, ordered by day and start time
    pub async fn list(&self, professor_id: &ProfessorId) -> Result<Vec<Availability>, AppError> {
        let mut windows = self
            .availabilities
            .find_active_by_professor(professor_id)
            .await?;
        windows.sort_by_key(|a| (a.schedule.sort_key(), a.start_time));
        Ok(windows)
    }
}
