//! PostgreSQL adapter for AvailabilityRepository
//!
//! Publishing locks the professor row so two concurrent publishes for the
//! same professor cannot both pass the overlap check. Retracting locks the
//! availability row exclusively, which waits for in-flight reservations
//! holding it shared.

use async_trait::async_trait;
use chrono::{Utc, Weekday};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    Availability, AvailabilityId, BookingStatus, NewAvailability, ProfessorId, Schedule,
};
use crate::domain::ports::AvailabilityRepository;
use crate::entity::{availabilities, bookings, professors};
use crate::error::{ConflictReason, DomainError};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// PostgreSQL implementation of AvailabilityRepository
pub struct PostgresAvailabilityRepository {
    db: DatabaseConnection,
}

impl PostgresAvailabilityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn active_for(
        txn: &DatabaseTransaction,
        professor_id: &ProfessorId,
    ) -> Result<Vec<Availability>, DomainError> {
        availabilities::Entity::find()
            .filter(availabilities::Column::ProfessorId.eq(professor_id.0))
            .filter(availabilities::Column::IsActive.eq(true))
            .all(txn)
            .await?
            .into_iter()
            .map(Availability::try_from)
            .collect()
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepository {
    async fn find_by_id(&self, id: &AvailabilityId) -> Result<Option<Availability>, DomainError> {
        let result = availabilities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Availability::try_from).transpose()
    }

    async fn find_active_by_professor(
        &self,
        professor_id: &ProfessorId,
    ) -> Result<Vec<Availability>, DomainError> {
        let results = availabilities::Entity::find()
            .filter(availabilities::Column::ProfessorId.eq(professor_id.0))
            .filter(availabilities::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Availability::try_from).collect()
    }

    async fn create_if_free(
        &self,
        availability: &NewAvailability,
    ) -> Result<Availability, DomainError> {
        let txn = self.db.begin().await?;

        professors::Entity::find_by_id(availability.professor_id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Professor {} not found", availability.professor_id))
            })?;

        let existing = Self::active_for(&txn, &availability.professor_id).await?;
        if existing
            .iter()
            .any(|a| a.conflicts_with(&availability.schedule, &availability.window))
        {
            return Err(DomainError::Conflict(
                ConflictReason::OverlappingAvailability,
            ));
        }

        let (day_of_week, specific_date) = match availability.schedule {
            Schedule::Weekly { day } => (Some(day.num_days_from_monday() as i16), None),
            Schedule::Date { date } => (None, Some(date)),
        };

        let model = availabilities::ActiveModel {
            id: Set(Uuid::new_v4()),
            professor_id: Set(availability.professor_id.0),
            day_of_week: Set(day_of_week),
            specific_date: Set(specific_date),
            start_time: Set(availability.window.start),
            end_time: Set(availability.window.end),
            is_recurring: Set(availability.is_recurring),
            is_active: Set(true),
            created_at: Set(Some(Utc::now().fixed_offset())),
        };
        let created = model.insert(&txn).await?;

        txn.commit().await?;

        Availability::try_from(created)
    }

    async fn deactivate_if_unbooked(
        &self,
        id: &AvailabilityId,
    ) -> Result<Availability, DomainError> {
        let txn = self.db.begin().await?;

        let current = availabilities::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Availability {} not found", id)))?;

        if !current.is_active {
            return Availability::try_from(current);
        }

        let in_use = bookings::Entity::find()
            .filter(bookings::Column::AvailabilityId.eq(id.0))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .count(&txn)
            .await?;
        if in_use > 0 {
            return Err(DomainError::Conflict(ConflictReason::AvailabilityInUse));
        }

        let mut model: availabilities::ActiveModel = current.into();
        model.is_active = Set(false);
        let updated = model.update(&txn).await?;

        txn.commit().await?;

        Availability::try_from(updated)
    }
}

impl TryFrom<availabilities::Model> for Availability {
    type Error = DomainError;

    fn try_from(model: availabilities::Model) -> Result<Self, Self::Error> {
        let schedule = match (model.day_of_week, model.specific_date) {
            (Some(day), None) => {
                let day = usize::try_from(day)
                    .ok()
                    .and_then(|d| WEEKDAYS.get(d))
                    .ok_or_else(|| {
                        DomainError::Internal(format!(
                            "availability {}: bad day_of_week {}",
                            model.id, day
                        ))
                    })?;
                Schedule::Weekly { day: *day }
            }
            (None, Some(date)) => Schedule::Date { date },
            _ => {
                return Err(DomainError::Internal(format!(
                    "availability {} must have exactly one of day_of_week and specific_date",
                    model.id
                )))
            }
        };

        Ok(Availability {
            id: AvailabilityId(model.id),
            professor_id: ProfessorId(model.professor_id),
            schedule,
            start_time: model.start_time,
            end_time: model.end_time,
            is_recurring: model.is_recurring,
            is_active: model.is_active,
            created_at: model
                .created_at
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        })
    }
}
