//! PostgreSQL adapter for BookingRepository
//!
//! `reserve` runs every invariant check and the insert in one transaction:
//! - the learner row is locked, so one learner's reservations run one at a time
//! - the availability row is locked shared, so a retract cannot slip in
//! - the partial unique index on scheduled `(professor_id, scheduled_at)`
//!   rejects the loser of a race for the same slot

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    min_session_spacing, Actor, AvailabilityId, Booking, BookingId, BookingStatus, Cancellation,
    CancellationReason, LearnerId, NewBooking, ProfessorId,
};
use crate::domain::ports::BookingRepository;
use crate::entity::{availabilities, bookings, learners};
use crate::error::{ConflictReason, DomainError};

/// PostgreSQL implementation of BookingRepository
pub struct PostgresBookingRepository {
    db: DatabaseConnection,
}

impl PostgresBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let result = bookings::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_learner(&self, learner_id: &LearnerId) -> Result<Vec<Booking>, DomainError> {
        let results = bookings::Entity::find()
            .filter(bookings::Column::LearnerId.eq(learner_id.0))
            .order_by_desc(bookings::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count_scheduled_by_learner(
        &self,
        learner_id: &LearnerId,
    ) -> Result<u32, DomainError> {
        let count = bookings::Entity::find()
            .filter(bookings::Column::LearnerId.eq(learner_id.0))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as u32)
    }

    async fn reserve(&self, booking: &NewBooking, capacity: u32) -> Result<Booking, DomainError> {
        let txn = self.db.begin().await?;

        let learner = learners::Entity::find_by_id(booking.learner_id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Learner {} not found", booking.learner_id))
            })?;

        let active = availabilities::Entity::find_by_id(booking.availability_id.0)
            .lock_shared()
            .one(&txn)
            .await?
            .is_some_and(|a| a.is_active);
        if !active {
            return Err(DomainError::NotFound(format!(
                "Availability {} not found",
                booking.availability_id
            )));
        }

        let scheduled = bookings::Entity::find()
            .filter(bookings::Column::LearnerId.eq(booking.learner_id.0))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .count(&txn)
            .await? as u32;
        if scheduled >= capacity {
            return Err(DomainError::CapacityExceeded {
                scheduled,
                capacity,
            });
        }

        let taken = bookings::Entity::find()
            .filter(bookings::Column::ProfessorId.eq(booking.professor_id.0))
            .filter(bookings::Column::ScheduledAt.eq(booking.scheduled_at.fixed_offset()))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(DomainError::Conflict(ConflictReason::SlotTaken));
        }

        let spacing = min_session_spacing();
        let nearby = bookings::Entity::find()
            .filter(bookings::Column::LearnerId.eq(booking.learner_id.0))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .filter(bookings::Column::ScheduledAt.gt((booking.scheduled_at - spacing).fixed_offset()))
            .filter(bookings::Column::ScheduledAt.lt((booking.scheduled_at + spacing).fixed_offset()))
            .count(&txn)
            .await?;
        if nearby > 0 {
            return Err(DomainError::Conflict(ConflictReason::TooSoon));
        }

        let model = bookings::ActiveModel {
            id: Set(Uuid::new_v4()),
            learner_id: Set(booking.learner_id.0),
            professor_id: Set(booking.professor_id.0),
            availability_id: Set(booking.availability_id.0),
            scheduled_at: Set(booking.scheduled_at.fixed_offset()),
            status: Set(BookingStatus::Scheduled.to_string()),
            meeting_link: Set(booking.meeting_link.clone()),
            cancelled_by: Set(None),
            cancellation_code: Set(None),
            cancellation_text: Set(None),
            cancelled_at: Set(None),
            created_at: Set(Some(Utc::now().fixed_offset())),
        };
        let created = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            // lost the race against a concurrent reservation for the same slot
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::Conflict(ConflictReason::SlotTaken)
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        if learner.professor_id.is_none() {
            let mut learner: learners::ActiveModel = learner.into();
            learner.professor_id = Set(Some(booking.professor_id.0));
            learner.update(&txn).await?;
        }

        txn.commit().await?;

        Ok(created.into())
    }

    async fn cancel(
        &self,
        id: &BookingId,
        cancellation: &Cancellation,
    ) -> Result<Booking, DomainError> {
        let (code, text) = match &cancellation.reason {
            CancellationReason::Code(code) => (Some(code.to_string()), None),
            CancellationReason::Custom(text) => (None, Some(text.clone())),
        };

        // Only a scheduled row is touched; a repeated cancel changes nothing
        bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Cancelled.to_string()),
            )
            .col_expr(
                bookings::Column::CancelledBy,
                Expr::value(cancellation.cancelled_by.to_string()),
            )
            .col_expr(bookings::Column::CancellationCode, Expr::value(code))
            .col_expr(bookings::Column::CancellationText, Expr::value(text))
            .col_expr(
                bookings::Column::CancelledAt,
                Expr::value(cancellation.cancelled_at.fixed_offset()),
            )
            .filter(bookings::Column::Id.eq(id.0))
            .filter(bookings::Column::Status.eq(BookingStatus::Scheduled.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Booking {} not found", id)))
    }
}

fn cancellation_of(model: &bookings::Model) -> Option<Cancellation> {
    let cancelled_by: Actor = model.cancelled_by.as_deref()?.parse().ok()?;
    let reason = match (&model.cancellation_code, &model.cancellation_text) {
        (Some(code), _) => CancellationReason::Code(code.parse().ok()?),
        (None, Some(text)) => CancellationReason::Custom(text.clone()),
        (None, None) => return None,
    };
    let cancelled_at: DateTime<Utc> = model.cancelled_at?.with_timezone(&Utc);
    Some(Cancellation {
        cancelled_by,
        reason,
        cancelled_at,
    })
}

impl From<bookings::Model> for Booking {
    fn from(model: bookings::Model) -> Self {
        let cancellation = cancellation_of(&model);
        Booking {
            id: BookingId(model.id),
            learner_id: LearnerId(model.learner_id),
            professor_id: ProfessorId(model.professor_id),
            availability_id: AvailabilityId(model.availability_id),
            scheduled_at: model.scheduled_at.with_timezone(&Utc),
            status: model.status.parse().unwrap_or(BookingStatus::Scheduled),
            meeting_link: model.meeting_link,
            cancellation,
            created_at: model
                .created_at
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        }
    }
}
