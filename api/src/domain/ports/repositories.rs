//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Every method that checks an invariant spanning more than one read does
//! the check and the write as one atomic unit inside the implementation.
//! Callers never get a read-then-write window.

use async_trait::async_trait;

use crate::domain::entities::{
    Availability, AvailabilityId, Booking, BookingId, Cancellation, HomeworkAssignment,
    HomeworkAssignmentId, Learner, LearnerId, NewAvailability, NewBooking, NotificationLog,
    NotificationLogId, Professor, ProfessorId, ProgressChange, ProgressRecord,
};
use crate::error::DomainError;

/// Repository for Learner entities
#[async_trait]
pub trait LearnerRepository: Send + Sync {
    /// Find a learner by ID
    async fn find_by_id(&self, id: &LearnerId) -> Result<Option<Learner>, DomainError>;
}

/// Repository for Professor entities
#[async_trait]
pub trait ProfessorRepository: Send + Sync {
    /// Find a professor by ID
    async fn find_by_id(&self, id: &ProfessorId) -> Result<Option<Professor>, DomainError>;
}

/// Repository for per-learner progress
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load a learner's progress; an empty record if none was stored yet
    async fn find(&self, learner_id: &LearnerId) -> Result<ProgressRecord, DomainError>;

    /// Atomically flip a page's membership
    async fn toggle_page(
        &self,
        learner_id: &LearnerId,
        page: i32,
    ) -> Result<ProgressChange, DomainError>;

    /// Atomically flip a chapter quiz's membership
    async fn toggle_quiz(
        &self,
        learner_id: &LearnerId,
        chapter: i32,
    ) -> Result<ProgressChange, DomainError>;
}

/// Repository for professor availability windows
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Find an availability by ID, active or not
    async fn find_by_id(&self, id: &AvailabilityId) -> Result<Option<Availability>, DomainError>;

    /// Active availabilities of a professor
    async fn find_active_by_professor(
        &self,
        professor_id: &ProfessorId,
    ) -> Result<Vec<Availability>, DomainError>;

    /// Insert unless it intersects an active window of the same professor on
    /// the same day (`Conflict(OverlappingAvailability)`)
    async fn create_if_free(
        &self,
        availability: &NewAvailability,
    ) -> Result<Availability, DomainError>;

    /// Soft-delete unless a scheduled booking references it
    /// (`Conflict(AvailabilityInUse)`)
    async fn deactivate_if_unbooked(
        &self,
        id: &AvailabilityId,
    ) -> Result<Availability, DomainError>;
}

/// Repository for Booking entities
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by ID
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// All bookings of a learner, latest session first
    async fn find_by_learner(&self, learner_id: &LearnerId) -> Result<Vec<Booking>, DomainError>;

    /// Count a learner's scheduled (not cancelled) bookings
    async fn count_scheduled_by_learner(&self, learner_id: &LearnerId)
        -> Result<u32, DomainError>;

    /// Insert a scheduled booking in one transaction that:
    /// - re-checks the availability is still active (`NotFound`)
    /// - re-checks the learner holds fewer than `capacity` scheduled bookings
    /// - rejects a taken `(professor, scheduled_at)` slot (`Conflict(SlotTaken)`)
    /// - rejects sessions within two days of another (`Conflict(TooSoon)`)
    /// - pairs the learner with the professor if not yet paired
    async fn reserve(&self, booking: &NewBooking, capacity: u32) -> Result<Booking, DomainError>;

    /// Mark a booking cancelled. Cancelling a cancelled booking returns it unchanged.
    async fn cancel(
        &self,
        id: &BookingId,
        cancellation: &Cancellation,
    ) -> Result<Booking, DomainError>;
}

/// Repository for homework assignments
#[async_trait]
pub trait HomeworkRepository: Send + Sync {
    /// Find the assignment attached to a chapter
    async fn find_by_chapter(&self, chapter_id: i32)
        -> Result<Option<HomeworkAssignment>, DomainError>;
}

/// Repository for notification logs
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    /// Find the log row for a learner/assignment pair
    async fn find(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError>;

    /// Insert the row for this pair unless one exists. Returns `None` when
    /// another request already inserted it.
    async fn insert_once(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError>;

    /// Record the delivery outcome on an existing row
    async fn record_delivery(
        &self,
        id: &NotificationLogId,
        email_sent: bool,
    ) -> Result<(), DomainError>;

    /// Rows whose email was not delivered, oldest first
    async fn find_undelivered(&self, limit: u64) -> Result<Vec<NotificationLog>, DomainError>;
}
