//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod availability;
pub mod booking;
pub mod homework;
pub mod learner;
pub mod professor;
pub mod progress;

pub use availability::{
    parse_hhmm, Availability, AvailabilityId, NewAvailability, Schedule, TimeWindow,
};
pub use booking::{
    min_session_spacing, Actor, Booking, BookingId, BookingStatus, Cancellation, CancellationReason, NewBooking,
    ReasonCode,
};
pub use homework::{HomeworkAssignment, HomeworkAssignmentId, NotificationLog, NotificationLogId};
pub use learner::{Gender, Learner, LearnerId};
pub use professor::{Professor, ProfessorId};
pub use progress::{ChapterCompletedEvent, ProgressChange, ProgressRecord, UnlockTier};
