//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod email;
pub mod postgres;

pub use email::EmailClient;
pub use postgres::{
    PostgresAvailabilityRepository, PostgresBookingRepository, PostgresHomeworkRepository,
    PostgresLearnerRepository, PostgresNotificationLogRepository, PostgresProfessorRepository,
    PostgresProgressRepository,
};
