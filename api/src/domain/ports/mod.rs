//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod email;
pub mod repositories;

pub use email::EmailDelivery;
pub use repositories::{
    AvailabilityRepository, BookingRepository, HomeworkRepository, LearnerRepository,
    NotificationLogRepository, ProfessorRepository, ProgressRepository,
};
