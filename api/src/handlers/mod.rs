//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod availability;
pub mod bookings;
pub mod notifications;
pub mod progress;

pub use availability::{list_availability, publish_availability, retract_availability};
pub use bookings::{cancel, list_learner_bookings, reserve};
pub use notifications::list_failed_notifications;
pub use progress::{get_progress, get_unlock_status, toggle_page, toggle_quiz};
