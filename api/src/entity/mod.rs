//! SeaORM table models
//!
//! One module per table. Domain conversions live next to the repositories
//! in `adapters::postgres`.

pub mod availabilities;
pub mod bookings;
pub mod homework_assignments;
pub mod learner_progress;
pub mod learners;
pub mod notification_logs;
pub mod professors;
