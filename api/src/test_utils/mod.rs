//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - One in-memory store backs every repository, so a reservation sees the
//!   bookings, availabilities and learners the other services wrote
//! - Each method holds one lock for its whole body, which gives the tests
//!   the same atomicity the database transactions give production
//! - We control exactly what they return without macro magic

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
