//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod availability_service;
pub mod booking_service;
pub mod curriculum;
pub mod homework_dispatcher;
pub mod progress_service;

pub use availability_service::AvailabilityService;
pub use booking_service::BookingService;
pub use curriculum::Curriculum;
pub use homework_dispatcher::{DispatchOutcome, HomeworkDispatcher, NoOpReason};
pub use progress_service::{ChapterCompletionListener, ProgressService, UnlockStatus};
