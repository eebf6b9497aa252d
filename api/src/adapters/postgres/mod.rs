//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod availability_repo;
pub mod booking_repo;
pub mod homework_repo;
pub mod learner_repo;
pub mod notification_repo;
pub mod professor_repo;
pub mod progress_repo;


pub use availability_repo::PostgresAvailabilityRepository;
pub use booking_repo::PostgresBookingRepository;
pub use homework_repo::PostgresHomeworkRepository;
pub use learner_repo::PostgresLearnerRepository;
pub use notification_repo::PostgresNotificationLogRepository;
pub use professor_repo::PostgresProfessorRepository;
pub use progress_repo::PostgresProgressRepository;
