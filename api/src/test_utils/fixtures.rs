//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use super::mocks::InMemoryStore;
use crate::app::curriculum::Curriculum;
use crate::domain::entities::{
    parse_hhmm, Availability, AvailabilityId, Booking, BookingId, BookingStatus, Gender,
    HomeworkAssignment, HomeworkAssignmentId, Learner, LearnerId, Professor, ProfessorId,
    Schedule,
};

/// Create a test learner, not yet paired
pub fn test_learner(gender: Gender) -> Learner {
    let id = LearnerId::new();
    Learner {
        id,
        name: format!("Learner {}", &id.0.simple().to_string()[..8]),
        email: format!("learner-{}@example.test", id.0.simple()),
        gender,
        professor_id: None,
    }
}

/// Create a test professor without a meeting room
pub fn test_professor() -> Professor {
    Professor {
        id: ProfessorId::new(),
        name: "Test Professor".to_string(),
        gender: Gender::Female,
        meeting_id: None,
        meeting_password: None,
    }
}

/// Create a test professor with a meeting room
pub fn test_professor_with_meeting(meeting_id: &str, password: &str) -> Professor {
    Professor {
        meeting_id: Some(meeting_id.to_string()),
        meeting_password: Some(password.to_string()),
        ..test_professor()
    }
}

/// Create an active availability. Times must be valid `HH:MM`.
pub fn test_availability(
    professor_id: &ProfessorId,
    schedule: Schedule,
    start: &str,
    end: &str,
) -> Availability {
    Availability {
        id: AvailabilityId::new(),
        professor_id: *professor_id,
        schedule,
        start_time: parse_hhmm(start).unwrap(),
        end_time: parse_hhmm(end).unwrap(),
        is_recurring: matches!(schedule, Schedule::Weekly { .. }),
        is_active: true,
        created_at: Utc::now(),
    }
}

/// Create a scheduled booking a week from now on `availability`
pub fn test_booking(learner: &Learner, availability: &Availability) -> Booking {
    Booking {
        id: BookingId::new(),
        learner_id: learner.id,
        professor_id: availability.professor_id,
        availability_id: availability.id,
        scheduled_at: Utc::now() + chrono::Duration::days(7),
        status: BookingStatus::Scheduled,
        meeting_link: None,
        cancellation: None,
        created_at: Utc::now(),
    }
}

/// Create a homework assignment for a chapter
pub fn test_homework(chapter_id: i32) -> HomeworkAssignment {
    HomeworkAssignment {
        id: HomeworkAssignmentId::new(),
        chapter_id,
        title: format!("Chapter {} homework", chapter_id),
        content: format!("Exercises for chapter {}", chapter_id),
    }
}

/// Record every required page of `chapter` but not its quiz
pub fn complete_chapter_except_quiz(
    store: InMemoryStore,
    learner_id: LearnerId,
    chapter: i32,
) -> InMemoryStore {
    let curriculum = Curriculum::default();
    let pages = curriculum
        .chapter(chapter)
        .map(|c| curriculum.required_pages(c))
        .unwrap_or_default();
    store.with_pages(learner_id, &pages)
}
