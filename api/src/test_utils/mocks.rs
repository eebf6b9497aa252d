//! Mock implementations of port traits
//!
//! `InMemoryStore` implements every repository over one shared state behind
//! a single lock. Each trait method takes the write lock once, so a method is
//! atomic the same way a Postgres transaction is, and concurrent tests see
//! the same races the database resolves.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{
    Availability, AvailabilityId, Booking, BookingId, BookingStatus, Cancellation,
    HomeworkAssignment, HomeworkAssignmentId, Learner, LearnerId, NewAvailability, NewBooking,
    NotificationLog, NotificationLogId, Professor, ProfessorId, ProgressChange, ProgressRecord,
};
use crate::domain::ports::{
    AvailabilityRepository, BookingRepository, EmailDelivery, HomeworkRepository,
    LearnerRepository, NotificationLogRepository, ProfessorRepository, ProgressRepository,
};
use crate::error::{ConflictReason, DeliveryError, DomainError};

// ============================================================================
// In-Memory Store
// ============================================================================

#[derive(Default)]
struct StoreState {
    learners: HashMap<LearnerId, Learner>,
    professors: HashMap<ProfessorId, Professor>,
    progress: HashMap<LearnerId, ProgressRecord>,
    availabilities: HashMap<AvailabilityId, Availability>,
    bookings: HashMap<BookingId, Booking>,
    homework: HashMap<i32, HomeworkAssignment>,
    notifications: Vec<NotificationLog>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    failing_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_learner(self, learner: Learner) -> Self {
        self.state
            .write()
            .unwrap()
            .learners
            .insert(learner.id, learner);
        self
    }

    pub fn with_professor(self, professor: Professor) -> Self {
        self.state
            .write()
            .unwrap()
            .professors
            .insert(professor.id, professor);
        self
    }

    /// Mark pages completed, on top of whatever is already recorded
    pub fn with_pages(self, learner_id: LearnerId, pages: &[i32]) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let record = state
                .progress
                .entry(learner_id)
                .or_insert_with(|| ProgressRecord::empty(learner_id));
            record.completed_pages.extend(pages.iter().copied());
        }
        self
    }

    pub fn with_quizzes(self, learner_id: LearnerId, chapters: &[i32]) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let record = state
                .progress
                .entry(learner_id)
                .or_insert_with(|| ProgressRecord::empty(learner_id));
            record.completed_quizzes.extend(chapters.iter().copied());
        }
        self
    }

    pub fn with_availability(self, availability: Availability) -> Self {
        self.state
            .write()
            .unwrap()
            .availabilities
            .insert(availability.id, availability);
        self
    }

    pub fn with_homework(self, assignment: HomeworkAssignment) -> Self {
        self.state
            .write()
            .unwrap()
            .homework
            .insert(assignment.chapter_id, assignment);
        self
    }

    /// Insert or replace a booking, bypassing reservation checks
    pub fn insert_booking(&self, booking: Booking) {
        self.state
            .write()
            .unwrap()
            .bookings
            .insert(booking.id, booking);
    }

    /// Make every write fail with a retryable database error
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn learner(&self, id: &LearnerId) -> Option<Learner> {
        self.state.read().unwrap().learners.get(id).cloned()
    }

    pub fn scheduled_bookings(&self) -> Vec<Booking> {
        self.state
            .read()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.is_scheduled())
            .cloned()
            .collect()
    }

    pub fn notification_logs(&self) -> Vec<NotificationLog> {
        self.state.read().unwrap().notifications.clone()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Database("connection reset by peer".to_string()));
        }
        Ok(())
    }

    fn toggle(
        &self,
        learner_id: &LearnerId,
        flip: impl FnOnce(&mut ProgressRecord),
    ) -> Result<ProgressChange, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();
        let record = state
            .progress
            .entry(*learner_id)
            .or_insert_with(|| ProgressRecord::empty(*learner_id));
        let previous = record.clone();
        flip(record);
        record.updated_at = Some(Utc::now());
        Ok(ProgressChange {
            previous,
            current: record.clone(),
        })
    }
}

#[async_trait]
impl LearnerRepository for InMemoryStore {
    async fn find_by_id(&self, id: &LearnerId) -> Result<Option<Learner>, DomainError> {
        Ok(self.learner(id))
    }
}

#[async_trait]
impl ProfessorRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProfessorId) -> Result<Option<Professor>, DomainError> {
        Ok(self.state.read().unwrap().professors.get(id).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn find(&self, learner_id: &LearnerId) -> Result<ProgressRecord, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .progress
            .get(learner_id)
            .cloned()
            .unwrap_or_else(|| ProgressRecord::empty(*learner_id)))
    }

    async fn toggle_page(
        &self,
        learner_id: &LearnerId,
        page: i32,
    ) -> Result<ProgressChange, DomainError> {
        self.toggle(learner_id, |record| {
            record.toggle_page(page);
        })
    }

    async fn toggle_quiz(
        &self,
        learner_id: &LearnerId,
        chapter: i32,
    ) -> Result<ProgressChange, DomainError> {
        self.toggle(learner_id, |record| {
            record.toggle_quiz(chapter);
        })
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryStore {
    async fn find_by_id(&self, id: &AvailabilityId) -> Result<Option<Availability>, DomainError> {
        Ok(self.state.read().unwrap().availabilities.get(id).cloned())
    }

    async fn find_active_by_professor(
        &self,
        professor_id: &ProfessorId,
    ) -> Result<Vec<Availability>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .availabilities
            .values()
            .filter(|a| a.professor_id == *professor_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn create_if_free(
        &self,
        availability: &NewAvailability,
    ) -> Result<Availability, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();

        let overlaps = state.availabilities.values().any(|a| {
            a.professor_id == availability.professor_id
                && a.conflicts_with(&availability.schedule, &availability.window)
        });
        if overlaps {
            return Err(DomainError::Conflict(
                ConflictReason::OverlappingAvailability,
            ));
        }

        let created = Availability {
            id: AvailabilityId::new(),
            professor_id: availability.professor_id,
            schedule: availability.schedule,
            start_time: availability.window.start,
            end_time: availability.window.end,
            is_recurring: availability.is_recurring,
            is_active: true,
            created_at: Utc::now(),
        };
        state.availabilities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn deactivate_if_unbooked(
        &self,
        id: &AvailabilityId,
    ) -> Result<Availability, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();

        let in_use = state
            .bookings
            .values()
            .any(|b| b.availability_id == *id && b.is_scheduled());

        let availability = state
            .availabilities
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Availability {} not found", id)))?;
        if !availability.is_active {
            return Ok(availability.clone());
        }
        if in_use {
            return Err(DomainError::Conflict(ConflictReason::AvailabilityInUse));
        }
        availability.is_active = false;
        Ok(availability.clone())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.state.read().unwrap().bookings.get(id).cloned())
    }

    async fn find_by_learner(&self, learner_id: &LearnerId) -> Result<Vec<Booking>, DomainError> {
        let state = self.state.read().unwrap();
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.learner_id == *learner_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(bookings)
    }

    async fn count_scheduled_by_learner(
        &self,
        learner_id: &LearnerId,
    ) -> Result<u32, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .bookings
            .values()
            .filter(|b| b.learner_id == *learner_id && b.is_scheduled())
            .count() as u32)
    }

    async fn reserve(&self, booking: &NewBooking, capacity: u32) -> Result<Booking, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();

        let active = state
            .availabilities
            .get(&booking.availability_id)
            .is_some_and(|a| a.is_active);
        if !active {
            return Err(DomainError::NotFound(format!(
                "Availability {} not found",
                booking.availability_id
            )));
        }

        let own: Vec<&Booking> = state
            .bookings
            .values()
            .filter(|b| b.learner_id == booking.learner_id && b.is_scheduled())
            .collect();
        let scheduled = own.len() as u32;
        if scheduled >= capacity {
            return Err(DomainError::CapacityExceeded {
                scheduled,
                capacity,
            });
        }

        let taken = state.bookings.values().any(|b| {
            b.is_scheduled()
                && b.professor_id == booking.professor_id
                && b.scheduled_at == booking.scheduled_at
        });
        if taken {
            return Err(DomainError::Conflict(ConflictReason::SlotTaken));
        }

        if own.iter().any(|b| b.too_close_to(booking.scheduled_at)) {
            return Err(DomainError::Conflict(ConflictReason::TooSoon));
        }

        let created = Booking {
            id: BookingId::new(),
            learner_id: booking.learner_id,
            professor_id: booking.professor_id,
            availability_id: booking.availability_id,
            scheduled_at: booking.scheduled_at,
            status: BookingStatus::Scheduled,
            meeting_link: booking.meeting_link.clone(),
            cancellation: None,
            created_at: Utc::now(),
        };
        state.bookings.insert(created.id, created.clone());

        if let Some(learner) = state.learners.get_mut(&booking.learner_id) {
            learner.professor_id.get_or_insert(booking.professor_id);
        }

        Ok(created)
    }

    async fn cancel(
        &self,
        id: &BookingId,
        cancellation: &Cancellation,
    ) -> Result<Booking, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();
        let booking = state
            .bookings
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Booking {} not found", id)))?;
        if booking.is_scheduled() {
            booking.status = BookingStatus::Cancelled;
            booking.cancellation = Some(cancellation.clone());
        }
        Ok(booking.clone())
    }
}

#[async_trait]
impl HomeworkRepository for InMemoryStore {
    async fn find_by_chapter(
        &self,
        chapter_id: i32,
    ) -> Result<Option<HomeworkAssignment>, DomainError> {
        Ok(self.state.read().unwrap().homework.get(&chapter_id).cloned())
    }
}

#[async_trait]
impl NotificationLogRepository for InMemoryStore {
    async fn find(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .notifications
            .iter()
            .find(|n| n.learner_id == *learner_id && n.homework_assignment_id == *homework_id)
            .cloned())
    }

    async fn insert_once(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();
        let exists = state
            .notifications
            .iter()
            .any(|n| n.learner_id == *learner_id && n.homework_assignment_id == *homework_id);
        if exists {
            return Ok(None);
        }
        let log = NotificationLog {
            id: NotificationLogId::new(),
            learner_id: *learner_id,
            homework_assignment_id: *homework_id,
            email_sent: false,
            created_at: Utc::now(),
        };
        state.notifications.push(log.clone());
        Ok(Some(log))
    }

    async fn record_delivery(
        &self,
        id: &NotificationLogId,
        email_sent: bool,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().unwrap();
        let log = state
            .notifications
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Notification {} not found", id)))?;
        log.email_sent = email_sent;
        Ok(())
    }

    async fn find_undelivered(&self, limit: u64) -> Result<Vec<NotificationLog>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .notifications
            .iter()
            .filter(|n| !n.email_sent)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Mock Email Delivery
// ============================================================================

/// A mock mailer that counts attempts and can be told to fail
#[derive(Default)]
pub struct MockEmailDelivery {
    attempts: AtomicUsize,
    sent_to: RwLock<Vec<String>>,
    should_fail: bool,
    delay: Option<Duration>,
}

impl MockEmailDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Sleep before answering, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent_to.read().unwrap().clone()
    }
}

#[async_trait]
impl EmailDelivery for MockEmailDelivery {
    async fn send_homework(
        &self,
        _assignment: &HomeworkAssignment,
        learner: &Learner,
    ) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(DeliveryError::Api {
                status: 500,
                message: "Mock failure".to_string(),
            });
        }
        self.sent_to.write().unwrap().push(learner.email.clone());
        Ok(())
    }
}
