//! Booking service
//!
//! Matches a learner to a professor's slot. Cheap checks (entitlement,
//! capacity, pairing, dates) run first so the learner gets a precise reason;
//! the repository then re-validates capacity, slot uniqueness and spacing
//! inside one transaction before inserting.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::app::progress_service::ProgressService;
use crate::domain::entities::{
    Actor, AvailabilityId, Booking, BookingId, Cancellation, CancellationReason, LearnerId,
    NewBooking, UnlockTier,
};
use crate::domain::ports::{
    AvailabilityRepository, BookingRepository, LearnerRepository, ProfessorRepository,
    ProgressRepository,
};
use crate::error::{AppError, ConflictReason, DomainError};

/// Service owning the booking lifecycle
pub struct BookingService<BR, AR, LR, PFR, PR>
where
    BR: BookingRepository,
    AR: AvailabilityRepository,
    LR: LearnerRepository,
    PFR: ProfessorRepository,
    PR: ProgressRepository,
{
    bookings: Arc<BR>,
    availabilities: Arc<AR>,
    learners: Arc<LR>,
    professors: Arc<PFR>,
    ledger: Arc<ProgressService<PR>>,
    /// Offset in which availability start times are expressed
    schedule_offset: FixedOffset,
}

impl<BR, AR, LR, PFR, PR> BookingService<BR, AR, LR, PFR, PR>
where
    BR: BookingRepository,
    AR: AvailabilityRepository,
    LR: LearnerRepository,
    PFR: ProfessorRepository,
    PR: ProgressRepository,
{
    pub fn new(
        bookings: Arc<BR>,
        availabilities: Arc<AR>,
        learners: Arc<LR>,
        professors: Arc<PFR>,
        ledger: Arc<ProgressService<PR>>,
        schedule_offset: FixedOffset,
    ) -> Self {
        Self {
            bookings,
            availabilities,
            learners,
            professors,
            ledger,
            schedule_offset,
        }
    }

    /// Reserve the slot produced by `availability_id` on `date`
    pub async fn reserve(
        &self,
        learner_id: &LearnerId,
        availability_id: &AvailabilityId,
        date: NaiveDate,
    ) -> Result<Booking, AppError> {
        self.reserve_at(learner_id, availability_id, date, Utc::now())
            .await
    }

    /// `reserve` with an explicit current time
    pub async fn reserve_at(
        &self,
        learner_id: &LearnerId,
        availability_id: &AvailabilityId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let learner = self
            .learners
            .find_by_id(learner_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Learner {} not found", learner_id)))?;

        // 1. Entitlement
        let tier = self.ledger.unlock_tier(learner_id).await?;
        if tier == UnlockTier::None {
            return Err(DomainError::Entitlement(format!(
                "complete page {} to unlock your first session",
                tier.next_unlock_page().unwrap_or_default()
            ))
            .into());
        }

        // 2. Capacity (re-checked inside the reservation transaction)
        let scheduled = self.bookings.count_scheduled_by_learner(learner_id).await?;
        if scheduled >= tier.capacity() {
            return Err(DomainError::CapacityExceeded {
                scheduled,
                capacity: tier.capacity(),
            }
            .into());
        }

        // 3. Slot template
        let availability = self
            .availabilities
            .find_by_id(availability_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| {
                DomainError::NotFound(format!("Availability {} not found", availability_id))
            })?;

        // 4. Pairing policy
        let professor = self
            .professors
            .find_by_id(&availability.professor_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Professor {} not found", availability.professor_id))
            })?;
        if !professor.can_tutor(learner.gender) {
            return Err(DomainError::Conflict(ConflictReason::GenderMismatch).into());
        }

        // 5. Concrete instant
        if !availability.schedule.matches_date(date) {
            return Err(DomainError::Validation(format!(
                "availability is not offered on {}",
                date
            ))
            .into());
        }
        let scheduled_at = self.slot_instant(date, availability.start_time)?;
        if scheduled_at <= now {
            return Err(
                DomainError::Validation("cannot book a session in the past".to_string()).into(),
            );
        }

        // 6-9. Atomic check-and-insert
        let new_booking = NewBooking {
            learner_id: *learner_id,
            professor_id: professor.id,
            availability_id: availability.id,
            scheduled_at,
            meeting_link: professor.meeting_link(),
        };
        let booking = match self.bookings.reserve(&new_booking, tier.capacity()).await {
            Ok(booking) => booking,
            Err(e) => {
                tracing::debug!(
                    learner = %learner_id,
                    availability = %availability_id,
                    %scheduled_at,
                    error = %e,
                    "Reservation rejected"
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            booking = %booking.id,
            learner = %learner_id,
            professor = %booking.professor_id,
            %scheduled_at,
            "Session booked"
        );
        if !learner.is_paired() {
            tracing::info!(learner = %learner_id, professor = %booking.professor_id, "Learner paired");
        }
        Ok(booking)
    }

    /// Cancel a booking. Cancelling twice is a successful no-op.
    pub async fn cancel(
        &self,
        booking_id: &BookingId,
        actor: Actor,
        reason: CancellationReason,
    ) -> Result<Booking, AppError> {
        if let CancellationReason::Custom(text) = &reason {
            if text.trim().is_empty() {
                return Err(DomainError::Validation(
                    "custom cancellation reason must not be empty".to_string(),
                )
                .into());
            }
        }

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Booking {} not found", booking_id)))?;

        if !booking.can_be_cancelled_by(&actor) {
            return Err(DomainError::Forbidden(format!(
                "{} cannot cancel booking {}",
                actor, booking_id
            ))
            .into());
        }

        if !booking.is_scheduled() {
            tracing::debug!(booking = %booking_id, "Booking already cancelled");
            return Ok(booking);
        }

        let cancellation = Cancellation {
            cancelled_by: actor,
            reason,
            cancelled_at: Utc::now(),
        };
        let booking = self.bookings.cancel(booking_id, &cancellation).await?;

        tracing::info!(booking = %booking_id, by = %actor, "Session cancelled");
        Ok(booking)
    }

    /// All bookings of a learner, latest first
    pub async fn list_bookings(&self, learner_id: &LearnerId) -> Result<Vec<Booking>, AppError> {
        Ok(self.bookings.find_by_learner(learner_id).await?)
    }

    fn slot_instant(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, DomainError> {
        self.schedule_offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| DomainError::Validation(format!("{} {} is not a valid time", date, time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};

    use crate::app::curriculum::Curriculum;
    use crate::domain::entities::{
        Availability, BookingStatus, Gender, Learner, Professor, ReasonCode, Schedule,
    };
    use crate::test_utils::{
        test_availability, test_learner, test_professor, test_professor_with_meeting,
        InMemoryStore,
    };

    type TestBookingService =
        BookingService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

    fn create_service(store: Arc<InMemoryStore>) -> TestBookingService {
        let ledger = Arc::new(ProgressService::new(
            store.clone(),
            Arc::new(Curriculum::default()),
        ));
        BookingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            ledger,
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    /// Professor with weekly 10:00-11:00 windows on every weekday
    fn professor_with_week(store: InMemoryStore) -> (InMemoryStore, Professor, Vec<Availability>) {
        let professor = test_professor();
        let mut store = store.with_professor(professor.clone());
        let mut windows = Vec::new();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            let a = test_availability(&professor.id, Schedule::Weekly { day }, "10:00", "11:00");
            store = store.with_availability(a.clone());
            windows.push(a);
        }
        (store, professor, windows)
    }

    fn window_for(windows: &[Availability], d: NaiveDate) -> AvailabilityId {
        windows
            .iter()
            .find(|a| a.schedule.matches_date(d))
            .map(|a| a.id)
            .unwrap()
    }

    fn learner_at_page(store: InMemoryStore, gender: Gender, page: i32) -> (InMemoryStore, Learner) {
        let learner = test_learner(gender);
        let store = store.with_learner(learner.clone()).with_pages(learner.id, &[page]);
        (store, learner)
    }

    #[tokio::test]
    async fn reserve_success_binds_professor_and_link() {
        let professor = test_professor_with_meeting("555 1234", "pw");
        let availability = test_availability(
            &professor.id,
            Schedule::Weekly { day: Weekday::Tue },
            "10:00",
            "11:00",
        );
        let (store, learner) = learner_at_page(
            InMemoryStore::new()
                .with_professor(professor.clone())
                .with_availability(availability.clone()),
            professor.gender,
            10,
        );
        let store = Arc::new(store);
        let service = create_service(store.clone());

        let booking = service
            .reserve_at(&learner.id, &availability.id, date(10), now())
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert_eq!(
            booking.scheduled_at,
            Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap()
        );
        assert_eq!(
            booking.meeting_link.as_deref(),
            Some("https://zoom.us/j/5551234?pwd=pw")
        );
        assert_eq!(
            store.learner(&learner.id).unwrap().professor_id,
            Some(professor.id)
        );
    }

    #[tokio::test]
    async fn reserve_without_meeting_room_has_no_link() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));

        let booking = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();

        assert!(booking.meeting_link.is_none());
    }

    #[tokio::test]
    async fn reserve_tier_none_is_entitlement_error() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 6);
        let service = create_service(Arc::new(store));

        let result = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Entitlement(_)))
        ));
    }

    #[tokio::test]
    async fn second_reserve_at_tier1_exceeds_capacity() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));

        service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();
        let second = service
            .reserve_at(&learner.id, &window_for(&windows, date(20)), date(20), now())
            .await;

        assert!(matches!(
            second,
            Err(AppError::Domain(DomainError::CapacityExceeded {
                scheduled: 1,
                capacity: 1
            }))
        ));
    }

    #[tokio::test]
    async fn reserve_retracted_availability_is_not_found() {
        let professor = test_professor();
        let mut availability = test_availability(
            &professor.id,
            Schedule::Weekly { day: Weekday::Tue },
            "10:00",
            "11:00",
        );
        availability.is_active = false;
        let (store, learner) = learner_at_page(
            InMemoryStore::new()
                .with_professor(professor.clone())
                .with_availability(availability.clone()),
            professor.gender,
            10,
        );
        let service = create_service(Arc::new(store));

        let result = service
            .reserve_at(&learner.id, &availability.id, date(10), now())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn reserve_gender_mismatch_is_conflict() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let other = match professor.gender {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        };
        let (store, learner) = learner_at_page(store, other, 10);
        let service = create_service(Arc::new(store));

        let result = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Conflict(
                ConflictReason::GenderMismatch
            )))
        ));
    }

    #[tokio::test]
    async fn reserve_in_the_past_is_rejected() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));

        // same day, start time already passed
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
        let result = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), at)
            .await;

        match result {
            Err(AppError::Domain(DomainError::Validation(msg))) => assert!(msg.contains("past")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reserve_on_wrong_weekday_is_rejected() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));

        // Tuesday window, Wednesday date
        let result = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(11), now())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn reserve_applies_schedule_offset() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let store = Arc::new(store);
        let ledger = Arc::new(ProgressService::new(
            store.clone(),
            Arc::new(Curriculum::default()),
        ));
        let service = BookingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            ledger,
            FixedOffset::east_opt(2 * 3600).unwrap(),
        );

        let booking = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();

        assert_eq!(
            booking.scheduled_at,
            Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn same_slot_for_two_learners_is_taken() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, a) = learner_at_page(store, professor.gender, 10);
        let (store, b) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));
        let slot = window_for(&windows, date(10));

        service.reserve_at(&a.id, &slot, date(10), now()).await.unwrap();
        let second = service.reserve_at(&b.id, &slot, date(10), now()).await;

        assert!(matches!(
            second,
            Err(AppError::Domain(DomainError::Conflict(
                ConflictReason::SlotTaken
            )))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reserves_for_one_slot_yield_one_winner() {
        const N: usize = 16;
        let (mut store, professor, windows) = professor_with_week(InMemoryStore::new());
        let mut learners = Vec::new();
        for _ in 0..N {
            let (s, learner) = learner_at_page(store, professor.gender, 10);
            store = s;
            learners.push(learner);
        }
        let store = Arc::new(store);
        let service = Arc::new(create_service(store.clone()));
        let slot = window_for(&windows, date(10));

        let handles: Vec<_> = learners
            .into_iter()
            .map(|learner| {
                let service = service.clone();
                tokio::spawn(async move {
                    service.reserve_at(&learner.id, &slot, date(10), now()).await
                })
            })
            .collect();

        let mut wins = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(AppError::Domain(DomainError::Conflict(ConflictReason::SlotTaken))) => {
                    taken += 1
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(taken, N - 1);
        assert_eq!(store.scheduled_bookings().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reserves_by_one_learner_respect_capacity() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let store = Arc::new(store);
        let service = Arc::new(create_service(store.clone()));

        // well spaced dates so only capacity can reject
        let handles: Vec<_> = [10, 14, 18, 22, 26]
            .into_iter()
            .map(|day| {
                let service = service.clone();
                let slot = window_for(&windows, date(day));
                let learner_id = learner.id;
                tokio::spawn(async move {
                    service.reserve_at(&learner_id, &slot, date(day), now()).await
                })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(AppError::Domain(DomainError::CapacityExceeded { .. })) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(store.scheduled_bookings().len(), 1);
    }

    #[tokio::test]
    async fn bookings_closer_than_two_days_are_too_soon() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 20);
        let service = create_service(Arc::new(store));

        service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();
        let next_day = service
            .reserve_at(&learner.id, &window_for(&windows, date(11)), date(11), now())
            .await;
        let day_before = service
            .reserve_at(&learner.id, &window_for(&windows, date(9)), date(9), now())
            .await;
        let three_days_later = service
            .reserve_at(&learner.id, &window_for(&windows, date(13)), date(13), now())
            .await;

        assert!(matches!(
            next_day,
            Err(AppError::Domain(DomainError::Conflict(ConflictReason::TooSoon)))
        ));
        assert!(matches!(
            day_before,
            Err(AppError::Domain(DomainError::Conflict(ConflictReason::TooSoon)))
        ));
        assert!(three_days_later.is_ok());
    }

    #[tokio::test]
    async fn exactly_two_days_apart_is_allowed() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 30);
        let service = create_service(Arc::new(store));

        service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();
        let result = service
            .reserve_at(&learner.id, &window_for(&windows, date(12)), date(12), now())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn scheduled_bookings_never_exceed_capacity_or_spacing() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 20);
        let store = Arc::new(store);
        let service = create_service(store.clone());

        for day in 2..=30 {
            let _ = service
                .reserve_at(&learner.id, &window_for(&windows, date(day)), date(day), now())
                .await;
        }

        let scheduled = store.scheduled_bookings();
        assert_eq!(scheduled.len(), 2);
        for a in &scheduled {
            for b in &scheduled {
                if a.id != b.id {
                    assert!((a.scheduled_at - b.scheduled_at).num_hours().abs() >= 48);
                }
            }
        }
    }

    #[tokio::test]
    async fn cancel_frees_slot_and_capacity() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, a) = learner_at_page(store, professor.gender, 10);
        let (store, b) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));
        let slot = window_for(&windows, date(10));

        let booking = service.reserve_at(&a.id, &slot, date(10), now()).await.unwrap();
        let cancelled = service
            .cancel(
                &booking.id,
                Actor::Learner(a.id),
                CancellationReason::Code(ReasonCode::Illness),
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let cancellation = cancelled.cancellation.unwrap();
        assert_eq!(cancellation.cancelled_by, Actor::Learner(a.id));
        assert_eq!(
            cancellation.reason,
            CancellationReason::Code(ReasonCode::Illness)
        );

        // slot is free for another learner
        assert!(service.reserve_at(&b.id, &slot, date(10), now()).await.is_ok());
        // capacity is free for the first learner
        assert!(service
            .reserve_at(&a.id, &window_for(&windows, date(20)), date(20), now())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn cancel_twice_is_a_no_op() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));
        let booking = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();

        let first = service
            .cancel(
                &booking.id,
                Actor::Professor(professor.id),
                CancellationReason::Custom("family emergency".to_string()),
            )
            .await
            .unwrap();
        let second = service
            .cancel(
                &booking.id,
                Actor::Admin,
                CancellationReason::Code(ReasonCode::NoLongerNeeded),
            )
            .await
            .unwrap();

        assert_eq!(second.status, BookingStatus::Cancelled);
        assert_eq!(second.cancellation, first.cancellation);
    }

    #[tokio::test]
    async fn cancel_by_stranger_is_forbidden() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 10);
        let service = create_service(Arc::new(store));
        let booking = service
            .reserve_at(&learner.id, &window_for(&windows, date(10)), date(10), now())
            .await
            .unwrap();

        let result = service
            .cancel(
                &booking.id,
                Actor::Learner(LearnerId::new()),
                CancellationReason::Code(ReasonCode::Illness),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Forbidden(_)))
        ));
    }

    #[tokio::test]
    async fn cancel_with_blank_custom_reason_is_rejected() {
        let service = create_service(Arc::new(InMemoryStore::new()));

        let result = service
            .cancel(
                &BookingId::new(),
                Actor::Admin,
                CancellationReason::Custom("   ".to_string()),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn cancel_missing_is_not_found() {
        let service = create_service(Arc::new(InMemoryStore::new()));

        let result = service
            .cancel(
                &BookingId::new(),
                Actor::Admin,
                CancellationReason::Code(ReasonCode::Illness),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn list_bookings_latest_first() {
        let (store, professor, windows) = professor_with_week(InMemoryStore::new());
        let (store, learner) = learner_at_page(store, professor.gender, 30);
        let service = create_service(Arc::new(store));
        for day in [10, 20, 15] {
            service
                .reserve_at(&learner.id, &window_for(&windows, date(day)), date(day), now())
                .await
                .unwrap();
        }

        let listed = service.list_bookings(&learner.id).await.unwrap();

        assert_eq!(listed.len(), 3);
        assert!(listed[0].scheduled_at > listed[1].scheduled_at);
        assert!(listed[1].scheduled_at > listed[2].scheduled_at);
        assert!(listed[0].scheduled_at - listed[2].scheduled_at == Duration::days(10));
    }
}
