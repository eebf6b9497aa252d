//! Booking domain entity
//!
//! A tutoring session reserved by a learner with a professor. Bookings only
//! ever move from `Scheduled` to `Cancelled` and are never deleted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::availability::AvailabilityId;
use super::learner::LearnerId;
use super::professor::ProfessorId;

/// Minimum gap between two scheduled sessions of the same learner
pub const MIN_SESSION_SPACING_DAYS: i64 = 2;

pub fn min_session_spacing() -> Duration {
    Duration::days(MIN_SESSION_SPACING_DAYS)
}

/// Unique identifier for a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BookingId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Unknown booking status: {}", s)),
        }
    }
}

/// Who asked for a cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    Learner(LearnerId),
    Professor(ProfessorId),
    Admin,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Learner(id) => write!(f, "learner:{}", id),
            Actor::Professor(id) => write!(f, "professor:{}", id),
            Actor::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Actor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "admin" {
            return Ok(Actor::Admin);
        }
        let (role, id) = s
            .split_once(':')
            .ok_or_else(|| format!("Unknown actor: {}", s))?;
        let id = Uuid::parse_str(id).map_err(|_| format!("Invalid actor id: {}", id))?;
        match role {
            "learner" => Ok(Actor::Learner(LearnerId(id))),
            "professor" => Ok(Actor::Professor(ProfessorId(id))),
            _ => Err(format!("Unknown actor role: {}", role)),
        }
    }
}

/// Predefined cancellation reasons offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ScheduleConflict,
    Illness,
    ProfessorUnavailable,
    TechnicalIssue,
    NoLongerNeeded,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonCode::ScheduleConflict => write!(f, "schedule_conflict"),
            ReasonCode::Illness => write!(f, "illness"),
            ReasonCode::ProfessorUnavailable => write!(f, "professor_unavailable"),
            ReasonCode::TechnicalIssue => write!(f, "technical_issue"),
            ReasonCode::NoLongerNeeded => write!(f, "no_longer_needed"),
        }
    }
}

impl std::str::FromStr for ReasonCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schedule_conflict" => Ok(ReasonCode::ScheduleConflict),
            "illness" => Ok(ReasonCode::Illness),
            "professor_unavailable" => Ok(ReasonCode::ProfessorUnavailable),
            "technical_issue" => Ok(ReasonCode::TechnicalIssue),
            "no_longer_needed" => Ok(ReasonCode::NoLongerNeeded),
            _ => Err(format!("Unknown reason code: {}", s)),
        }
    }
}

/// Either a predefined reason or free text, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CancellationReason {
    Code(ReasonCode),
    Custom(String),
}

/// Recorded once a booking is cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cancellation {
    pub cancelled_by: Actor,
    pub reason: CancellationReason,
    pub cancelled_at: DateTime<Utc>,
}

/// A reserved tutoring session
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub learner_id: LearnerId,
    pub professor_id: ProfessorId,
    pub availability_id: AvailabilityId,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub meeting_link: Option<String>,
    pub cancellation: Option<Cancellation>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_scheduled(&self) -> bool {
        self.status == BookingStatus::Scheduled
    }

    /// Whether `actor` may cancel this booking
    pub fn can_be_cancelled_by(&self, actor: &Actor) -> bool {
        match actor {
            Actor::Learner(id) => *id == self.learner_id,
            Actor::Professor(id) => *id == self.professor_id,
            Actor::Admin => true,
        }
    }

    /// Whether a session at `at` would be closer than the minimum spacing to this one
    pub fn too_close_to(&self, at: DateTime<Utc>) -> bool {
        let gap = if self.scheduled_at > at {
            self.scheduled_at - at
        } else {
            at - self.scheduled_at
        };
        gap < min_session_spacing()
    }
}

/// Data needed to insert a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub learner_id: LearnerId,
    pub professor_id: ProfessorId,
    pub availability_id: AvailabilityId,
    pub scheduled_at: DateTime<Utc>,
    pub meeting_link: Option<String>,
}
