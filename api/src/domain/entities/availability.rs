//! Availability domain entity
//!
//! A bookable window published by a professor, either every week on a
//! weekday or once on a specific date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::professor::ProfessorId;
use crate::error::DomainError;

/// Shortest and longest allowed session window, in minutes
pub const MIN_WINDOW_MINUTES: i64 = 30;
pub const MAX_WINDOW_MINUTES: i64 = 60;

/// Unique identifier for an availability window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityId(pub Uuid);

impl AvailabilityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AvailabilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AvailabilityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AvailabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which day(s) a window applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    Weekly { day: Weekday },
    Date { date: NaiveDate },
}

impl Schedule {
    /// Whether a session on `date` can be booked against this schedule
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        match self {
            Schedule::Weekly { day } => date.weekday() == *day,
            Schedule::Date { date: d } => *d == date,
        }
    }

    /// Whether two schedules can ever fall on the same calendar day
    pub fn shares_day(&self, other: &Schedule) -> bool {
        match (self, other) {
            (Schedule::Weekly { day: a }, Schedule::Weekly { day: b }) => a == b,
            (Schedule::Date { date: a }, Schedule::Date { date: b }) => a == b,
            (Schedule::Weekly { day }, Schedule::Date { date })
            | (Schedule::Date { date }, Schedule::Weekly { day }) => date.weekday() == *day,
        }
    }

    /// Sort key: weekday index first, then date
    pub fn sort_key(&self) -> (u32, Option<NaiveDate>) {
        match self {
            Schedule::Weekly { day } => (day.num_days_from_monday(), None),
            Schedule::Date { date } => (date.weekday().num_days_from_monday(), Some(*date)),
        }
    }
}

/// Parse a strict `HH:MM` 24h time
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, DomainError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !well_formed {
        return Err(DomainError::Validation(format!(
            "time '{}' must be formatted as HH:MM",
            value
        )));
    }

    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| DomainError::Validation(format!("time '{}' is not a valid time", value)))
}

/// A validated start/end pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Validate format, ordering and duration bounds
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;

        if end <= start {
            return Err(DomainError::Validation(
                "end time must be after start time".to_string(),
            ));
        }

        let window = Self { start, end };
        let minutes = window.duration_minutes();
        if !(MIN_WINDOW_MINUTES..=MAX_WINDOW_MINUTES).contains(&minutes) {
            return Err(DomainError::Validation(format!(
                "window must last between {} and {} minutes, got {}",
                MIN_WINDOW_MINUTES, MAX_WINDOW_MINUTES, minutes
            )));
        }

        Ok(window)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open interval intersection
    pub fn intersects(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// A professor's bookable window
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub id: AvailabilityId,
    pub professor_id: ProfessorId,
    pub schedule: Schedule,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether a new window on `schedule` would collide with this one
    pub fn conflicts_with(&self, schedule: &Schedule, window: &TimeWindow) -> bool {
        self.is_active && self.schedule.shares_day(schedule) && self.window().intersects(window)
    }
}

/// Data needed to publish a new availability
#[derive(Debug, Clone)]
pub struct NewAvailability {
    pub professor_id: ProfessorId,
    pub schedule: Schedule,
    pub window: TimeWindow,
    pub is_recurring: bool,
}
