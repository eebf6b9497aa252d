//! Homework domain entities
//!
//! Assignments attached to chapters, and the log that guarantees each
//! learner is notified about an assignment at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::learner::LearnerId;

/// Unique identifier for a homework assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HomeworkAssignmentId(pub Uuid);

impl HomeworkAssignmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HomeworkAssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HomeworkAssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Homework handed out when a chapter is completed
#[derive(Debug, Clone, Serialize)]
pub struct HomeworkAssignment {
    pub id: HomeworkAssignmentId,
    pub chapter_id: i32,
    pub title: String,
    pub content: String,
}

/// Unique identifier for a notification log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationLogId(pub Uuid);

impl NotificationLogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationLogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row per (learner, assignment). Its existence is the dedup guarantee;
/// `email_sent` only records how delivery went.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationLog {
    pub id: NotificationLogId,
    pub learner_id: LearnerId,
    pub homework_assignment_id: HomeworkAssignmentId,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
}
