//! Professor domain entity
//!
//! Professors are managed outside this service; we only read the fields
//! needed for pairing and meeting links.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::learner::Gender;

/// Unique identifier for a professor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfessorId(pub Uuid);

impl ProfessorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfessorId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProfessorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProfessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

const MEETING_BASE_URL: &str = "https://zoom.us/j/";

/// A professor offering tutoring sessions
#[derive(Debug, Clone, Serialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
    pub gender: Gender,
    #[serde(skip_serializing)]
    pub meeting_id: Option<String>,
    #[serde(skip_serializing)]
    pub meeting_password: Option<String>,
}

impl Professor {
    /// Build the join link for this professor's personal meeting room.
    ///
    /// Deterministic in the stored meeting id and password; `None` when the
    /// professor has not configured a room.
    pub fn meeting_link(&self) -> Option<String> {
        let meeting_id: String = self
            .meeting_id
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if meeting_id.is_empty() {
            return None;
        }

        match self.meeting_password.as_deref().map(str::trim) {
            Some(pwd) if !pwd.is_empty() => Some(format!(
                "{}{}?pwd={}",
                MEETING_BASE_URL,
                meeting_id,
                urlencoding::encode(pwd)
            )),
            _ => Some(format!("{}{}", MEETING_BASE_URL, meeting_id)),
        }
    }

    /// Pairing policy: learners are matched with professors of the same gender
    pub fn can_tutor(&self, learner_gender: Gender) -> bool {
        self.gender == learner_gender
    }
}
