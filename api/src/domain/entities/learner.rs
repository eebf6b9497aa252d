//! Learner domain entity
//!
//! A learner working through the course who can book tutoring sessions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::professor::ProfessorId;

/// Unique identifier for a learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LearnerId(pub Uuid);

impl LearnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LearnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LearnerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LearnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gender used by the professor pairing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// A learner enrolled in the course
#[derive(Debug, Clone, Serialize)]
pub struct Learner {
    pub id: LearnerId,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    /// Professor the learner is paired with, set on the first booking
    pub professor_id: Option<ProfessorId>,
}

impl Learner {
    /// True once the learner has been paired with a professor
    pub fn is_paired(&self) -> bool {
        self.professor_id.is_some()
    }
}
