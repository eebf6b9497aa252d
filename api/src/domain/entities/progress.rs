//! Learner progress domain entity
//!
//! Completed pages and quizzes for one learner, and the unlock tier derived
//! from them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::learner::LearnerId;

/// First page (inclusive) that unlocks each tier
pub const TIER1_MIN_PAGE: i32 = 7;
pub const TIER2_MIN_PAGE: i32 = 17;
pub const TIER3_MIN_PAGE: i32 = 27;

/// Number of tutoring sessions a learner may hold at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockTier {
    None,
    Tier1,
    Tier2,
    Tier3,
}

impl UnlockTier {
    /// Derive the tier from the highest completed (non-sentinel) page
    pub fn from_max_page(max_page: Option<i32>) -> Self {
        match max_page {
            Some(p) if p >= TIER3_MIN_PAGE => UnlockTier::Tier3,
            Some(p) if p >= TIER2_MIN_PAGE => UnlockTier::Tier2,
            Some(p) if p >= TIER1_MIN_PAGE => UnlockTier::Tier1,
            _ => UnlockTier::None,
        }
    }

    pub fn capacity(&self) -> u32 {
        match self {
            UnlockTier::None => 0,
            UnlockTier::Tier1 => 1,
            UnlockTier::Tier2 => 2,
            UnlockTier::Tier3 => 3,
        }
    }

    /// Page that must be completed to reach the next tier
    pub fn next_unlock_page(&self) -> Option<i32> {
        match self {
            UnlockTier::None => Some(TIER1_MIN_PAGE),
            UnlockTier::Tier1 => Some(TIER2_MIN_PAGE),
            UnlockTier::Tier2 => Some(TIER3_MIN_PAGE),
            UnlockTier::Tier3 => None,
        }
    }
}

impl std::fmt::Display for UnlockTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnlockTier::None => write!(f, "none"),
            UnlockTier::Tier1 => write!(f, "tier1"),
            UnlockTier::Tier2 => write!(f, "tier2"),
            UnlockTier::Tier3 => write!(f, "tier3"),
        }
    }
}

/// Snapshot of what the learner reported through the content layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    pub learner_id: LearnerId,
    pub completed_pages: BTreeSet<i32>,
    pub completed_quizzes: BTreeSet<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    pub fn empty(learner_id: LearnerId) -> Self {
        Self {
            learner_id,
            completed_pages: BTreeSet::new(),
            completed_quizzes: BTreeSet::new(),
            updated_at: None,
        }
    }

    /// Flip membership of `page`. Returns true if the page is now completed.
    pub fn toggle_page(&mut self, page: i32) -> bool {
        flip(&mut self.completed_pages, page)
    }

    /// Flip membership of the quiz for `chapter`. Returns true if now completed.
    pub fn toggle_quiz(&mut self, chapter: i32) -> bool {
        flip(&mut self.completed_quizzes, chapter)
    }

    /// Highest completed page, ignoring the given sentinel pages
    pub fn max_page_excluding(&self, sentinels: &BTreeSet<i32>) -> Option<i32> {
        self.completed_pages
            .iter()
            .rev()
            .find(|p| !sentinels.contains(p))
            .copied()
    }

    pub fn has_all_pages(&self, pages: impl IntoIterator<Item = i32>) -> bool {
        pages.into_iter().all(|p| self.completed_pages.contains(&p))
    }

    pub fn has_quiz(&self, chapter: i32) -> bool {
        self.completed_quizzes.contains(&chapter)
    }
}

fn flip(set: &mut BTreeSet<i32>, value: i32) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

/// Result of one atomic toggle: the record before and after the write
#[derive(Debug, Clone)]
pub struct ProgressChange {
    pub previous: ProgressRecord,
    pub current: ProgressRecord,
}

/// Emitted when a chapter goes from incomplete to complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterCompletedEvent {
    pub learner_id: LearnerId,
    pub chapter_id: i32,
}
