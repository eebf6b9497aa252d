//! Progress service
//!
//! The server-owned ledger of completed pages and quizzes. Derives the
//! learner's unlock tier and detects chapters that just became complete.
//!
//! Completion is detected on the before/after pair returned by a single
//! atomic toggle in storage, and the listener runs in the same request.
//! A failing listener never fails the toggle.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::app::curriculum::Curriculum;
use crate::domain::entities::{
    ChapterCompletedEvent, LearnerId, ProgressChange, ProgressRecord, UnlockTier,
};
use crate::domain::ports::ProgressRepository;
use crate::error::AppError;

/// Reacts to a chapter going from incomplete to complete
#[async_trait]
pub trait ChapterCompletionListener: Send + Sync {
    async fn on_chapter_completed(&self, event: ChapterCompletedEvent) -> Result<(), AppError>;
}

/// What the booking UI shows about a learner's entitlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnlockStatus {
    pub tier: UnlockTier,
    pub capacity: u32,
    pub next_unlock_page: Option<i32>,
}

/// Tier for a record, sentinel pages ignored
pub fn tier_for(record: &ProgressRecord, curriculum: &Curriculum) -> UnlockTier {
    UnlockTier::from_max_page(record.max_page_excluding(&curriculum.sentinel_pages))
}

/// All required pages plus the quiz. Sentinel and unknown chapters are never complete.
pub fn is_chapter_complete(record: &ProgressRecord, curriculum: &Curriculum, chapter: i32) -> bool {
    match curriculum.chapter(chapter) {
        Some(c) => record.has_all_pages(curriculum.required_pages(c)) && record.has_quiz(chapter),
        None => false,
    }
}

/// Service owning learner progress
pub struct ProgressService<PR>
where
    PR: ProgressRepository,
{
    progress: Arc<PR>,
    curriculum: Arc<Curriculum>,
    listener: Option<Arc<dyn ChapterCompletionListener>>,
}

impl<PR> ProgressService<PR>
where
    PR: ProgressRepository,
{
    pub fn new(progress: Arc<PR>, curriculum: Arc<Curriculum>) -> Self {
        Self {
            progress,
            curriculum,
            listener: None,
        }
    }

    /// Attach the consumer of chapter-completion events
    pub fn with_listener(mut self, listener: Arc<dyn ChapterCompletionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Current record for a learner
    pub async fn record(&self, learner_id: &LearnerId) -> Result<ProgressRecord, AppError> {
        Ok(self.progress.find(learner_id).await?)
    }

    /// Flip a page. Sentinel pages are accepted and ignored.
    pub async fn toggle_page(
        &self,
        learner_id: &LearnerId,
        page: i32,
    ) -> Result<ProgressRecord, AppError> {
        self.curriculum.check_page(page)?;

        if self.curriculum.is_sentinel_page(page) {
            tracing::debug!(learner = %learner_id, page, "Ignoring sentinel page toggle");
            return self.record(learner_id).await;
        }

        let change = self.progress.toggle_page(learner_id, page).await?;
        tracing::debug!(
            learner = %learner_id,
            page,
            completed = change.current.completed_pages.contains(&page),
            "Page toggled"
        );

        if let Some(chapter) = self.curriculum.chapter_of_page(page) {
            self.emit_if_completed(&change, chapter.id).await;
        }

        Ok(change.current)
    }

    /// Flip a chapter quiz. Sentinel chapters are accepted and ignored.
    pub async fn toggle_quiz(
        &self,
        learner_id: &LearnerId,
        chapter: i32,
    ) -> Result<ProgressRecord, AppError> {
        self.curriculum.check_chapter(chapter)?;

        if self.curriculum.is_sentinel_chapter(chapter) {
            tracing::debug!(learner = %learner_id, chapter, "Ignoring sentinel quiz toggle");
            return self.record(learner_id).await;
        }

        let change = self.progress.toggle_quiz(learner_id, chapter).await?;
        tracing::debug!(
            learner = %learner_id,
            chapter,
            completed = change.current.completed_quizzes.contains(&chapter),
            "Quiz toggled"
        );

        self.emit_if_completed(&change, chapter).await;

        Ok(change.current)
    }

    pub async fn unlock_tier(&self, learner_id: &LearnerId) -> Result<UnlockTier, AppError> {
        let record = self.record(learner_id).await?;
        Ok(tier_for(&record, &self.curriculum))
    }

    pub async fn unlock_status(&self, learner_id: &LearnerId) -> Result<UnlockStatus, AppError> {
        let tier = self.unlock_tier(learner_id).await?;
        Ok(UnlockStatus {
            tier,
            capacity: tier.capacity(),
            next_unlock_page: tier.next_unlock_page(),
        })
    }

    pub async fn chapter_complete(
        &self,
        learner_id: &LearnerId,
        chapter: i32,
    ) -> Result<bool, AppError> {
        self.curriculum.check_chapter(chapter)?;
        let record = self.record(learner_id).await?;
        Ok(is_chapter_complete(&record, &self.curriculum, chapter))
    }

    async fn emit_if_completed(&self, change: &ProgressChange, chapter: i32) {
        let was = is_chapter_complete(&change.previous, &self.curriculum, chapter);
        let now = is_chapter_complete(&change.current, &self.curriculum, chapter);
        if was || !now {
            return;
        }

        let event = ChapterCompletedEvent {
            learner_id: change.current.learner_id,
            chapter_id: chapter,
        };
        tracing::info!(learner = %event.learner_id, chapter, "Chapter completed");

        let Some(listener) = &self.listener else {
            return;
        };
        if let Err(e) = listener.on_chapter_completed(event).await {
            tracing::error!(
                learner = %event.learner_id,
                chapter,
                error = %e,
                "Chapter completion handler failed"
            );
        }
    }
}
