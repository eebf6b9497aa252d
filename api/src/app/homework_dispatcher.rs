//! Homework dispatcher
//!
//! Sends a chapter's homework to the learner the first time the chapter is
//! completed. The notification log row is claimed before any email goes out,
//! so concurrent completions produce one row and one send.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::app::progress_service::ChapterCompletionListener;
use crate::domain::entities::{ChapterCompletedEvent, NotificationLog};
use crate::domain::ports::{
    EmailDelivery, HomeworkRepository, LearnerRepository, NotificationLogRepository,
};
use crate::error::{AppError, DomainError};

/// Why a completion did not lead to a send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    NoAssignment,
    AlreadyNotified,
}

#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    NoOp(NoOpReason),
    /// This call owned the notification; `log.email_sent` holds the delivery result
    Dispatched { log: NotificationLog },
}

pub struct HomeworkDispatcher<HR, NR, LR, EM>
where
    HR: HomeworkRepository,
    NR: NotificationLogRepository,
    LR: LearnerRepository,
    EM: EmailDelivery,
{
    homework: Arc<HR>,
    notifications: Arc<NR>,
    learners: Arc<LR>,
    email: Arc<EM>,
}

impl<HR, NR, LR, EM> HomeworkDispatcher<HR, NR, LR, EM>
where
    HR: HomeworkRepository,
    NR: NotificationLogRepository,
    LR: LearnerRepository,
    EM: EmailDelivery,
{
    pub fn new(homework: Arc<HR>, notifications: Arc<NR>, learners: Arc<LR>, email: Arc<EM>) -> Self {
        Self {
            homework,
            notifications,
            learners,
            email,
        }
    }

    pub async fn dispatch(&self, event: ChapterCompletedEvent) -> Result<DispatchOutcome, AppError> {
        let Some(assignment) = self.homework.find_by_chapter(event.chapter_id).await? else {
            tracing::debug!(chapter = event.chapter_id, "No homework for chapter");
            return Ok(DispatchOutcome::NoOp(NoOpReason::NoAssignment));
        };

        // Fast path; the insert below is what actually decides
        if self
            .notifications
            .find(&event.learner_id, &assignment.id)
            .await?
            .is_some()
        {
            return Ok(DispatchOutcome::NoOp(NoOpReason::AlreadyNotified));
        }

        let learner = self
            .learners
            .find_by_id(&event.learner_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Learner {} not found", event.learner_id))
            })?;

        let Some(mut log) = self
            .notifications
            .insert_once(&learner.id, &assignment.id)
            .await?
        else {
            tracing::debug!(
                learner = %learner.id,
                homework = %assignment.id,
                "Notification claimed by a concurrent request"
            );
            return Ok(DispatchOutcome::NoOp(NoOpReason::AlreadyNotified));
        };

        let sent = match self.email.send_homework(&assignment, &learner).await {
            Ok(()) => {
                tracing::info!(
                    learner = %learner.id,
                    homework = %assignment.id,
                    chapter = event.chapter_id,
                    "Homework email sent"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    learner = %learner.id,
                    homework = %assignment.id,
                    chapter = event.chapter_id,
                    error = %e,
                    "Homework email delivery failed"
                );
                false
            }
        };

        if sent {
            self.notifications.record_delivery(&log.id, true).await?;
        }
        log.email_sent = sent;

        Ok(DispatchOutcome::Dispatched { log })
    }

    /// Logged notifications whose email never went out, oldest first
    pub async fn failed_deliveries(&self, limit: u64) -> Result<Vec<NotificationLog>, AppError> {
        Ok(self.notifications.find_undelivered(limit).await?)
    }
}

#[async_trait]
impl<HR, NR, LR, EM> ChapterCompletionListener for HomeworkDispatcher<HR, NR, LR, EM>
where
    HR: HomeworkRepository,
    NR: NotificationLogRepository,
    LR: LearnerRepository,
    EM: EmailDelivery,
{
    async fn on_chapter_completed(&self, event: ChapterCompletedEvent) -> Result<(), AppError> {
        self.dispatch(event).await.map(|_| ())
    }
}
