//! Progress handlers
//!
//! Called by the content-delivery frontend as the learner reads and takes
//! quizzes, and by the booking UI to show what is unlocked.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::curriculum::Curriculum;
use crate::app::progress_service::{tier_for, UnlockStatus};
use crate::domain::entities::{LearnerId, ProgressRecord};
use crate::error::AppError;
use crate::AppState;

/// Progress as shown to the learner
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub learner_id: String,
    pub completed_pages: Vec<i32>,
    pub completed_quizzes: Vec<i32>,
    pub updated_at: Option<String>,
    pub unlock: UnlockStatus,
}

impl ProgressResponse {
    fn new(record: ProgressRecord, curriculum: &Curriculum) -> Self {
        let tier = tier_for(&record, curriculum);
        Self {
            learner_id: record.learner_id.to_string(),
            completed_pages: record.completed_pages.into_iter().collect(),
            completed_quizzes: record.completed_quizzes.into_iter().collect(),
            updated_at: record.updated_at.map(|t| t.to_rfc3339()),
            unlock: UnlockStatus {
                tier,
                capacity: tier.capacity(),
                next_unlock_page: tier.next_unlock_page(),
            },
        }
    }
}

/// POST /learners/:id/pages/:page/toggle
///
/// Mark a page read, or unread if it already was.
pub async fn toggle_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(Uuid, i32)>,
) -> Result<Json<ProgressResponse>, AppError> {
    let ledger = &state.progress_service;
    let record = ledger.toggle_page(&LearnerId(id), page).await?;
    Ok(Json(ProgressResponse::new(record, ledger.curriculum())))
}

/// POST /learners/:id/quizzes/:chapter/toggle
///
/// Mark a chapter quiz passed, or not passed if it already was.
pub async fn toggle_quiz(
    State(state): State<AppState>,
    Path((id, chapter)): Path<(Uuid, i32)>,
) -> Result<Json<ProgressResponse>, AppError> {
    let ledger = &state.progress_service;
    let record = ledger.toggle_quiz(&LearnerId(id), chapter).await?;
    Ok(Json(ProgressResponse::new(record, ledger.curriculum())))
}

/// GET /learners/:id/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, AppError> {
    let ledger = &state.progress_service;
    let record = ledger.record(&LearnerId(id)).await?;
    Ok(Json(ProgressResponse::new(record, ledger.curriculum())))
}

/// GET /learners/:id/unlock-status
pub async fn get_unlock_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UnlockStatus>, AppError> {
    let status = state
        .progress_service
        .unlock_status(&LearnerId(id))
        .await?;
    Ok(Json(status))
}
