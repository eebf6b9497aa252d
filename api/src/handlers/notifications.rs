//! Notification handlers
//!
//! Operator view of homework emails that never went out.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::NotificationLog;
use crate::error::AppError;
use crate::AppState;

const MAX_LIMIT: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct FailedNotificationsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub learner_id: String,
    pub homework_assignment_id: String,
    pub email_sent: bool,
    pub created_at: String,
}

impl From<NotificationLog> for NotificationResponse {
    fn from(n: NotificationLog) -> Self {
        NotificationResponse {
            id: n.id.to_string(),
            learner_id: n.learner_id.to_string(),
            homework_assignment_id: n.homework_assignment_id.to_string(),
            email_sent: n.email_sent,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// GET /notifications/failed
pub async fn list_failed_notifications(
    State(state): State<AppState>,
    Query(query): Query<FailedNotificationsQuery>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let logs = state
        .homework_dispatcher
        .failed_deliveries(query.limit.min(MAX_LIMIT))
        .await?;

    Ok(Json(logs.into_iter().map(Into::into).collect()))
}
