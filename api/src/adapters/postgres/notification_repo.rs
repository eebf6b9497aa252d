//! PostgreSQL adapter for NotificationLogRepository
//!
//! The unique `(learner_id, homework_assignment_id)` constraint is what makes
//! a notification happen at most once; `insert_once` relies on
//! `ON CONFLICT DO NOTHING` instead of a read-then-write.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    HomeworkAssignmentId, LearnerId, NotificationLog, NotificationLogId,
};
use crate::domain::ports::NotificationLogRepository;
use crate::entity::notification_logs;
use crate::error::DomainError;

/// PostgreSQL implementation of NotificationLogRepository
pub struct PostgresNotificationLogRepository {
    db: DatabaseConnection,
}

impl PostgresNotificationLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationLogRepository for PostgresNotificationLogRepository {
    async fn find(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError> {
        let result = notification_logs::Entity::find()
            .filter(notification_logs::Column::LearnerId.eq(learner_id.0))
            .filter(notification_logs::Column::HomeworkAssignmentId.eq(homework_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn insert_once(
        &self,
        learner_id: &LearnerId,
        homework_id: &HomeworkAssignmentId,
    ) -> Result<Option<NotificationLog>, DomainError> {
        let id = Uuid::new_v4();
        let model = notification_logs::ActiveModel {
            id: Set(id),
            learner_id: Set(learner_id.0),
            homework_assignment_id: Set(homework_id.0),
            email_sent: Set(false),
            created_at: Set(Some(Utc::now().fixed_offset())),
        };

        let inserted = notification_logs::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    notification_logs::Column::LearnerId,
                    notification_logs::Column::HomeworkAssignmentId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if inserted == 0 {
            return Ok(None);
        }

        let result = notification_logs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn record_delivery(
        &self,
        id: &NotificationLogId,
        email_sent: bool,
    ) -> Result<(), DomainError> {
        notification_logs::ActiveModel {
            id: Set(id.0),
            email_sent: Set(email_sent),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_undelivered(&self, limit: u64) -> Result<Vec<NotificationLog>, DomainError> {
        let results = notification_logs::Entity::find()
            .filter(notification_logs::Column::EmailSent.eq(false))
            .order_by_asc(notification_logs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

impl From<notification_logs::Model> for NotificationLog {
    fn from(model: notification_logs::Model) -> Self {
        NotificationLog {
            id: NotificationLogId(model.id),
            learner_id: LearnerId(model.learner_id),
            homework_assignment_id: HomeworkAssignmentId(model.homework_assignment_id),
            email_sent: model.email_sent,
            created_at: model
                .created_at
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        }
    }
}
