//! PostgreSQL adapter for ProgressRepository
//!
//! A toggle is one transaction: make sure the row exists, lock it, flip the
//! membership and write it back. Concurrent toggles for the same learner
//! queue on the row lock, so no update is lost.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use crate::domain::entities::{LearnerId, ProgressChange, ProgressRecord};
use crate::domain::ports::ProgressRepository;
use crate::entity::learner_progress;
use crate::error::DomainError;

/// PostgreSQL implementation of ProgressRepository
pub struct PostgresProgressRepository {
    db: DatabaseConnection,
}

impl PostgresProgressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn toggle(
        &self,
        learner_id: &LearnerId,
        flip: impl FnOnce(&mut ProgressRecord) + Send,
    ) -> Result<ProgressChange, DomainError> {
        let txn = self.db.begin().await?;

        learner_progress::Entity::insert(learner_progress::ActiveModel {
            learner_id: Set(learner_id.0),
            completed_pages: Set(serde_json::json!([])),
            completed_quizzes: Set(serde_json::json!([])),
            updated_at: Set(None),
        })
        .on_conflict(
            OnConflict::column(learner_progress::Column::LearnerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::NotFound(format!("Learner {} not found", learner_id))
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        let model = learner_progress::Entity::find_by_id(learner_id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!("progress row for {} vanished", learner_id))
            })?;

        let previous = ProgressRecord::try_from(model)?;
        let mut current = previous.clone();
        flip(&mut current);
        let now = Utc::now();
        current.updated_at = Some(now);

        learner_progress::ActiveModel {
            learner_id: Set(learner_id.0),
            completed_pages: Set(to_json(&current.completed_pages)?),
            completed_quizzes: Set(to_json(&current.completed_quizzes)?),
            updated_at: Set(Some(now.fixed_offset())),
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        Ok(ProgressChange { previous, current })
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn find(&self, learner_id: &LearnerId) -> Result<ProgressRecord, DomainError> {
        let result = learner_progress::Entity::find_by_id(learner_id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => ProgressRecord::try_from(model),
            None => Ok(ProgressRecord::empty(*learner_id)),
        }
    }

    async fn toggle_page(
        &self,
        learner_id: &LearnerId,
        page: i32,
    ) -> Result<ProgressChange, DomainError> {
        self.toggle(learner_id, |record| {
            record.toggle_page(page);
        })
        .await
    }

    async fn toggle_quiz(
        &self,
        learner_id: &LearnerId,
        chapter: i32,
    ) -> Result<ProgressChange, DomainError> {
        self.toggle(learner_id, |record| {
            record.toggle_quiz(chapter);
        })
        .await
    }
}

fn to_json(set: &BTreeSet<i32>) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(set).map_err(|e| DomainError::Internal(e.to_string()))
}

fn from_json(value: serde_json::Value) -> Result<BTreeSet<i32>, DomainError> {
    serde_json::from_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}

impl TryFrom<learner_progress::Model> for ProgressRecord {
    type Error = DomainError;

    fn try_from(model: learner_progress::Model) -> Result<Self, Self::Error> {
        Ok(ProgressRecord {
            learner_id: LearnerId(model.learner_id),
            completed_pages: from_json(model.completed_pages)?,
            completed_quizzes: from_json(model.completed_quizzes)?,
            updated_at: model.updated_at.map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
