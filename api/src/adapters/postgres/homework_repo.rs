//! PostgreSQL adapter for HomeworkRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::entities::{HomeworkAssignment, HomeworkAssignmentId};
use crate::domain::ports::HomeworkRepository;
use crate::entity::homework_assignments;
use crate::error::DomainError;

/// PostgreSQL implementation of HomeworkRepository
pub struct PostgresHomeworkRepository {
    db: DatabaseConnection,
}

impl PostgresHomeworkRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HomeworkRepository for PostgresHomeworkRepository {
    async fn find_by_chapter(
        &self,
        chapter_id: i32,
    ) -> Result<Option<HomeworkAssignment>, DomainError> {
        let result = homework_assignments::Entity::find()
            .filter(homework_assignments::Column::ChapterId.eq(chapter_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

impl From<homework_assignments::Model> for HomeworkAssignment {
    fn from(model: homework_assignments::Model) -> Self {
        HomeworkAssignment {
            id: HomeworkAssignmentId(model.id),
            chapter_id: model.chapter_id,
            title: model.title,
            content: model.content,
        }
    }
}
