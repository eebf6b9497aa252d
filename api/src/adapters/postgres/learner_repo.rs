//! PostgreSQL adapter for LearnerRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::entities::{Learner, LearnerId, ProfessorId};
use crate::domain::ports::LearnerRepository;
use crate::entity::learners;
use crate::error::DomainError;

/// PostgreSQL implementation of LearnerRepository
pub struct PostgresLearnerRepository {
    db: DatabaseConnection,
}

impl PostgresLearnerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LearnerRepository for PostgresLearnerRepository {
    async fn find_by_id(&self, id: &LearnerId) -> Result<Option<Learner>, DomainError> {
        let result = learners::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Learner::try_from).transpose()
    }
}

impl TryFrom<learners::Model> for Learner {
    type Error = DomainError;

    fn try_from(model: learners::Model) -> Result<Self, Self::Error> {
        Ok(Learner {
            id: LearnerId(model.id),
            name: model.name,
            email: model.email,
            gender: model.gender.parse().map_err(|e: String| {
                DomainError::Internal(format!("learner {}: {}", model.id, e))
            })?,
            professor_id: model.professor_id.map(ProfessorId),
        })
    }
}
