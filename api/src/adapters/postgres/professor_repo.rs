//! PostgreSQL adapter for ProfessorRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::entities::{Professor, ProfessorId};
use crate::domain::ports::ProfessorRepository;
use crate::entity::professors;
use crate::error::DomainError;

/// PostgreSQL implementation of ProfessorRepository
pub struct PostgresProfessorRepository {
    db: DatabaseConnection,
}

impl PostgresProfessorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfessorRepository for PostgresProfessorRepository {
    async fn find_by_id(&self, id: &ProfessorId) -> Result<Option<Professor>, DomainError> {
        let result = professors::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Professor::try_from).transpose()
    }
}

impl TryFrom<professors::Model> for Professor {
    type Error = DomainError;

    fn try_from(model: professors::Model) -> Result<Self, Self::Error> {
        Ok(Professor {
            id: ProfessorId(model.id),
            name: model.name,
            gender: model.gender.parse().map_err(|e: String| {
                DomainError::Internal(format!("professor {}: {}", model.id, e))
            })?,
            meeting_id: model.meeting_id,
            meeting_password: model.meeting_password,
        })
    }
}
