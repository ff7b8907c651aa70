use crate::entity::subject;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryOrder, SqlErr,
};
use serde::Serialize;
use studydesk_core::domain::DomainError;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct SubjectUpdate {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, new_subject: NewSubject) -> Result<SubjectRecord>;
    async fn find_by_id(&self, id: i32) -> Result<Option<SubjectRecord>>;
    /// All subjects ordered by name ascending.
    async fn list_all(&self) -> Result<Vec<SubjectRecord>>;
    /// Full replace of every mutable field. Returns None when the row is gone.
    async fn update(&self, id: i32, update: SubjectUpdate) -> Result<Option<SubjectRecord>>;
    /// Deleting an absent id is not an error; cascade removes the questions.
    async fn delete(&self, id: i32) -> Result<()>;
    async fn count(&self) -> Result<u64>;
}

#[derive(Clone)]
pub struct SeaOrmSubjectRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: subject::Model) -> SubjectRecord {
        SubjectRecord {
            id: model.id,
            name: model.name,
            description: model.description,
            color: model.color,
            created_at: model.created_at,
        }
    }

    fn map_write_err(err: DbErr) -> anyhow::Error {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::DuplicateSubjectName.into(),
            _ => err.into(),
        }
    }
}

#[async_trait]
impl SubjectRepository for SeaOrmSubjectRepository {
    async fn create(&self, new_subject: NewSubject) -> Result<SubjectRecord> {
        let active_model = subject::ActiveModel {
            name: Set(new_subject.name),
            description: Set(new_subject.description),
            color: Set(new_subject.color),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(Self::map_write_err)?;
        Ok(Self::map_model(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<SubjectRecord>> {
        let model = subject::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(Self::map_model))
    }

    async fn list_all(&self) -> Result<Vec<SubjectRecord>> {
        let models = subject::Entity::find()
            .order_by_asc(subject::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    async fn update(&self, id: i32, update: SubjectUpdate) -> Result<Option<SubjectRecord>> {
        let Some(existing) = subject::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let active_model = subject::ActiveModel {
            id: Set(existing.id),
            name: Set(update.name),
            description: Set(update.description),
            color: Set(update.color),
            ..Default::default()
        };

        let model = active_model
            .update(&self.db)
            .await
            .map_err(Self::map_write_err)?;
        Ok(Some(Self::map_model(model)))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        subject::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(subject::Entity::find().count(&self.db).await?)
    }
}
