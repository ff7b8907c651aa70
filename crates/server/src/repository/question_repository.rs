use crate::entity::{question, subject};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use serde::Serialize;
use studydesk_core::domain::DomainError;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionRecord {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub question_text: String,
    pub code_answer: String,
    pub difficulty: String,
    pub created_at: NaiveDateTime,
}

/// A question annotated with display metadata from its owning subject.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithSubject {
    #[serde(flatten)]
    pub question: QuestionRecord,
    pub subject_name: String,
    pub subject_color: String,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub subject_id: i32,
    pub title: String,
    pub question_text: String,
    pub code_answer: String,
    pub difficulty: String,
}

#[derive(Debug, Clone)]
pub struct QuestionUpdate {
    pub subject_id: i32,
    pub title: String,
    pub question_text: String,
    pub code_answer: String,
    pub difficulty: String,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord>;
    async fn find_by_id(&self, id: i32) -> Result<Option<QuestionRecord>>;
    /// Question joined with its subject's name and color.
    async fn find_with_subject(&self, id: i32) -> Result<Option<QuestionWithSubject>>;
    /// Questions of one subject, newest first.
    async fn list_by_subject(&self, subject_id: i32) -> Result<Vec<QuestionRecord>>;
    /// Most recently created questions across all subjects, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<QuestionWithSubject>>;
    async fn update(&self, id: i32, update: QuestionUpdate) -> Result<Option<QuestionRecord>>;
    async fn delete(&self, id: i32) -> Result<()>;
    async fn count(&self) -> Result<u64>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: question::Model) -> QuestionRecord {
        QuestionRecord {
            id: model.id,
            subject_id: model.subject_id,
            title: model.title,
            question_text: model.question_text,
            code_answer: model.code_answer,
            difficulty: model.difficulty,
            created_at: model.created_at,
        }
    }

    fn map_joined(
        (model, owner): (question::Model, Option<subject::Model>),
    ) -> Result<QuestionWithSubject> {
        let owner = owner.ok_or_else(|| {
            anyhow!("question {} has no owning subject despite the foreign key", model.id)
        })?;

        Ok(QuestionWithSubject {
            question: Self::map_model(model),
            subject_name: owner.name,
            subject_color: owner.color,
        })
    }

    fn map_write_err(err: DbErr) -> anyhow::Error {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => DomainError::MissingSubject.into(),
            _ => err.into(),
        }
    }
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord> {
        let active_model = question::ActiveModel {
            subject_id: Set(new_question.subject_id),
            title: Set(new_question.title),
            question_text: Set(new_question.question_text),
            code_answer: Set(new_question.code_answer),
            difficulty: Set(new_question.difficulty),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(Self::map_write_err)?;
        Ok(Self::map_model(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<QuestionRecord>> {
        let model = question::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(Self::map_model))
    }

    async fn find_with_subject(&self, id: i32) -> Result<Option<QuestionWithSubject>> {
        let joined = question::Entity::find_by_id(id)
            .find_also_related(subject::Entity)
            .one(&self.db)
            .await?;

        joined.map(Self::map_joined).transpose()
    }

    async fn list_by_subject(&self, subject_id: i32) -> Result<Vec<QuestionRecord>> {
        let models = question::Entity::find()
            .filter(question::Column::SubjectId.eq(subject_id))
            .order_by_desc(question::Column::CreatedAt)
            // Id breaks ties between rows created within the same second.
            .order_by_desc(question::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<QuestionWithSubject>> {
        let joined = question::Entity::find()
            .find_also_related(subject::Entity)
            .order_by_desc(question::Column::CreatedAt)
            .order_by_desc(question::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        joined.into_iter().map(Self::map_joined).collect()
    }

    async fn update(&self, id: i32, update: QuestionUpdate) -> Result<Option<QuestionRecord>> {
        let Some(existing) = question::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let active_model = question::ActiveModel {
            id: Set(existing.id),
            subject_id: Set(update.subject_id),
            title: Set(update.title),
            question_text: Set(update.question_text),
            code_answer: Set(update.code_answer),
            difficulty: Set(update.difficulty),
            ..Default::default()
        };

        let model = active_model
            .update(&self.db)
            .await
            .map_err(Self::map_write_err)?;
        Ok(Some(Self::map_model(model)))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        question::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(question::Entity::find().count(&self.db).await?)
    }
}
