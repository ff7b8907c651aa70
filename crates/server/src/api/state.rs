//! Shared application state handed to every handler.

use std::sync::Arc;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use tera::Tera;

use crate::config::ServerConfig;
use crate::repository::{
    AdminUserRepository, QuestionRepository, SeaOrmAdminUserRepository, SeaOrmQuestionRepository,
    SeaOrmSubjectRepository, SubjectRepository,
};
use crate::session::SessionStore;
use crate::templates;

pub struct AppState {
    pub subjects: Arc<dyn SubjectRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub admins: Arc<dyn AdminUserRepository>,
    pub sessions: SessionStore,
    pub templates: Tera,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            subjects: Arc::new(SeaOrmSubjectRepository::new(db.clone())),
            questions: Arc::new(SeaOrmQuestionRepository::new(db.clone())),
            admins: Arc::new(SeaOrmAdminUserRepository::new(db)),
            sessions: SessionStore::new(config.session_ttl),
            templates: templates::build_templates()?,
            secure_cookies: config.secure_cookies,
        })
    }
}
