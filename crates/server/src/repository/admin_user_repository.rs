use crate::entity::admin_user;
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Debug, Clone)]
pub struct AdminUserRecord {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

/// Read-only: the bootstrap seeder is the only writer of admin accounts.
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmAdminUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdminUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: admin_user::Model) -> AdminUserRecord {
        AdminUserRecord {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}

#[async_trait]
impl AdminUserRepository for SeaOrmAdminUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUserRecord>> {
        let model = admin_user::Entity::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model))
    }
}
