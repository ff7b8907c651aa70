//! Database bootstrap: connect, migrate, seed. Runs before any route is
//! served and is safe to repeat on every process start.

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use studydesk_migration::{Migrator, MigratorTrait};
use tracing::info;

use crate::auth;
use crate::entity::{admin_user, subject};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Seed subjects inserted when the subject table is empty.
const SEED_SUBJECTS: &[(&str, &str, &str)] = &[
    ("AJP", "Advanced Java Programming", "#e74c3c"),
    ("DSV", "Data Structures and Visualization", "#2ecc71"),
    ("DAA", "Design and Analysis of Algorithms", "#f39c12"),
    ("DBMS", "Database Management Systems", "#9b59b6"),
    ("Web Tech", "Web Technologies", "#1abc9c"),
];

pub async fn init_pool_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to {database_url}"))?;

    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    Ok(db)
}

/// Inserts the default admin account and the sample subjects when absent.
/// No side effects on a populated store.
pub async fn seed(db: &DatabaseConnection) -> Result<()> {
    let admin = admin_user::Entity::find()
        .filter(admin_user::Column::Username.eq(DEFAULT_ADMIN_USERNAME))
        .one(db)
        .await?;

    if admin.is_none() {
        let password_hash = auth::hash_password(DEFAULT_ADMIN_PASSWORD)?;
        admin_user::ActiveModel {
            username: Set(DEFAULT_ADMIN_USERNAME.to_string()),
            password_hash: Set(password_hash),
            ..Default::default()
        }
        .insert(db)
        .await
        .context("failed to seed default admin user")?;
        info!(username = DEFAULT_ADMIN_USERNAME, "seeded default admin user");
    }

    let subject_count = subject::Entity::find().count(db).await?;
    if subject_count == 0 {
        for (name, description, color) in SEED_SUBJECTS {
            subject::ActiveModel {
                name: Set((*name).to_string()),
                description: Set(Some((*description).to_string())),
                color: Set((*color).to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .with_context(|| format!("failed to seed subject '{name}'"))?;
        }
        info!(count = SEED_SUBJECTS.len(), "seeded sample subjects");
    }

    Ok(())
}
