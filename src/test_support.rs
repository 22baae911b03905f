use chrono::{TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::entities::solution_stack::{self, slugify};

/// Migrated in-memory SQLite database. A single pooled connection keeps
/// every query on the same in-memory schema.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Inserts a stack created on day `day` of January 2024 and updated a day later.
pub async fn insert_stack(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    category: &str,
    day: u32,
) -> solution_stack::Model {
    let created_at = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap();

    solution_stack::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slugify(name)),
        description: Set(description.to_string()),
        category: Set(category.to_string()),
        status: Set("Active".to_string()),
        owner: Set("platform-team".to_string()),
        created_at: Set(created_at),
        updated_at: Set(created_at + chrono::Duration::days(1)),
    }
    .insert(db)
    .await
    .unwrap()
}
