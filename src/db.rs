use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

/// Opens the connection pool. The backend follows the `DATABASE_URL` scheme
/// (`postgres://` or `sqlite:`).
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(config.db_connect_timeout)
        .acquire_timeout(config.db_connect_timeout)
        .sqlx_logging(config.is_development());

    tracing::info!(backend = backend_name(&config.database_url), "Connecting to database");
    let db = Database::connect(options).await?;
    tracing::info!("Database connected successfully");

    Ok(db)
}

fn backend_name(url: &str) -> &'static str {
    if url.starts_with("postgres") {
        "postgres"
    } else if url.starts_with("sqlite") {
        "sqlite"
    } else {
        "unknown"
    }
}
