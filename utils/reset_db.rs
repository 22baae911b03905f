use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use std::env;

const TABLES: &[&str] = &["solution_stacks", "seaql_migrations"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    let db = Database::connect(database_url).await?;
    let backend = db.get_database_backend();

    for table in TABLES {
        let sql = match backend {
            DbBackend::Postgres => format!("DROP TABLE IF EXISTS \"{table}\" CASCADE;"),
            _ => format!("DROP TABLE IF EXISTS \"{table}\";"),
        };
        db.execute(Statement::from_string(backend, sql)).await?;
        println!("Dropped {table}");
    }

    println!("Database reset successfully");
    Ok(())
}
