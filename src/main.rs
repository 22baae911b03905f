use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

use ops_portal::config::{Config, LogFormat};
use ops_portal::db;
use ops_portal::routes::create_routes;
use ops_portal::services::seed::seed_solution_stacks;

const DEFAULT_LOG_FILTER: &str = "ops_portal=info,tower_http=info,sea_orm=warn";

#[derive(Parser, Debug)]
#[command(name = "ops-portal", version, about = "OpsPortal solution stack API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run migrations, optionally seed, then serve the API (default)
    Serve {
        /// Overrides BIND_ADDRESS
        #[arg(long)]
        bind: Option<String>,
    },
    /// Apply pending migrations and exit
    Migrate,
    /// Insert the sample solution stacks into an empty table and exit
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    let db = db::connect(&config).await?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Migrate => {
            Migrator::up(&db, None).await?;
            tracing::info!("Migrations applied");
        }
        Command::Seed => {
            Migrator::up(&db, None).await?;
            seed_solution_stacks(&db).await?;
        }
        Command::Serve { bind } => {
            Migrator::up(&db, None).await?;
            if config.seed_data {
                seed_solution_stacks(&db).await?;
            }

            let bind_address = bind.unwrap_or_else(|| config.bind_address.clone());
            let app = create_routes(db, &config);

            let listener = tokio::net::TcpListener::bind(&bind_address).await?;
            tracing::info!(
                address = %listener.local_addr()?,
                environment = ?config.environment,
                "OpsPortal listening"
            );

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            tracing::info!("Server stopped");
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
