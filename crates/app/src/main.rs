use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerly={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone: Tz = settings
        .server
        .timezone
        .parse()
        .map_err(|err| format!("invalid server.timezone: {err}"))?;

    let db = connect_database(&settings.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .timeout(Duration::from_secs(settings.database.operation_timeout_secs))
        .max_page_size(settings.server.max_page_size)
        .build()
        .await?;

    let config = server::ServerConfig {
        addr: format!("{}:{}", settings.server.bind, settings.server.port),
        timezone,
        export_dir: PathBuf::from(&settings.server.export_dir),
        default_page_size: settings
            .server
            .default_page_size
            .min(settings.server.max_page_size),
    };
    tracing::info!(
        timezone = %config.timezone,
        export_dir = %config.export_dir.display(),
        "starting server"
    );

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    server::run_with_listener(engine, config, listener).await?;

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
