/// Upload Service - HTTP Server
///
/// Serves `POST /api/upload` and the health endpoints on 0.0.0.0:3000 by default.
use actix_cors::Cors;
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload_service::config::{LogConfig, LogFormat, SERVICE_NAME};
use upload_service::db::{MySqlPostRepository, MIGRATOR};
use upload_service::services::storage::S3Storage;
use upload_service::{AppState, Config};

fn init_tracing(config: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,upload_service=debug,db_pool=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!(env = %config.app.env, "{} starting", SERVICE_NAME);
    config.database.log_config();

    // Initialize database connection pool
    let db_pool = db_pool::create_pool(config.database.clone())
        .await
        .context("Failed to connect to database")?;

    if config.app.run_migrations {
        MIGRATOR
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let storage = S3Storage::from_config(&config.s3).await;
    let posts = MySqlPostRepository::new(db_pool, SERVICE_NAME);
    let state = web::Data::new(AppState::new(Arc::new(storage), Arc::new(posts)));

    let bind_address = config.app.bind_address();
    tracing::info!("Server running on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(actix_middleware::Logger::default())
            .wrap(Cors::permissive())
            .configure(upload_service::routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("{} shutting down", SERVICE_NAME);
    Ok(())
}
