//!
//! RefineryIQ operations API server.
//! Reads configuration from TOML file (~/.config/refineryiq/config.toml).

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use refineryiq::config::AppConfig;
use refineryiq::infrastructure::ai::{ChatModel, OpenAiCompatModel};
use refineryiq::infrastructure::crypto::jwt::JwtConfig;
use refineryiq::infrastructure::database::migrator::Migrator;
use refineryiq::{create_api_router, default_config_path, init_database, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("REFINERYIQ_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting RefineryIQ API server...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };

    let algorithm = match app_cfg.security.jwt_algorithm.parse::<Algorithm>() {
        Ok(algorithm) => algorithm,
        Err(_) => {
            warn!(
                "Unknown JWT algorithm '{}', falling back to HS256",
                app_cfg.security.jwt_algorithm
            );
            Algorithm::HS256
        }
    };
    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        algorithm,
        expire_minutes: app_cfg.security.jwt_expire_minutes,
    };
    info!(
        "JWT configured with {}min token expiration",
        jwt_config.expire_minutes
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── External generation API ────────────────────────────────
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let chat_model: Option<Arc<dyn ChatModel>> = OpenAiCompatModel::from_config(&app_cfg.ai, http)
        .map(|model| Arc::new(model) as Arc<dyn ChatModel>);
    if chat_model.is_some() {
        info!("Generation API configured: {}", app_cfg.ai.model);
    } else {
        info!("No generation API credential configured; chatbot will serve the static fallback reply");
    }

    info!("Data directory: {}", app_cfg.data.dir.display());

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(db.clone(), jwt_config, chat_model, &app_cfg);

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("RefineryIQ API shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
