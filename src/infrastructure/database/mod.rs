//! Database infrastructure: connection lifecycle, entities and migrations.

pub mod entities;
pub mod migrator;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: String,
}

/// Initialize the shared database connection pool. Opened once at process
/// start and closed explicitly at shutdown.
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    options.connect_timeout(Duration::from_secs(10));
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}
