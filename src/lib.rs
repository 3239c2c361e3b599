//! # RefineryIQ Operations API
//!
//! Backend API exposing refinery operational metrics (KPIs, anomalies,
//! forecasts, recommendations) sourced from CSV exports and a persisted
//! store, plus a chatbot endpoint proxying an external generation API.
//!
//! ## Architecture
//!
//! - **domain**: error taxonomy shared by every layer
//! - **application**: read-and-reshape services over the exports and store
//! - **infrastructure**: external concerns (database, CSV datasets, crypto,
//!   generation-API client)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
