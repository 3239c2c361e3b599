//! Route modules, one per API area.

pub mod anomalies;
pub mod auth;
pub mod chatbot;
pub mod forecasts;
pub mod health;
pub mod kpis;
pub mod recommendations;
