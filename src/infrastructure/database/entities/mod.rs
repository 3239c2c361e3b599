//! Database entities module

pub mod chatbot_log;
pub mod kpi_snapshot;
pub mod user;

pub use chatbot_log::Entity as ChatbotLog;
pub use kpi_snapshot::Entity as KpiSnapshot;
pub use user::Entity as User;
