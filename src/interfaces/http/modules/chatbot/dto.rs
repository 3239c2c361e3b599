//! Chatbot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatbotRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    /// Free-form context (KPI figures, active alerts, recommendations)
    /// embedded verbatim into the prompt.
    #[schema(value_type = Option<Object>)]
    pub context: Option<serde_json::Value>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatbotResponse {
    pub reply: String,
    pub created_at: DateTime<Utc>,
    /// Absent when the static fallback produced the reply.
    pub model: Option<String>,
}
