//! Chatbot API handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use super::dto::{ChatbotRequest, ChatbotResponse};
use crate::application::chat::{generate_reply, record_exchange};
use crate::infrastructure::ai::ChatModel;
use crate::interfaces::http::common::ValidatedJson;

/// Chatbot handler state. `model` is `None` when no generation credential
/// is configured.
#[derive(Clone)]
pub struct ChatbotHandlerState {
    pub db: DatabaseConnection,
    pub model: Option<Arc<dyn ChatModel>>,
}

#[utoipa::path(
    post,
    path = "/chatbot",
    tag = "Chatbot",
    request_body = ChatbotRequest,
    responses(
        (status = 200, description = "Generated or fallback reply", body = ChatbotResponse),
        (status = 422, description = "Empty message")
    )
)]
pub async fn chatbot(
    State(state): State<ChatbotHandlerState>,
    ValidatedJson(request): ValidatedJson<ChatbotRequest>,
) -> Json<ChatbotResponse> {
    let (reply, model) = generate_reply(
        state.model.as_deref(),
        &request.message,
        request.context.as_ref(),
    )
    .await;
    let created_at = Utc::now();

    record_exchange(
        &state.db,
        &request.message,
        &reply,
        request.context.as_ref(),
        request.user_id.as_deref(),
    )
    .await;

    Json(ChatbotResponse {
        reply,
        created_at,
        model,
    })
}

// ── Tests ──────────────────────────────────────────────────────
