//! Chat gateway: prompt composition, reply generation and exchange logging.
//!
//! Caller-supplied context (KPI figures, active alerts, recommendations) is
//! rendered verbatim into the system prompt; sanitization is an explicit
//! non-goal. Upstream failures degrade to the static fallback reply, and
//! every exchange is appended to the log table regardless of which path
//! produced the reply.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::infrastructure::ai::ChatModel;
use crate::infrastructure::database::entities::chatbot_log;

/// Served when no generation credential is configured or the external call
/// fails. Deliberately names no model.
pub const FALLBACK_REPLY: &str =
    "The AI assistant is not configured. Set a generation API key in the server \
     configuration to enable live replies.";

/// Compose the system prompt for one exchange.
pub fn build_system_prompt(context: Option<&Value>) -> String {
    let section = |key: &str, default: Value| -> Value {
        context
            .and_then(|ctx| ctx.get(key))
            .cloned()
            .unwrap_or(default)
    };
    let kpis = section("kpis", json!({}));
    let alerts = section("alerts", json!([]));
    let recommendations = section("recommendations", json!([]));

    format!(
        "You are a refinery operations assistant. Explain KPIs, alerts, forecasts, and \
         recommendations clearly for engineers and leadership.\
         \nKPIs: {kpis}\
         \nAlerts: {alerts}\
         \nRecommendations: {recommendations}\
         \nKeep responses concise, actionable, and data-driven."
    )
}

/// Produce a reply for the message. Returns the text and, when the external
/// path produced it, the model id.
pub async fn generate_reply(
    model: Option<&dyn ChatModel>,
    message: &str,
    context: Option<&Value>,
) -> (String, Option<String>) {
    let Some(model) = model else {
        return (FALLBACK_REPLY.to_string(), None);
    };

    match model.generate(&build_system_prompt(context), message).await {
        Ok((text, model_id)) => (text, Some(model_id)),
        Err(e) => {
            warn!("generation API call failed, serving fallback reply: {e}");
            (FALLBACK_REPLY.to_string(), None)
        }
    }
}

/// Append the exchange to the log table. The log is best-effort: a store
/// hiccup must not take the reply down with it.
pub async fn record_exchange(
    db: &DatabaseConnection,
    message: &str,
    reply: &str,
    context: Option<&Value>,
    user_id: Option<&str>,
) {
    let entry = chatbot_log::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.map(str::to_string)),
        message: Set(message.to_string()),
        response: Set(reply.to_string()),
        context: Set(context.cloned()),
        created_at: Set(Utc::now()),
    };

    if let Err(e) = entry.insert(db).await {
        warn!("failed to persist chatbot log entry: {e}");
    }
}
