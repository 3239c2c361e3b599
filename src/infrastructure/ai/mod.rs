//! External generation API client.
//!
//! The chatbot proxies an OpenAI-compatible `chat/completions` endpoint.
//! [`ChatModel`] is the seam between the gateway and the network: tests
//! substitute a stub, and when no credential is configured no client is
//! constructed at all.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AiConfig;
use crate::domain::ApiError;

/// Narrow interface to the external generation API.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply. Returns the text and the id of the model that
    /// produced it.
    async fn generate(&self, system_prompt: &str, message: &str)
        -> Result<(String, String), ApiError>;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiCompatModel {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatModel {
    /// Build a client from configuration. Returns `None` when no API key is
    /// configured, which switches the gateway to its static fallback reply.
    pub fn from_config(config: &AiConfig, http: Client) -> Option<Self> {
        let api_key = config.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            http,
            api_key: api_key.to_string(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/chat/completions")
        } else {
            format!("{base}/v1/chat/completions")
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    async fn generate(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<(String, String), ApiError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": message },
            ],
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Gateway(format!("generation request failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Gateway(format!("generation response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::Gateway(format!(
                "generation API returned {status}"
            )));
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Gateway("generation response missing content".to_string()))?;

        Ok((content.to_string(), self.model.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_base(base_url: &str) -> OpenAiCompatModel {
        OpenAiCompatModel {
            http: Client::new(),
            api_key: "key".to_string(),
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
        }
    }

    #[test]
    fn endpoint_handles_base_url_variants() {
        assert_eq!(
            model_with_base("https://api.openai.com").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            model_with_base("https://llm.internal/v1/").endpoint(),
            "https://llm.internal/v1/chat/completions"
        );
    }

    #[test]
    fn missing_credential_disables_the_client() {
        let config = AiConfig {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "test-model".to_string(),
        };
        assert!(OpenAiCompatModel::from_config(&config, Client::new()).is_none());

        let blank = AiConfig {
            api_key: Some("   ".to_string()),
            ..config
        };
        assert!(OpenAiCompatModel::from_config(&blank, Client::new()).is_none());
    }
}
