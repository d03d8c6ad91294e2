//! Unified OpenAI-compatible client.
//!
//! One struct handles chat completions and embeddings for ALL
//! OpenAI-compatible APIs; different providers are distinguished only by
//! endpoint URL and API key.

use async_trait::async_trait;
use serde_json::{Value, json};

use raglet_core::config::LlmConfig;
use raglet_core::error::{RagletError, Result};
use raglet_core::traits::{ChatModel, Embedder};
use raglet_core::types::ChatOutcome;

/// Client for an OpenAI-compatible API.
pub struct OpenAiClient {
    /// API key for bearer authentication.
    api_key: String,
    /// Base URL (e.g. "https://api.openai.com/v1").
    base_url: String,
    /// Chat model id (e.g. "gpt-4o-mini").
    chat_model: String,
    /// Embedding model id (e.g. "text-embedding-3-small").
    embedding_model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Whether a key is configured; without one every call fails fast.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        let req = self.apply_auth(req);

        let resp = req
            .send()
            .await
            .map_err(|e| RagletError::Http(format!("connection failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(RagletError::Provider(format!(
                "API error {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| RagletError::Http(e.to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<ChatOutcome> {
        if self.api_key.is_empty() {
            return Err(RagletError::Provider("API key not configured".into()));
        }

        let body = json!({
            "model": self.chat_model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let json = self.post_json("/chat/completions", &body).await?;

        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| RagletError::Provider("No choices in response".into()))?;
        let answer = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| RagletError::Provider("No message content in response".into()))?
            .trim()
            .to_string();
        let total_tokens = json["usage"]["total_tokens"].as_u64().map(|t| t as u32);

        tracing::debug!(model = %self.chat_model, tokens = ?total_tokens, "chat completion ok");

        Ok(ChatOutcome {
            answer,
            total_tokens,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.api_key.is_empty() {
            return Err(RagletError::Provider("API key not configured".into()));
        }

        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let json = self.post_json("/embeddings", &body).await?;

        let vector = json["data"]
            .get(0)
            .and_then(|d| d["embedding"].as_array())
            .ok_or_else(|| RagletError::Provider("No embedding in response".into()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LlmConfig {
        LlmConfig {
            api_key: String::new(),
            endpoint: "https://api.openai.com/v1/".into(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = OpenAiClient::new(&test_config());
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn complete_without_key_fails_fast() {
        let client = OpenAiClient::new(&test_config());
        let err = client.complete("hi").await.unwrap_err();
        assert!(matches!(err, RagletError::Provider(_)));
    }

    #[tokio::test]
    async fn embed_without_key_fails_fast() {
        let client = OpenAiClient::new(&test_config());
        let err = client.embed("hi").await.unwrap_err();
        assert!(matches!(err, RagletError::Provider(_)));
    }
}
