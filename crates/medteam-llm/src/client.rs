//! OpenAI-compatible chat completions client

use crate::backend::ChatBackend;
use crate::errors::{LlmError, Result};
use crate::types::{ChatMessage, Completion, Usage};
use async_trait::async_trait;
use medteam_config::LlmSettings;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Client for any `/chat/completions` endpoint speaking the OpenAI wire format
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl OpenAiClient {
    /// Build a client from settings.
    ///
    /// Succeeds without an API key; requests then fail with
    /// [`LlmError::MissingApiKey`].
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            settings: settings.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        )
    }

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let mut body = json!({
            "model": self.settings.model,
            "messages": messages,
        });
        if let Some(temp) = self.settings.temperature {
            body["temperature"] = json!(temp);
        }
        body
    }

    /// Parse a chat completion response body
    fn parse_response(response: Value) -> Result<Completion> {
        let choice = response["choices"]
            .get(0)
            .ok_or_else(|| LlmError::MalformedResponse("No choices in response".to_string()))?;

        let content = match &choice["message"]["content"] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => {
                return Err(LlmError::MalformedResponse(format!(
                    "Unexpected content type: {}",
                    other
                )))
            }
        };

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let usage = match response["usage"].as_object() {
            Some(u) => Usage {
                input_tokens: u.get("prompt_tokens").and_then(Value::as_u64).unwrap_or(0),
                output_tokens: u
                    .get("completion_tokens")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
                total_tokens: u.get("total_tokens").and_then(Value::as_u64).unwrap_or(0),
            },
            None => Usage::default(),
        };

        Ok(Completion {
            content,
            id: response["id"].as_str().map(|s| s.to_string()),
            usage,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.settings.request_timeout_secs)
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        debug!(
            model = %self.settings.model,
            messages = messages.len(),
            "Calling LLM"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let completion = Self::parse_response(body)?;
        debug!(
            chars = completion.content.len(),
            total_tokens = completion.usage.total_tokens,
            "LLM response received"
        );
        Ok(completion)
    }
}
