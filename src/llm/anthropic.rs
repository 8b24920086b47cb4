//! Anthropic Messages API client.

use async_trait::async_trait;

use super::{LlmClient, LlmError, MessageRequest, ModelResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP client for `/v1/messages`.
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches("/v1"))
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn create_message(&self, request: &MessageRequest<'_>) -> Result<ModelResponse, LlmError> {
        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending model request"
        );

        let resp = self
            .http
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: ModelResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            id = %response.id,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Model response received"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_normalizes_base() {
        let plain = AnthropicClient::new("k", "https://api.anthropic.com").unwrap();
        assert_eq!(plain.messages_url(), "https://api.anthropic.com/v1/messages");

        let trailing = AnthropicClient::new("k", "https://proxy.example.com/v1/").unwrap();
        assert_eq!(trailing.messages_url(), "https://proxy.example.com/v1/messages");
    }
}
