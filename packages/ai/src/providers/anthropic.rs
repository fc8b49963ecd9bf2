//! Anthropic messages provider.

use async_trait::async_trait;

use crate::ExtractError;
use crate::providers::CompletionProvider;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 500;

/// Calls the Anthropic messages API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AnthropicProvider {
    #[must_use]
    pub const fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractError> {
        let resp = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&serde_json::json!({
                "model": MODEL,
                "max_tokens": MAX_TOKENS,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            log::error!("Anthropic error ({status}): {body}");
            return Err(ExtractError::Provider {
                message: format!("Anthropic returned status {status}"),
            });
        }

        let body: serde_json::Value = resp.json().await?;

        extract_completion(&body).ok_or_else(|| ExtractError::Provider {
            message: "No response from AI".to_string(),
        })
    }
}

fn extract_completion(body: &serde_json::Value) -> Option<String> {
    body["content"][0]["text"].as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_completion_text() {
        let body = serde_json::json!({
            "content": [{ "type": "text", "text": "{\"isRelevant\": false}" }]
        });
        assert_eq!(
            extract_completion(&body).as_deref(),
            Some("{\"isRelevant\": false}")
        );
    }

    #[test]
    fn missing_content_yields_none() {
        let body = serde_json::json!({ "type": "error" });
        assert!(extract_completion(&body).is_none());
    }
}
