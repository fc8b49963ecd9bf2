//! `OpenAI` chat-completions provider.

use async_trait::async_trait;

use crate::ExtractError;
use crate::providers::CompletionProvider;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.1;

/// Calls the `OpenAI` chat-completions API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiProvider {
    #[must_use]
    pub const fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractError> {
        let resp = self
            .client
            .post(COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": MODEL,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": TEMPERATURE,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            log::error!("OpenAI error ({status}): {body}");
            return Err(ExtractError::Provider {
                message: format!("OpenAI returned status {status}"),
            });
        }

        let body: serde_json::Value = resp.json().await?;

        extract_completion(&body).ok_or_else(|| ExtractError::Provider {
            message: "No response from AI".to_string(),
        })
    }
}

fn extract_completion(body: &serde_json::Value) -> Option<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_completion_text() {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"isRelevant\": false}" } }]
        });
        assert_eq!(
            extract_completion(&body).as_deref(),
            Some("{\"isRelevant\": false}")
        );
    }

    #[test]
    fn missing_choices_yields_none() {
        let body = serde_json::json!({ "error": { "message": "rate limited" } });
        assert!(extract_completion(&body).is_none());
    }
}
