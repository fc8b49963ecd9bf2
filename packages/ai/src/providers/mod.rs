//! Completion providers.
//!
//! Both providers are used identically: one user message in, one text
//! completion out. Model choices are fixed to cheap, fast tiers since
//! extraction is a high-volume classification task.

pub mod anthropic;
pub mod openai;

use async_trait::async_trait;

use crate::ExtractError;

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a single user prompt and returns the completion text.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the request fails or the provider
    /// returns no completion.
    async fn complete(&self, prompt: &str) -> Result<String, ExtractError>;
}

/// Which AI provider to use for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `OpenAI` chat completions (`gpt-4o-mini`).
    OpenAi,
    /// Anthropic messages (`claude-3-haiku-20240307`).
    Anthropic,
}

/// Creates a provider for the given kind and API key.
#[must_use]
pub fn create_provider(
    kind: ProviderKind,
    client: reqwest::Client,
    api_key: String,
) -> Box<dyn CompletionProvider> {
    match kind {
        ProviderKind::OpenAi => Box::new(openai::OpenAiProvider::new(client, api_key)),
        ProviderKind::Anthropic => Box::new(anthropic::AnthropicProvider::new(client, api_key)),
    }
}

/// Picks a provider from the environment: `ANTHROPIC_API_KEY` wins when
/// both are set, otherwise `OPENAI_API_KEY`.
#[must_use]
pub fn detect_provider_from_env() -> Option<(ProviderKind, String)> {
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            return Some((ProviderKind::Anthropic, key));
        }
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Some((ProviderKind::OpenAi, key));
        }
    }

    None
}
