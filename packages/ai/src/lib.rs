#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! AI-backed incident extraction.
//!
//! Sends article text to a completion provider (`OpenAI` or Anthropic)
//! with a prompt that demands a single JSON object, then parses that
//! object into a [`killer_listings_models::CandidateIncident`]. Anything
//! that fails strict parsing is rejected rather than guessed at.

pub mod extractor;
pub mod providers;

use killer_listings_models::CandidateIncident;
use thiserror::Error;

/// Errors from AI extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error or an empty completion.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of the provider failure.
        message: String,
    },

    /// Completion text could not be parsed as an extraction reply.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Outcome of running extraction on one article.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The article describes a violent incident at a BC address.
    Relevant(CandidateIncident),
    /// The article is not about a violent incident at a BC address.
    NotRelevant,
}
