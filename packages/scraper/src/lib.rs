#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Content acquisition for Killer Listings.
//!
//! * [`article`] — fetches a news article URL and strips it down to plain
//!   text suitable for AI extraction.
//! * [`news`] — queries the `NewsAPI` `everything` endpoint for recent BC
//!   crime coverage.
//! * [`bulk`] — parses pasted blocks of property-directory listing text
//!   into candidate incidents without any AI involvement.

pub mod article;
pub mod bulk;
pub mod news;

use thiserror::Error;

/// Errors from fetching remote content.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote server returned a non-success status.
    #[error("Unexpected status code: {status}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
    },
}

/// A news article with its body reduced to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    /// Article headline, if known.
    pub title: String,
    /// Canonical article URL.
    pub url: String,
    /// Publication timestamp as reported by the source, if known.
    pub published_at: Option<String>,
    /// Plain-text article body, truncated for prompt budgets.
    pub content: String,
    /// Publisher name, `"Unknown"` if the source did not report one.
    pub source: String,
}
