//! The automated news sweep.
//!
//! Searches recent news, runs AI extraction on each hit sequentially
//! with a fixed delay between calls, and returns the surviving
//! candidates for manual review. Failures on individual articles are
//! logged and skipped.

use killer_listings_ai::providers::{CompletionProvider, ProviderKind, create_provider};
use killer_listings_ai::{Extraction, extractor};
use killer_listings_models::CandidateIncident;
use killer_listings_scraper::news;

/// Delay between consecutive AI extraction calls.
pub const EXTRACT_DELAY_MS: u64 = 500;

/// Default lookback window for the news search, in days.
pub const DEFAULT_DAYS_BACK: u32 = 7;

/// Configuration for one scraper run.
pub struct ScraperConfig {
    /// `NewsAPI` key. Without one the sweep finds no articles.
    pub news_api_key: Option<String>,
    /// AI provider API key.
    pub ai_api_key: String,
    /// Which AI provider to extract with.
    pub provider: ProviderKind,
    /// How many days of news to search.
    pub days_back: u32,
}

/// Runs one sweep: news search, then sequential AI extraction.
///
/// Candidates without a city are dropped since they cannot be geocoded
/// or matched to a property. Never fails as a whole: per-article errors
/// are logged with `log::warn!` and skipped.
pub async fn run_scraper(
    client: &reqwest::Client,
    config: &ScraperConfig,
) -> Vec<CandidateIncident> {
    let mut articles = Vec::new();

    if let Some(key) = &config.news_api_key {
        articles = news::fetch_news_articles(client, key, config.days_back).await;
    } else {
        log::warn!("No news API key configured, skipping news search");
    }

    log::info!("Found {} articles to process", articles.len());

    let provider = create_provider(config.provider, client.clone(), config.ai_api_key.clone());

    extract_candidates(provider.as_ref(), &articles).await
}

async fn extract_candidates(
    provider: &dyn CompletionProvider,
    articles: &[killer_listings_scraper::ScrapedArticle],
) -> Vec<CandidateIncident> {
    let mut candidates = Vec::new();

    for article in articles {
        let text = format!("{}\n\n{}", article.title, article.content);

        match extractor::extract(provider, &text, &article.url).await {
            Ok(Extraction::Relevant(mut candidate)) => {
                // A candidate without a city cannot be matched or geocoded.
                if candidate.city.is_some() {
                    if candidate.summary.is_empty() {
                        candidate.summary = article.title.clone();
                    }
                    candidates.push(candidate);
                }
            }
            Ok(Extraction::NotRelevant) => {}
            Err(e) => {
                log::warn!("Extraction failed for {}: {e:?}", article.url);
            }
        }

        tokio::time::sleep(std::time::Duration::from_millis(EXTRACT_DELAY_MS)).await;
    }

    log::info!("Extracted {} candidate incidents", candidates.len());
    candidates
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use killer_listings_ai::ExtractError;
    use killer_listings_scraper::ScrapedArticle;

    use super::*;

    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ExtractError>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ExtractError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ExtractError> {
            self.replies
                .lock()
                .unwrap()
                .remove(0)
        }
    }

    fn article(title: &str, url: &str) -> ScrapedArticle {
        ScrapedArticle {
            title: title.to_string(),
            url: url.to_string(),
            published_at: None,
            content: "article body".to_string(),
            source: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn keeps_relevant_candidates_with_a_city() {
        let provider = ScriptedProvider::new(vec![
            Ok(r#"{"isRelevant": true, "city": "Vancouver", "address": "123 Main Street",
                   "type": "Homicide", "summary": "A man died.", "confidence": "high"}"#
                .to_string()),
            Ok(r#"{"isRelevant": false}"#.to_string()),
            Ok(r#"{"isRelevant": true, "address": "Somewhere"}"#.to_string()),
        ]);

        let articles = vec![
            article("Man dead in Vancouver", "https://example.com/a"),
            article("Local bake sale", "https://example.com/b"),
            article("Incident, no city", "https://example.com/c"),
        ];

        let candidates = extract_candidates(&provider, &articles).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].city.as_deref(), Some("Vancouver"));
    }

    #[tokio::test]
    async fn extraction_errors_are_skipped_not_fatal() {
        let provider = ScriptedProvider::new(vec![
            Err(ExtractError::Provider {
                message: "rate limited".to_string(),
            }),
            Ok(r#"{"isRelevant": true, "city": "Surrey", "summary": "Shooting reported.",
                   "type": "Shooting"}"#
                .to_string()),
        ]);

        let articles = vec![
            article("First article", "https://example.com/a"),
            article("Second article", "https://example.com/b"),
        ];

        let candidates = extract_candidates(&provider, &articles).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].city.as_deref(), Some("Surrey"));
    }

    #[tokio::test]
    async fn empty_summary_falls_back_to_title() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"isRelevant": true, "city": "Burnaby"}"#.to_string()
        )]);

        let articles = vec![article("Fatal stabbing in Burnaby", "https://example.com/a")];

        let candidates = extract_candidates(&provider, &articles).await;
        assert_eq!(candidates[0].summary, "Fatal stabbing in Burnaby");
    }
}
