//! `NewsAPI` search for recent BC crime coverage.
//!
//! Builds a small set of `"{keyword} {city} BC"` queries, runs each against
//! the `everything` endpoint, and merges the results with URL-level
//! de-duplication. Individual query failures are logged and skipped so one
//! bad response never sinks the whole sweep.

use std::collections::BTreeSet;

use crate::ScrapedArticle;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

/// Cities covered by the automated news sweep.
pub const BC_CITIES: &[&str] = &[
    "Vancouver",
    "Burnaby",
    "Surrey",
    "Richmond",
    "Coquitlam",
    "Delta",
    "North Vancouver",
    "West Vancouver",
    "New Westminster",
    "Victoria",
];

/// Crime keywords combined with cities to form search queries.
pub const CRIME_KEYWORDS: &[&str] = &[
    "homicide", "murder", "shooting", "stabbing", "death", "killed", "fatal", "assault",
];

/// Maximum number of queries issued per sweep.
const MAX_QUERIES: usize = 5;

/// Builds the query list for one sweep: each city crossed with the first
/// three keywords, capped at [`MAX_QUERIES`] total.
#[must_use]
pub fn build_queries() -> Vec<String> {
    BC_CITIES
        .iter()
        .flat_map(|city| {
            CRIME_KEYWORDS
                .iter()
                .take(3)
                .map(move |keyword| format!("{keyword} {city} BC"))
        })
        .take(MAX_QUERIES)
        .collect()
}

/// Searches `NewsAPI` for BC crime articles from the last `days_back` days.
///
/// Never fails as a whole: queries that error are logged with `log::warn!`
/// and skipped. Articles are de-duplicated by URL, preserving first-seen
/// order.
pub async fn fetch_news_articles(
    client: &reqwest::Client,
    api_key: &str,
    days_back: u32,
) -> Vec<ScrapedArticle> {
    let from = (chrono::Utc::now() - chrono::Duration::days(i64::from(days_back)))
        .format("%Y-%m-%d")
        .to_string();

    let mut seen_urls = BTreeSet::new();
    let mut articles = Vec::new();

    for query in build_queries() {
        match fetch_query(client, api_key, &query, &from).await {
            Ok(results) => {
                for article in results {
                    if seen_urls.insert(article.url.clone()) {
                        articles.push(article);
                    }
                }
            }
            Err(e) => {
                log::warn!("News search failed for query {query:?}: {e:?}");
            }
        }
    }

    log::info!("News sweep found {} unique articles", articles.len());
    articles
}

async fn fetch_query(
    client: &reqwest::Client,
    api_key: &str,
    query: &str,
    from: &str,
) -> Result<Vec<ScrapedArticle>, reqwest::Error> {
    let body: serde_json::Value = client
        .get(EVERYTHING_URL)
        .query(&[
            ("q", query),
            ("from", from),
            ("sortBy", "publishedAt"),
            ("language", "en"),
            ("apiKey", api_key),
        ])
        .send()
        .await?
        .json()
        .await?;

    Ok(parse_articles(&body))
}

/// Parses the `articles` array of a `NewsAPI` response. Entries without a
/// URL are dropped; `content` falls back to `description` when absent.
#[must_use]
pub fn parse_articles(body: &serde_json::Value) -> Vec<ScrapedArticle> {
    let Some(entries) = body["articles"].as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let url = entry["url"].as_str()?.to_string();
            let content = entry["content"]
                .as_str()
                .or_else(|| entry["description"].as_str())
                .unwrap_or_default()
                .to_string();

            Some(ScrapedArticle {
                title: entry["title"].as_str().unwrap_or_default().to_string(),
                url,
                published_at: entry["publishedAt"].as_str().map(String::from),
                content,
                source: entry["source"]["name"]
                    .as_str()
                    .unwrap_or("Unknown")
                    .to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_five_queries_city_major() {
        let queries = build_queries();
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[0], "homicide Vancouver BC");
        assert_eq!(queries[2], "shooting Vancouver BC");
        assert_eq!(queries[3], "homicide Burnaby BC");
        assert_eq!(queries[4], "murder Burnaby BC");
    }

    #[test]
    fn parses_articles_with_content_fallback() {
        let body = serde_json::json!({
            "status": "ok",
            "articles": [
                {
                    "title": "Man killed in Surrey",
                    "url": "https://example.com/a",
                    "publishedAt": "2024-01-15T10:00:00Z",
                    "content": "Full article body",
                    "source": { "name": "Example News" }
                },
                {
                    "title": "Shooting in Burnaby",
                    "url": "https://example.com/b",
                    "content": null,
                    "description": "Short description only",
                    "source": {}
                }
            ]
        });

        let articles = parse_articles(&body);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].content, "Full article body");
        assert_eq!(articles[0].source, "Example News");
        assert_eq!(articles[1].content, "Short description only");
        assert_eq!(articles[1].source, "Unknown");
    }

    #[test]
    fn drops_entries_without_url() {
        let body = serde_json::json!({
            "articles": [{ "title": "No link", "content": "text" }]
        });
        assert!(parse_articles(&body).is_empty());
    }

    #[test]
    fn error_body_yields_no_articles() {
        let body = serde_json::json!({ "status": "error", "code": "apiKeyInvalid" });
        assert!(parse_articles(&body).is_empty());
    }
}
