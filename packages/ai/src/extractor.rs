//! Prompt construction and strict reply parsing.

use killer_listings_models::{CandidateIncident, Confidence};
use serde::Deserialize;

use crate::providers::CompletionProvider;
use crate::{ExtractError, Extraction};

/// Builds the extraction prompt for one article.
#[must_use]
pub fn build_prompt(url: &str, article_text: &str) -> String {
    format!(
        "Analyze this news article and extract information about any violent crime incident \
         (homicide, shooting, assault, stabbing, etc.) that occurred at a specific address in \
         British Columbia, Canada.\n\
         \n\
         Article URL: {url}\n\
         Article Content: {article_text}\n\
         \n\
         If this article describes a violent incident at a BC address, extract the following in \
         JSON format:\n\
         {{\n\
         \x20 \"isRelevant\": true,\n\
         \x20 \"address\": \"street address (e.g., '123 Main Street')\",\n\
         \x20 \"city\": \"city name (e.g., 'Vancouver')\",\n\
         \x20 \"date\": \"incident date in YYYY-MM-DD format\",\n\
         \x20 \"type\": \"incident type (e.g., 'Homicide', 'Shooting', 'Assault', 'Stabbing')\",\n\
         \x20 \"summary\": \"2-3 sentence summary of what happened\",\n\
         \x20 \"confidence\": \"high/medium/low (how confident the address is specific and \
         accurate)\"\n\
         }}\n\
         \n\
         If this is NOT about a violent crime at a specific BC address, return:\n\
         {{\n\
         \x20 \"isRelevant\": false\n\
         }}\n\
         \n\
         Only return valid JSON, no other text."
    )
}

/// The JSON object the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionReply {
    is_relevant: bool,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "type")]
    incident_type: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    confidence: Option<Confidence>,
}

/// Strips markdown code fences that models sometimes wrap JSON in.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses a completion into an [`Extraction`].
///
/// Parsing is strict and fail-closed: malformed JSON, missing
/// `isRelevant`, or an unrecognized confidence value all produce
/// [`ExtractError::Parse`] instead of a guessed candidate.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] if the completion is not a valid
/// extraction reply.
pub fn parse_extraction(completion: &str, source_url: &str) -> Result<Extraction, ExtractError> {
    let json = strip_code_fences(completion);

    let reply: ExtractionReply =
        serde_json::from_str(&json).map_err(|e| ExtractError::Parse {
            message: format!("Invalid extraction reply: {e}"),
        })?;

    if !reply.is_relevant {
        return Ok(Extraction::NotRelevant);
    }

    Ok(Extraction::Relevant(CandidateIncident {
        address: reply.address,
        city: reply.city,
        date: reply.date,
        incident_type: reply.incident_type.unwrap_or_else(|| "Unknown".to_string()),
        summary: reply.summary.unwrap_or_default(),
        source_url: source_url.to_string(),
        confidence: reply.confidence.unwrap_or(Confidence::Medium),
    }))
}

/// Runs extraction on one article's text.
///
/// # Errors
///
/// Returns [`ExtractError`] if the provider call fails or the reply
/// cannot be parsed.
pub async fn extract(
    provider: &dyn CompletionProvider,
    article_text: &str,
    url: &str,
) -> Result<Extraction, ExtractError> {
    let prompt = build_prompt(url, article_text);
    let completion = provider.complete(&prompt).await?;
    parse_extraction(&completion, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relevant_reply() {
        let completion = r#"{
            "isRelevant": true,
            "address": "123 Main Street",
            "city": "Vancouver",
            "date": "2024-01-15",
            "type": "Homicide",
            "summary": "A man was found dead.",
            "confidence": "high"
        }"#;

        let Extraction::Relevant(candidate) =
            parse_extraction(completion, "https://example.com/a").unwrap()
        else {
            panic!("expected relevant extraction");
        };

        assert_eq!(candidate.address.as_deref(), Some("123 Main Street"));
        assert_eq!(candidate.city.as_deref(), Some("Vancouver"));
        assert_eq!(candidate.incident_type, "Homicide");
        assert_eq!(candidate.confidence, Confidence::High);
        assert_eq!(candidate.source_url, "https://example.com/a");
    }

    #[test]
    fn parses_not_relevant_reply() {
        let extraction = parse_extraction(r#"{"isRelevant": false}"#, "https://x.com").unwrap();
        assert_eq!(extraction, Extraction::NotRelevant);
    }

    #[test]
    fn strips_code_fences_before_parsing() {
        let completion = "```json\n{\"isRelevant\": false}\n```";
        let extraction = parse_extraction(completion, "https://x.com").unwrap();
        assert_eq!(extraction, Extraction::NotRelevant);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let completion = r#"{"isRelevant": true, "city": "Surrey"}"#;

        let Extraction::Relevant(candidate) =
            parse_extraction(completion, "https://x.com").unwrap()
        else {
            panic!("expected relevant extraction");
        };

        assert_eq!(candidate.address, None);
        assert_eq!(candidate.incident_type, "Unknown");
        assert_eq!(candidate.summary, "");
        assert_eq!(candidate.confidence, Confidence::Medium);
    }

    #[test]
    fn rejects_prose_replies() {
        let err = parse_extraction("I could not find an incident.", "https://x.com");
        assert!(matches!(err, Err(ExtractError::Parse { .. })));
    }

    #[test]
    fn rejects_unrecognized_confidence() {
        let completion = r#"{"isRelevant": true, "city": "Surrey", "confidence": "certain"}"#;
        let err = parse_extraction(completion, "https://x.com");
        assert!(matches!(err, Err(ExtractError::Parse { .. })));
    }

    #[test]
    fn prompt_includes_article_and_url() {
        let prompt = build_prompt("https://example.com/a", "article body text");
        assert!(prompt.contains("Article URL: https://example.com/a"));
        assert!(prompt.contains("Article Content: article body text"));
        assert!(prompt.contains("\"isRelevant\": false"));
    }
}
