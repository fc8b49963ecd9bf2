//! Parses pasted property-directory listing text into candidate incidents.
//!
//! Directory pages list stigmatized properties as
//! `"{address} / {city} / British Columbia"` headers followed by a short
//! description. This parser is pure text matching, fully deterministic,
//! and involves no AI call.

use std::sync::LazyLock;

use killer_listings_models::{CandidateIncident, Confidence};
use regex::Regex;

/// Source URL recorded on every candidate produced by the bulk parser.
pub const DIRECTORY_SOURCE_URL: &str = "https://www.housecreep.com";

/// Maximum number of characters kept from a listing description.
pub const MAX_SUMMARY_CHARS: usize = 200;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+[^/\n]*?)\s*/\s*([^/\n]+?)\s*/\s*British Columbia").expect("valid regex")
});
static DESC_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Canada|/)\s*\n\s*").expect("valid regex"));
static DESC_STOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s+report").expect("valid regex"));
static FULL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+ \d+,? \d{4}").expect("valid regex"));
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("valid regex"));

/// Parses a pasted block of directory text into candidate incidents.
///
/// Each candidate gets `high` confidence: these listings are curated
/// reports, not AI guesses. Returns an empty vec when no listing headers
/// are found.
#[must_use]
pub fn parse_bulk(content: &str) -> Vec<CandidateIncident> {
    let matches: Vec<(usize, String, String)> = ADDRESS_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let address = caps.get(1)?.as_str().trim().to_string();
            let city = caps.get(2)?.as_str().trim().to_string();
            Some((whole.start(), address, city))
        })
        .collect();

    let mut candidates = Vec::with_capacity(matches.len());

    for (i, (start, address, city)) in matches.iter().enumerate() {
        let end = matches.get(i + 1).map_or(content.len(), |next| next.0);
        let section = &content[*start..end];

        let description = extract_description(section);
        let date = extract_date(&description);
        let incident_type = classify_type(&description);

        candidates.push(CandidateIncident {
            address: Some(address.clone()),
            city: Some(city.clone()),
            date,
            incident_type,
            summary: description,
            source_url: DIRECTORY_SOURCE_URL.to_string(),
            confidence: Confidence::High,
        });
    }

    candidates
}

/// Extracts the description paragraph that follows a listing header.
///
/// The paragraph starts on the first non-empty line after `Canada` or a
/// trailing `/`, and continues until a blank line or a line beginning with
/// a report count like `"3 reports"`.
fn extract_description(section: &str) -> String {
    let Some(m) = DESC_START_RE.find(section) else {
        return String::new();
    };

    let mut lines = section[m.end()..].lines();

    let Some(first) = lines.next() else {
        return String::new();
    };

    let mut description = first.to_string();

    for line in lines {
        if line.is_empty() || DESC_STOP_RE.is_match(line) {
            break;
        }
        description.push('\n');
        description.push_str(line);
    }

    description.trim().chars().take(MAX_SUMMARY_CHARS).collect()
}

/// Pulls a date out of a description, preferring a full `"Month day, year"`
/// form and falling back to a bare 4-digit year.
fn extract_date(description: &str) -> Option<String> {
    FULL_DATE_RE
        .find(description)
        .or_else(|| YEAR_RE.find(description))
        .map(|m| m.as_str().to_string())
}

/// Classifies the incident type from description keywords.
///
/// Directory listings overwhelmingly concern deaths, so `Homicide` is the
/// default when no more specific keyword appears.
fn classify_type(description: &str) -> String {
    let lower = description.to_lowercase();

    if lower.contains("unsolved") {
        "Unsolved Homicide"
    } else if lower.contains("shooting") || lower.contains("shot") {
        "Shooting"
    } else if lower.contains("stabbing") || lower.contains("stabbed") {
        "Stabbing"
    } else if lower.contains("suspicious death") {
        "Suspicious death"
    } else {
        "Homicide"
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_listing() {
        let content = "123 Main St / Vancouver / British Columbia\n\
                       Canada\n\
                       A man was shot in 1999 report";

        let candidates = parse_bulk(content);
        assert_eq!(candidates.len(), 1);

        let candidate = &candidates[0];
        assert_eq!(candidate.address.as_deref(), Some("123 Main St"));
        assert_eq!(candidate.city.as_deref(), Some("Vancouver"));
        assert_eq!(candidate.incident_type, "Shooting");
        assert_eq!(candidate.date.as_deref(), Some("1999"));
        assert_eq!(candidate.summary, "A man was shot in 1999 report");
        assert_eq!(candidate.source_url, DIRECTORY_SOURCE_URL);
        assert_eq!(candidate.confidence, Confidence::High);
    }

    #[test]
    fn parses_multiple_listings() {
        let content = "456 Oak Ave / Burnaby / British Columbia\n\
                       Canada\n\
                       An unsolved case from the 1980s.\n\
                       2 reports\n\
                       789 Pine Rd / Surrey / British Columbia\n\
                       Canada\n\
                       A resident was stabbed on September 30, 1988 during a break-in.";

        let candidates = parse_bulk(content);
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].city.as_deref(), Some("Burnaby"));
        assert_eq!(candidates[0].incident_type, "Unsolved Homicide");
        assert_eq!(candidates[0].summary, "An unsolved case from the 1980s.");

        assert_eq!(candidates[1].city.as_deref(), Some("Surrey"));
        assert_eq!(candidates[1].incident_type, "Stabbing");
        assert_eq!(candidates[1].date.as_deref(), Some("September 30, 1988"));
    }

    #[test]
    fn unsolved_takes_priority_over_shooting() {
        assert_eq!(classify_type("An unsolved shooting downtown"), "Unsolved Homicide");
    }

    #[test]
    fn defaults_to_homicide() {
        assert_eq!(classify_type("A body was discovered here"), "Homicide");
    }

    #[test]
    fn description_stops_at_report_count_line() {
        let content = "10 Elm St / Richmond / British Columbia\n\
                       Canada\n\
                       First line of the summary.\n\
                       Second line continues it.\n\
                       3 reports\n\
                       Trailing page furniture.";

        let candidates = parse_bulk(content);
        assert_eq!(
            candidates[0].summary,
            "First line of the summary.\nSecond line continues it."
        );
    }

    #[test]
    fn truncates_long_descriptions() {
        let content = format!(
            "10 Elm St / Richmond / British Columbia\nCanada\n{}",
            "x".repeat(MAX_SUMMARY_CHARS * 2)
        );
        let candidates = parse_bulk(&content);
        assert_eq!(candidates[0].summary.chars().count(), MAX_SUMMARY_CHARS);
    }

    #[test]
    fn empty_input_yields_no_candidates() {
        assert!(parse_bulk("").is_empty());
        assert!(parse_bulk("No listing headers anywhere in this text").is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let content = "123 Main St / Vancouver / British Columbia\nCanada\nShooting in 2001";
        assert_eq!(parse_bulk(content), parse_bulk(content));
    }
}
