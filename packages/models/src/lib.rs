#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Domain types shared across the Killer Listings system.
//!
//! Defines the tri-state property history score, the extractor's
//! self-reported confidence level, and the ephemeral candidate incident
//! record that flows from the scrapers/extractor into the human review
//! queue before being persisted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity assigned on the manual-entry path when no confidence level is
/// available.
pub const DEFAULT_SEVERITY: u8 = 4;

/// Tri-state summary of what is known about a property's history.
///
/// `CONFIRMED` is set whenever any incident is attached to the property.
/// `CLEAN` and `POSSIBLE` only occur via direct seeding — no code path
/// downgrades a `CONFIRMED` score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryScore {
    /// No history found.
    Clean,
    /// Something came up; unverified.
    Possible,
    /// At least one confirmed incident on record.
    Confirmed,
}

/// The extractor's (or bulk parser's) self-reported certainty that the
/// extracted address is specific and accurate.
///
/// Mapped to a numeric incident severity at approval time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    /// Address is specific and well supported by the source text.
    High,
    /// Address is plausible but imprecise.
    Medium,
    /// Address is a guess.
    Low,
}

impl Confidence {
    /// Maps a confidence level to the severity recorded on the incident.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::High => 5,
            Self::Medium => 4,
            Self::Low => 3,
        }
    }
}

/// An unvalidated, not-yet-persisted incident awaiting human approval.
///
/// Produced by the AI extractor or the bulk directory-text parser. Lives
/// only in the reviewer's working set until approved (promoted to a stored
/// incident) or dismissed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateIncident {
    /// Street address, if the source text mentioned one.
    pub address: Option<String>,
    /// City name, if the source text mentioned one.
    pub city: Option<String>,
    /// Incident date as reported (free-form string, parsed at approval).
    pub date: Option<String>,
    /// Incident category (free text, e.g. "Homicide", "Shooting").
    #[serde(rename = "type")]
    pub incident_type: String,
    /// Short summary of what happened.
    pub summary: String,
    /// URL of the article or directory the candidate came from.
    pub source_url: String,
    /// How confident the producer is that the address is accurate.
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_score_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&HistoryScore::Confirmed).unwrap(),
            "\"CONFIRMED\""
        );
        assert_eq!(HistoryScore::Clean.to_string(), "CLEAN");
        assert_eq!("POSSIBLE".parse::<HistoryScore>().unwrap(), HistoryScore::Possible);
    }

    #[test]
    fn confidence_maps_to_severity() {
        assert_eq!(Confidence::High.severity(), 5);
        assert_eq!(Confidence::Medium.severity(), 4);
        assert_eq!(Confidence::Low.severity(), 3);
    }

    #[test]
    fn candidate_incident_uses_camel_case_and_type_key() {
        let candidate = CandidateIncident {
            address: Some("123 Main Street".to_string()),
            city: Some("Vancouver".to_string()),
            date: None,
            incident_type: "Homicide".to_string(),
            summary: "A summary".to_string(),
            source_url: "https://example.com/article".to_string(),
            confidence: Confidence::Medium,
        };
        let json = serde_json::to_string(&candidate).unwrap();
        assert!(json.contains("\"type\":\"Homicide\""));
        assert!(json.contains("\"sourceUrl\""));
        assert!(json.contains("\"confidence\":\"medium\""));
    }
}
