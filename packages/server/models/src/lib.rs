#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Killer Listings server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use killer_listings_database_models::{IncidentRow, PropertyRow};
use killer_listings_models::{CandidateIncident, HistoryScore};
use serde::{Deserialize, Serialize};

/// A property as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProperty {
    /// Unique property ID.
    pub id: String,
    /// Street address.
    pub address: String,
    /// City name.
    pub city: String,
    /// Province code (always `"BC"`).
    pub province: String,
    /// Postal code, when known.
    pub postal_code: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Current listing price in CAD, when known.
    pub listing_price: Option<f64>,
    /// History verdict for this property.
    pub history_score: HistoryScore,
    /// Row creation timestamp (RFC 3339).
    pub created_at: String,
    /// Number of recorded incidents (search results only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_count: Option<i64>,
    /// Recorded incidents, newest first (detail view only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents: Option<Vec<ApiIncident>>,
}

impl From<PropertyRow> for ApiProperty {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            address: row.address,
            city: row.city,
            province: row.province,
            postal_code: row.postal_code,
            latitude: row.latitude,
            longitude: row.longitude,
            listing_price: row.listing_price,
            history_score: row.history_score,
            created_at: row.created_at,
            incident_count: None,
            incidents: None,
        }
    }
}

/// An incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncident {
    /// Unique incident ID.
    pub id: String,
    /// Owning property ID, if linked.
    pub property_id: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Incident type label (e.g. `"Homicide"`).
    #[serde(rename = "type")]
    pub incident_type: String,
    /// When the incident occurred (RFC 3339).
    pub date: String,
    /// Short description of what happened.
    pub summary: String,
    /// Source article or directory URL.
    pub source_url: Option<String>,
    /// Severity from 1 (minor) to 5 (fatal).
    pub severity: i32,
    /// Row creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<IncidentRow> for ApiIncident {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            latitude: row.latitude,
            longitude: row.longitude,
            incident_type: row.incident_type,
            date: row.date,
            summary: row.summary,
            source_url: row.source_url,
            severity: row.severity,
            created_at: row.created_at,
        }
    }
}

/// A property pin on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapProperty {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub history_score: HistoryScore,
    pub address: String,
    pub city: String,
}

impl From<PropertyRow> for ApiMapProperty {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            latitude: row.latitude,
            longitude: row.longitude,
            history_score: row.history_score,
            address: row.address,
            city: row.city,
        }
    }
}

/// An unlinked incident pin on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapIncident {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: i32,
    #[serde(rename = "type")]
    pub incident_type: String,
}

impl From<IncidentRow> for ApiMapIncident {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id,
            latitude: row.latitude,
            longitude: row.longitude,
            severity: row.severity,
            incident_type: row.incident_type,
        }
    }
}

/// Query parameters for the map endpoint. Missing edges default to the
/// BC-wide bounding box.
#[derive(Debug, Clone, Deserialize)]
pub struct MapQueryParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
}

/// Query parameters for property search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQueryParams {
    /// Free-text query across address, postal code, and city.
    pub q: Option<String>,
    /// Optional exact city filter.
    pub city: Option<String>,
}

/// Request body for the geocode endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Response body for a successful geocode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    pub success: bool,
    pub latitude: f64,
    pub longitude: f64,
    /// `"mapbox"` or `"nominatim"`.
    pub provider: String,
}

/// Request body for single-article extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub url: Option<String>,
    pub ai_api_key: Option<String>,
}

/// Response body for single-article extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    /// The extracted candidate, `null` when the article is not relevant.
    pub incident: Option<CandidateIncident>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for a scraper run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub news_api_key: Option<String>,
    pub days_back: Option<u32>,
}

/// Response body for a scraper run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub count: usize,
    pub incidents: Vec<CandidateIncident>,
}

/// Response body for an approved incident.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub success: bool,
    pub property: ApiProperty,
    pub incident: ApiIncident,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Server version string.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_serializes_without_optional_sections() {
        let api = ApiProperty {
            id: "p1".to_string(),
            address: "123 Main Street".to_string(),
            city: "Vancouver".to_string(),
            province: "BC".to_string(),
            postal_code: None,
            latitude: 49.28,
            longitude: -123.12,
            listing_price: None,
            history_score: HistoryScore::Confirmed,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            incident_count: None,
            incidents: None,
        };

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["historyScore"], "CONFIRMED");
        assert!(json.get("incidentCount").is_none());
        assert!(json.get("incidents").is_none());
    }

    #[test]
    fn map_incident_renames_type() {
        let api = ApiMapIncident {
            id: "i1".to_string(),
            latitude: 49.0,
            longitude: -123.0,
            severity: 5,
            incident_type: "Homicide".to_string(),
        };

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["type"], "Homicide");
    }
}
