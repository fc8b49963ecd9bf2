#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database row types for the Killer Listings property-history store.
//!
//! These mirror the `properties` and `incidents` tables. Timestamps are
//! stored as RFC 3339 `TEXT` so lexicographic ordering matches
//! chronological ordering.

use killer_listings_models::HistoryScore;
use serde::{Deserialize, Serialize};

/// A geographic bounding rectangle, inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Northern latitude limit.
    pub north: f64,
    /// Southern latitude limit.
    pub south: f64,
    /// Eastern longitude limit.
    pub east: f64,
    /// Western longitude limit.
    pub west: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four edges.
    #[must_use]
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }
}

/// Rough bounding box around British Columbia, used as the default map
/// viewport when no bounds are supplied.
pub const BC_BOUNDS: BoundingBox = BoundingBox::new(60.0, 48.3, -114.0, -139.1);

/// A row from the `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRow {
    /// Opaque UUID identifier.
    pub id: String,
    /// Street address.
    pub address: String,
    /// City name.
    pub city: String,
    /// Province code (always "BC" for now).
    pub province: String,
    /// Postal code, when known.
    pub postal_code: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Current listing price, when known.
    pub listing_price: Option<f64>,
    /// Tri-state history summary.
    pub history_score: HistoryScore,
    /// When the row was created (RFC 3339).
    pub created_at: String,
}

/// A row from the `incidents` table.
///
/// `property_id` is nullable: an incident can be plotted on the map before
/// (or without) being linked to a matched property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    /// Opaque UUID identifier.
    pub id: String,
    /// Owning property, when matched.
    pub property_id: Option<String>,
    /// Latitude, stored independently from the property.
    pub latitude: f64,
    /// Longitude, stored independently from the property.
    pub longitude: f64,
    /// Incident category (free text).
    pub incident_type: String,
    /// When the incident occurred (RFC 3339).
    pub date: String,
    /// Summary of what happened.
    pub summary: String,
    /// URL of the article or directory this was sourced from.
    pub source_url: Option<String>,
    /// Severity, 1-5.
    pub severity: i32,
    /// When the row was created (RFC 3339).
    pub created_at: String,
}

/// A search result: a property plus how many incidents it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySearchRow {
    /// The matched property.
    pub property: PropertyRow,
    /// Number of incidents attached to the property.
    pub incident_count: i64,
}

/// Fields for inserting a new property.
#[derive(Debug, Clone)]
pub struct NewProperty {
    /// Street address.
    pub address: String,
    /// City name.
    pub city: String,
    /// Province code.
    pub province: String,
    /// Postal code, when known.
    pub postal_code: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Current listing price, when known.
    pub listing_price: Option<f64>,
    /// Initial history score.
    pub history_score: HistoryScore,
}

/// Fields for inserting a new incident.
#[derive(Debug, Clone)]
pub struct NewIncident {
    /// Owning property, when matched.
    pub property_id: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Incident category (free text).
    pub incident_type: String,
    /// When the incident occurred (RFC 3339).
    pub date: String,
    /// Summary of what happened.
    pub summary: String,
    /// Source URL, when known.
    pub source_url: Option<String>,
    /// Severity, 1-5.
    pub severity: i32,
}
