#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for Killer Listings addresses.
//!
//! Converts a street address + city into latitude/longitude using a
//! two-provider strategy:
//!
//! 1. **Mapbox** (primary) — requires an access token.
//! 2. **Nominatim / OpenStreetMap** (fallback) — keyless, but rate limited
//!    to 1 request per second on the public instance.
//!
//! The fallback is used when no Mapbox token is configured or when Mapbox
//! returns zero features. No retries, no caching — a miss from both
//! providers is reported as `Ok(None)` and the caller is responsible for
//! prompting for manual coordinate entry.

pub mod mapbox;
pub mod nominatim;

use thiserror::Error;

/// A successful geocoding match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodedPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Which provider resolved the address.
    pub provider: GeocodingProvider,
}

/// Which geocoding provider resolved an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingProvider {
    /// Mapbox forward geocoding.
    Mapbox,
    /// Nominatim / OpenStreetMap.
    Nominatim,
}

impl GeocodingProvider {
    /// Lowercase provider name as reported in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mapbox => "mapbox",
            Self::Nominatim => "nominatim",
        }
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Geocodes a BC street address.
///
/// Builds the query `"{address}, {city}, British Columbia, Canada"`, tries
/// Mapbox when a token is available, and falls back to Nominatim when the
/// token is absent or Mapbox has no match. Returns `Ok(None)` when neither
/// provider matches.
///
/// # Errors
///
/// Returns [`GeocodeError`] if an HTTP request or response parsing fails.
pub async fn geocode(
    client: &reqwest::Client,
    mapbox_token: Option<&str>,
    address: &str,
    city: &str,
) -> Result<Option<GeocodedPoint>, GeocodeError> {
    let query = format!("{address}, {city}, British Columbia, Canada");

    if let Some(token) = mapbox_token {
        if let Some(point) = mapbox::geocode(client, token, &query).await? {
            return Ok(Some(point));
        }
        log::debug!("Mapbox returned no match for {query:?}, falling back to Nominatim");
    }

    nominatim::geocode(client, &query).await
}
