//! Nominatim / OpenStreetMap forward-geocoding client (keyless fallback).
//!
//! The public instance requires a descriptive `User-Agent` and limits
//! callers to roughly one request per second.

use crate::{GeocodeError, GeocodedPoint, GeocodingProvider};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "KillerListings/1.0";

/// Geocodes a free-form query against the public Nominatim instance.
///
/// Returns `Ok(None)` when Nominatim has no result for the query.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode(
    client: &reqwest::Client,
    query: &str,
) -> Result<Option<GeocodedPoint>, GeocodeError> {
    let resp = client
        .get(SEARCH_URL)
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a Nominatim search response. Coordinates come back as *string*
/// `lat`/`lon` fields on each result object.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedPoint>, GeocodeError> {
    let Some(results) = body.as_array() else {
        return Err(GeocodeError::Parse {
            message: "Expected JSON array from Nominatim".to_string(),
        });
    };

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let latitude = parse_coordinate(first, "lat")?;
    let longitude = parse_coordinate(first, "lon")?;

    Ok(Some(GeocodedPoint {
        latitude,
        longitude,
        provider: GeocodingProvider::Nominatim,
    }))
}

fn parse_coordinate(result: &serde_json::Value, field: &str) -> Result<f64, GeocodeError> {
    result[field]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing or invalid {field} in Nominatim result"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "49.2827291",
            "lon": "-123.1207375",
            "display_name": "Main Street, Vancouver, British Columbia, Canada"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 49.2827291).abs() < 1e-6);
        assert!((result.longitude - -123.1207375).abs() < 1e-6);
        assert_eq!(result.provider, GeocodingProvider::Nominatim);
    }

    #[test]
    fn parses_nominatim_empty_results() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let body = serde_json::json!([{ "lat": "not-a-number", "lon": "-123.1" }]);
        assert!(parse_response(&body).is_err());
    }
}
