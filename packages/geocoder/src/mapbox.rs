//! Mapbox forward-geocoding client (primary provider).
//!
//! See <https://docs.mapbox.com/api/search/geocoding-v5/>

use crate::{GeocodeError, GeocodedPoint, GeocodingProvider};

/// Geocodes a free-form query using the Mapbox places endpoint.
///
/// Restricted to Canada, single best match. Returns `Ok(None)` when Mapbox
/// has no feature for the query.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode(
    client: &reqwest::Client,
    token: &str,
    query: &str,
) -> Result<Option<GeocodedPoint>, GeocodeError> {
    // The query is a path segment, so it has to go through Url parsing for
    // percent-encoding rather than `.query()`.
    let url = reqwest::Url::parse(&format!(
        "https://api.mapbox.com/geocoding/v5/mapbox.places/{query}.json"
    ))
    .map_err(|e| GeocodeError::Parse {
        message: format!("Invalid Mapbox URL: {e}"),
    })?;

    let resp = client
        .get(url)
        .query(&[("access_token", token), ("country", "CA"), ("limit", "1")])
        .send()
        .await?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a Mapbox geocoding response. Coordinates come back as a
/// `[longitude, latitude]` center pair on the first feature.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedPoint>, GeocodeError> {
    let Some(features) = body["features"].as_array() else {
        return Ok(None);
    };

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let center = first["center"].as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Missing center in Mapbox feature".to_string(),
    })?;

    let longitude = center
        .first()
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing longitude in Mapbox center".to_string(),
        })?;

    let latitude = center
        .get(1)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing latitude in Mapbox center".to_string(),
        })?;

    Ok(Some(GeocodedPoint {
        latitude,
        longitude,
        provider: GeocodingProvider::Mapbox,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapbox_feature() {
        let body = serde_json::json!({
            "features": [{
                "center": [-123.1207, 49.2827],
                "place_name": "123 Main St, Vancouver, British Columbia, Canada"
            }]
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 49.2827).abs() < 1e-6);
        assert!((result.longitude - -123.1207).abs() < 1e-6);
        assert_eq!(result.provider, GeocodingProvider::Mapbox);
    }

    #[test]
    fn parses_mapbox_empty_features() {
        let body = serde_json::json!({ "features": [] });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn parses_mapbox_missing_features_key() {
        let body = serde_json::json!({ "message": "Not Authorized" });
        assert!(parse_response(&body).unwrap().is_none());
    }
}
