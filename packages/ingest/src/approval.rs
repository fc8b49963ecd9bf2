//! Turns an approved candidate into persisted rows.
//!
//! Approval is the only write path for scraped data. It upserts the
//! property (loose address match, exact city match), marks it
//! `CONFIRMED`, and attaches the incident.

use killer_listings_database::queries;
use killer_listings_database_models::{IncidentRow, NewIncident, NewProperty, PropertyRow};
use killer_listings_models::{Confidence, DEFAULT_SEVERITY, HistoryScore};
use serde::Deserialize;
use switchy_database::Database;

use crate::IngestError;

/// A reviewed candidate incident submitted for persistence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    pub summary: Option<String>,
    pub source_url: Option<String>,
    pub severity: Option<u8>,
    pub confidence: Option<Confidence>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The rows produced by a successful approval.
#[derive(Debug, Clone)]
pub struct Approved {
    pub property: PropertyRow,
    pub incident: IncidentRow,
}

struct ValidRequest<'a> {
    address: &'a str,
    city: &'a str,
    latitude: f64,
    longitude: f64,
}

/// Checks that the fields persistence cannot proceed without are present.
fn validate(req: &ApprovalRequest) -> Result<ValidRequest<'_>, IngestError> {
    let address = req
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or(IngestError::Validation { field: "address" })?;
    let city = req
        .city
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(IngestError::Validation { field: "city" })?;
    let latitude = req
        .latitude
        .ok_or(IngestError::Validation { field: "latitude" })?;
    let longitude = req
        .longitude
        .ok_or(IngestError::Validation { field: "longitude" })?;

    Ok(ValidRequest {
        address,
        city,
        latitude,
        longitude,
    })
}

/// Resolves the stored severity: an explicit value wins, then the
/// confidence mapping, then the default.
#[must_use]
pub fn resolve_severity(severity: Option<u8>, confidence: Option<Confidence>) -> u8 {
    severity
        .or_else(|| confidence.map(Confidence::severity))
        .unwrap_or(DEFAULT_SEVERITY)
}

/// Normalizes a free-form incident date into RFC 3339.
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `"Month day, year"` (with or without
/// the comma), and bare 4-digit years (pinned to January 1). Anything
/// else falls back to the current time.
#[must_use]
pub fn parse_incident_date(date: Option<&str>) -> String {
    date.and_then(normalize_date)
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339())
}

fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339());
    }

    let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%B %d, %Y"))
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%B %d %Y"))
        .ok()
        .or_else(|| {
            if raw.len() == 4 {
                let year = raw.parse::<i32>().ok()?;
                chrono::NaiveDate::from_ymd_opt(year, 1, 1)
            } else {
                None
            }
        })?;

    Some(
        date.and_hms_opt(0, 0, 0)?
            .and_utc()
            .to_rfc3339(),
    )
}

/// Persists an approved incident.
///
/// When a property already exists at the address it is reused and its
/// history score is promoted to `CONFIRMED`; otherwise a new `CONFIRMED`
/// BC property is created. The incident is then attached to it, with
/// defaults for missing type (`"Unknown"`) and summary
/// (`"Incident reported"`).
///
/// # Errors
///
/// Returns [`IngestError::Validation`] when address, city, latitude, or
/// longitude is missing, or [`IngestError::Persist`] if a database
/// operation fails.
pub async fn approve(db: &dyn Database, req: &ApprovalRequest) -> Result<Approved, IngestError> {
    let valid = validate(req)?;
    let severity = resolve_severity(req.severity, req.confidence);

    let property = match queries::find_property_matching(db, valid.address, valid.city).await? {
        Some(existing) => {
            queries::confirm_property(db, &existing.id).await?;
            PropertyRow {
                history_score: HistoryScore::Confirmed,
                ..existing
            }
        }
        None => {
            queries::insert_property(
                db,
                &NewProperty {
                    address: valid.address.to_string(),
                    city: valid.city.to_string(),
                    province: "BC".to_string(),
                    postal_code: None,
                    latitude: valid.latitude,
                    longitude: valid.longitude,
                    listing_price: None,
                    history_score: HistoryScore::Confirmed,
                },
            )
            .await?
        }
    };

    let incident = queries::insert_incident(
        db,
        &NewIncident {
            property_id: Some(property.id.clone()),
            latitude: valid.latitude,
            longitude: valid.longitude,
            incident_type: req
                .incident_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            date: parse_incident_date(req.date.as_deref()),
            summary: req
                .summary
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Incident reported".to_string()),
            source_url: req.source_url.clone(),
            severity: i32::from(severity),
        },
    )
    .await?;

    log::info!(
        "Approved incident {} at property {} ({}, {})",
        incident.id,
        property.id,
        property.address,
        property.city
    );

    Ok(Approved { property, incident })
}

#[cfg(test)]
mod tests {
    use killer_listings_database::{db, queries};

    use super::*;

    fn sample_request() -> ApprovalRequest {
        ApprovalRequest {
            address: Some("123 Main Street".to_string()),
            city: Some("Vancouver".to_string()),
            incident_type: Some("Homicide".to_string()),
            summary: Some("A man was found dead.".to_string()),
            confidence: Some(Confidence::High),
            latitude: Some(49.2827),
            longitude: Some(-123.1207),
            ..ApprovalRequest::default()
        }
    }

    #[tokio::test]
    async fn re_approving_reuses_the_matched_property() {
        let tmp = std::env::temp_dir().join("killer_listings_approval_test_reuse");
        let _ = std::fs::remove_dir_all(&tmp);

        let db = db::open_db(&tmp.join("approve.db")).await.unwrap();
        let req = sample_request();

        let first = approve(db.as_ref(), &req).await.unwrap();
        let second = approve(db.as_ref(), &req).await.unwrap();

        assert_eq!(first.property.id, second.property.id);
        assert_eq!(second.property.history_score, HistoryScore::Confirmed);
        assert_eq!(queries::count_properties(db.as_ref()).await.unwrap(), 1);

        let incidents = queries::incidents_for_property(db.as_ref(), &first.property.id)
            .await
            .unwrap();
        assert_eq!(incidents.len(), 2);
        assert!(incidents.iter().all(|i| i.severity == 5));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn approval_confirms_the_stored_property() {
        let tmp = std::env::temp_dir().join("killer_listings_approval_test_confirm");
        let _ = std::fs::remove_dir_all(&tmp);

        let db = db::open_db(&tmp.join("approve.db")).await.unwrap();

        let approved = approve(db.as_ref(), &sample_request()).await.unwrap();

        let stored = queries::get_property(db.as_ref(), &approved.property.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.history_score, HistoryScore::Confirmed);
        assert_eq!(stored.province, "BC");

        let incidents = queries::incidents_for_property(db.as_ref(), &stored.id)
            .await
            .unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].incident_type, "Homicide");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn rejected_approval_writes_nothing() {
        let tmp = std::env::temp_dir().join("killer_listings_approval_test_reject");
        let _ = std::fs::remove_dir_all(&tmp);

        let db = db::open_db(&tmp.join("approve.db")).await.unwrap();

        let req = ApprovalRequest {
            city: Some("Vancouver".to_string()),
            ..ApprovalRequest::default()
        };
        let err = approve(db.as_ref(), &req).await.err().unwrap();

        assert!(matches!(err, IngestError::Validation { field: "address" }));
        assert_eq!(queries::count_properties(db.as_ref()).await.unwrap(), 0);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn explicit_severity_wins() {
        assert_eq!(resolve_severity(Some(2), Some(Confidence::High)), 2);
    }

    #[test]
    fn confidence_maps_to_severity() {
        assert_eq!(resolve_severity(None, Some(Confidence::High)), 5);
        assert_eq!(resolve_severity(None, Some(Confidence::Medium)), 4);
        assert_eq!(resolve_severity(None, Some(Confidence::Low)), 3);
    }

    #[test]
    fn severity_defaults_when_nothing_given() {
        assert_eq!(resolve_severity(None, None), DEFAULT_SEVERITY);
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_incident_date(Some("2024-01-15")),
            "2024-01-15T00:00:00+00:00"
        );
        assert_eq!(
            parse_incident_date(Some("2019-03-15T00:00:00+00:00")),
            "2019-03-15T00:00:00+00:00"
        );
    }

    #[test]
    fn parses_written_dates() {
        assert_eq!(
            parse_incident_date(Some("September 30, 1988")),
            "1988-09-30T00:00:00+00:00"
        );
        assert_eq!(
            parse_incident_date(Some("September 30 1988")),
            "1988-09-30T00:00:00+00:00"
        );
    }

    #[test]
    fn parses_bare_years() {
        assert_eq!(
            parse_incident_date(Some("1999")),
            "1999-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn unparseable_dates_fall_back_to_now() {
        let now_year = chrono::Utc::now().format("%Y").to_string();
        assert!(parse_incident_date(Some("sometime last week")).starts_with(&now_year));
        assert!(parse_incident_date(None).starts_with(&now_year));
    }

    #[test]
    fn validation_names_the_missing_field() {
        let req = ApprovalRequest {
            address: Some("123 Main Street".to_string()),
            city: Some("Vancouver".to_string()),
            latitude: Some(49.28),
            ..ApprovalRequest::default()
        };
        let err = validate(&req).err().unwrap();
        assert!(matches!(err, IngestError::Validation { field: "longitude" }));
    }

    #[test]
    fn empty_strings_fail_validation() {
        let req = ApprovalRequest {
            address: Some(String::new()),
            city: Some("Vancouver".to_string()),
            latitude: Some(49.28),
            longitude: Some(-123.12),
            ..ApprovalRequest::default()
        };
        let err = validate(&req).err().unwrap();
        assert!(matches!(err, IngestError::Validation { field: "address" }));
    }
}
