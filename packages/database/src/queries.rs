//! Query functions for the `properties` and `incidents` tables.
//!
//! All queries go through `query_raw_params()` / `exec_raw_params()` with
//! positional parameters. Row extraction uses
//! `moosicbox_json_utils::database::ToValue`.

use killer_listings_database_models::{
    BoundingBox, IncidentRow, NewIncident, NewProperty, PropertyRow, PropertySearchRow,
};
use killer_listings_models::HistoryScore;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue, Row};

use crate::DbError;

const PROPERTY_COLUMNS: &str = "id, address, city, province, postal_code, latitude, longitude, \
                                listing_price, history_score, created_at";

const INCIDENT_COLUMNS: &str = "id, property_id, latitude, longitude, type, date, summary, \
                                source_url, severity, created_at";

/// Maximum number of rows returned by a free-text property search.
pub const SEARCH_LIMIT: u32 = 20;

fn parse_property_row(row: &Row) -> Result<PropertyRow, DbError> {
    let score: String = row.to_value("history_score").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse history_score: {e}"),
    })?;

    Ok(PropertyRow {
        id: row.to_value("id").unwrap_or_default(),
        address: row.to_value("address").unwrap_or_default(),
        city: row.to_value("city").unwrap_or_default(),
        province: row.to_value("province").unwrap_or_default(),
        postal_code: row.to_value("postal_code").unwrap_or(None),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        listing_price: row.to_value("listing_price").unwrap_or(None),
        history_score: score.parse().unwrap_or(HistoryScore::Clean),
        created_at: row.to_value("created_at").unwrap_or_default(),
    })
}

fn parse_incident_row(row: &Row) -> IncidentRow {
    IncidentRow {
        id: row.to_value("id").unwrap_or_default(),
        property_id: row.to_value("property_id").unwrap_or(None),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        incident_type: row.to_value("type").unwrap_or_default(),
        date: row.to_value("date").unwrap_or_default(),
        summary: row.to_value("summary").unwrap_or_default(),
        source_url: row.to_value("source_url").unwrap_or(None),
        severity: row.to_value("severity").unwrap_or(0),
        created_at: row.to_value("created_at").unwrap_or_default(),
    }
}

/// Finds a property whose address *contains* the candidate address text and
/// whose city matches exactly.
///
/// This asymmetric loose match (substring on address, exact on city) is
/// deliberate: it tolerates formatting variance in scraped addresses at the
/// cost of potential false merges.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_property_matching(
    db: &dyn Database,
    address: &str,
    city: &str,
) -> Result<Option<PropertyRow>, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "SELECT {PROPERTY_COLUMNS} FROM properties
                 WHERE address LIKE '%' || $1 || '%' AND city = $2
                 LIMIT 1"
            ),
            &[
                DatabaseValue::String(address.to_string()),
                DatabaseValue::String(city.to_string()),
            ],
        )
        .await?;

    rows.first().map(parse_property_row).transpose()
}

/// Inserts a new property and returns the stored row.
///
/// The id (UUID v4) and `created_at` timestamp are generated here.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_property(
    db: &dyn Database,
    property: &NewProperty,
) -> Result<PropertyRow, DbError> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    db.exec_raw_params(
        "INSERT INTO properties (
            id, address, city, province, postal_code, latitude, longitude,
            listing_price, history_score, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        &[
            DatabaseValue::String(id.clone()),
            DatabaseValue::String(property.address.clone()),
            DatabaseValue::String(property.city.clone()),
            DatabaseValue::String(property.province.clone()),
            property
                .postal_code
                .as_ref()
                .map_or(DatabaseValue::Null, |p| DatabaseValue::String(p.clone())),
            DatabaseValue::Real64(property.latitude),
            DatabaseValue::Real64(property.longitude),
            property
                .listing_price
                .map_or(DatabaseValue::Null, DatabaseValue::Real64),
            DatabaseValue::String(property.history_score.to_string()),
            DatabaseValue::String(created_at.clone()),
        ],
    )
    .await?;

    Ok(PropertyRow {
        id,
        address: property.address.clone(),
        city: property.city.clone(),
        province: property.province.clone(),
        postal_code: property.postal_code.clone(),
        latitude: property.latitude,
        longitude: property.longitude,
        listing_price: property.listing_price,
        history_score: property.history_score,
        created_at,
    })
}

/// Sets a property's history score to `CONFIRMED`.
///
/// Idempotent if the property is already `CONFIRMED`.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn confirm_property(db: &dyn Database, property_id: &str) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE properties SET history_score = $1 WHERE id = $2",
        &[
            DatabaseValue::String(HistoryScore::Confirmed.to_string()),
            DatabaseValue::String(property_id.to_string()),
        ],
    )
    .await?;

    Ok(())
}

/// Inserts a new incident and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_incident(
    db: &dyn Database,
    incident: &NewIncident,
) -> Result<IncidentRow, DbError> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    db.exec_raw_params(
        "INSERT INTO incidents (
            id, property_id, latitude, longitude, type, date, summary,
            source_url, severity, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        &[
            DatabaseValue::String(id.clone()),
            incident
                .property_id
                .as_ref()
                .map_or(DatabaseValue::Null, |p| DatabaseValue::String(p.clone())),
            DatabaseValue::Real64(incident.latitude),
            DatabaseValue::Real64(incident.longitude),
            DatabaseValue::String(incident.incident_type.clone()),
            DatabaseValue::String(incident.date.clone()),
            DatabaseValue::String(incident.summary.clone()),
            incident
                .source_url
                .as_ref()
                .map_or(DatabaseValue::Null, |u| DatabaseValue::String(u.clone())),
            DatabaseValue::Int32(incident.severity),
            DatabaseValue::String(created_at.clone()),
        ],
    )
    .await?;

    Ok(IncidentRow {
        id,
        property_id: incident.property_id.clone(),
        latitude: incident.latitude,
        longitude: incident.longitude,
        incident_type: incident.incident_type.clone(),
        date: incident.date.clone(),
        summary: incident.summary.clone(),
        source_url: incident.source_url.clone(),
        severity: incident.severity,
        created_at,
    })
}

/// Returns all properties inside the bounding box (inclusive edges).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn properties_in_bounds(
    db: &dyn Database,
    bounds: &BoundingBox,
) -> Result<Vec<PropertyRow>, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "SELECT {PROPERTY_COLUMNS} FROM properties
                 WHERE latitude >= $1 AND latitude <= $2
                   AND longitude >= $3 AND longitude <= $4"
            ),
            &[
                DatabaseValue::Real64(bounds.south),
                DatabaseValue::Real64(bounds.north),
                DatabaseValue::Real64(bounds.west),
                DatabaseValue::Real64(bounds.east),
            ],
        )
        .await?;

    rows.iter().map(parse_property_row).collect()
}

/// Returns incidents inside the bounding box that are not linked to any
/// property (for plotting standalone incident pins).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn unlinked_incidents_in_bounds(
    db: &dyn Database,
    bounds: &BoundingBox,
) -> Result<Vec<IncidentRow>, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "SELECT {INCIDENT_COLUMNS} FROM incidents
                 WHERE latitude >= $1 AND latitude <= $2
                   AND longitude >= $3 AND longitude <= $4
                   AND property_id IS NULL"
            ),
            &[
                DatabaseValue::Real64(bounds.south),
                DatabaseValue::Real64(bounds.north),
                DatabaseValue::Real64(bounds.west),
                DatabaseValue::Real64(bounds.east),
            ],
        )
        .await?;

    Ok(rows.iter().map(parse_incident_row).collect())
}

/// Free-text search across address, postal code, and city, optionally
/// narrowed to an exact city, limited to BC properties and at most
/// [`SEARCH_LIMIT`] rows. Each result carries its incident count.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn search_properties(
    db: &dyn Database,
    query: &str,
    city: Option<&str>,
) -> Result<Vec<PropertySearchRow>, DbError> {
    let mut sql = format!(
        "SELECT {PROPERTY_COLUMNS},
                (SELECT COUNT(*) FROM incidents i WHERE i.property_id = properties.id)
                    AS incident_count
         FROM properties
         WHERE (address LIKE '%' || $1 || '%'
             OR postal_code LIKE '%' || $1 || '%'
             OR city LIKE '%' || $1 || '%')
           AND province = 'BC'"
    );

    let mut params = vec![DatabaseValue::String(query.to_string())];

    if let Some(city) = city {
        sql.push_str(" AND city = $2");
        params.push(DatabaseValue::String(city.to_string()));
    }

    sql.push_str(&format!(" LIMIT {SEARCH_LIMIT}"));

    let rows = db.query_raw_params(&sql, &params).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(PropertySearchRow {
            property: parse_property_row(row)?,
            incident_count: row.to_value("incident_count").unwrap_or(0),
        });
    }

    Ok(results)
}

/// Looks up a single property by id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_property(db: &dyn Database, id: &str) -> Result<Option<PropertyRow>, DbError> {
    let rows = db
        .query_raw_params(
            &format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"),
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.first().map(parse_property_row).transpose()
}

/// Returns a property's incidents, most recent first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn incidents_for_property(
    db: &dyn Database,
    property_id: &str,
) -> Result<Vec<IncidentRow>, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "SELECT {INCIDENT_COLUMNS} FROM incidents
                 WHERE property_id = $1
                 ORDER BY date DESC"
            ),
            &[DatabaseValue::String(property_id.to_string())],
        )
        .await?;

    Ok(rows.iter().map(parse_incident_row).collect())
}

/// Returns the total number of stored properties.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn count_properties(db: &dyn Database) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) as cnt FROM properties", &[])
        .await?;

    Ok(rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0)))
}
