//! Demo seed data: a handful of Metro Vancouver properties spanning all
//! three history scores, with a few incidents attached.

use killer_listings_database_models::{NewIncident, NewProperty};
use killer_listings_models::HistoryScore;
use switchy_database::Database;

use crate::{DbError, queries};

struct SeedIncident {
    incident_type: &'static str,
    date: &'static str,
    summary: &'static str,
    source_url: Option<&'static str>,
    severity: i32,
}

struct SeedProperty {
    address: &'static str,
    city: &'static str,
    postal_code: &'static str,
    latitude: f64,
    longitude: f64,
    listing_price: f64,
    history_score: HistoryScore,
    incidents: &'static [SeedIncident],
}

const SEED_PROPERTIES: &[SeedProperty] = &[
    SeedProperty {
        address: "123 Main Street",
        city: "Vancouver",
        postal_code: "V6B 1A1",
        latitude: 49.2827,
        longitude: -123.1207,
        listing_price: 1_250_000.0,
        history_score: HistoryScore::Confirmed,
        incidents: &[SeedIncident {
            incident_type: "Homicide",
            date: "2019-03-15T00:00:00+00:00",
            summary: "A violent incident occurred at this address resulting in one fatality. \
                      The case was investigated by VPD and resulted in criminal charges.",
            source_url: Some("https://example.com/news/incident-123"),
            severity: 5,
        }],
    },
    SeedProperty {
        address: "456 Oak Avenue",
        city: "Burnaby",
        postal_code: "V5H 2N2",
        latitude: 49.2488,
        longitude: -122.9805,
        listing_price: 980_000.0,
        history_score: HistoryScore::Possible,
        incidents: &[SeedIncident {
            incident_type: "Assault",
            date: "2021-08-22T00:00:00+00:00",
            summary: "An assault was reported at or near this address. Police attended and \
                      the investigation is ongoing.",
            source_url: Some("https://example.com/news/incident-456"),
            severity: 3,
        }],
    },
    SeedProperty {
        address: "789 Waterfront Drive",
        city: "Vancouver",
        postal_code: "V6E 1A2",
        latitude: 49.2871,
        longitude: -123.1139,
        listing_price: 2_150_000.0,
        history_score: HistoryScore::Clean,
        incidents: &[],
    },
    SeedProperty {
        address: "321 Cedar Lane",
        city: "Richmond",
        postal_code: "V6Y 1K8",
        latitude: 49.1666,
        longitude: -123.1336,
        listing_price: 1_450_000.0,
        history_score: HistoryScore::Clean,
        incidents: &[],
    },
    SeedProperty {
        address: "555 King George Boulevard",
        city: "Surrey",
        postal_code: "V3T 2X3",
        latitude: 49.1913,
        longitude: -122.849,
        listing_price: 875_000.0,
        history_score: HistoryScore::Confirmed,
        incidents: &[
            SeedIncident {
                incident_type: "Drug-related",
                date: "2020-11-10T00:00:00+00:00",
                summary: "This property was the subject of a drug investigation. Multiple \
                          arrests were made on the premises.",
                source_url: Some("https://example.com/news/incident-555a"),
                severity: 4,
            },
            SeedIncident {
                incident_type: "Weapons offense",
                date: "2018-05-03T00:00:00+00:00",
                summary: "Firearms were discharged at this address during an altercation. \
                          No fatalities reported.",
                source_url: Some("https://example.com/news/incident-555b"),
                severity: 4,
            },
        ],
    },
    SeedProperty {
        address: "888 Granville Street",
        city: "Vancouver",
        postal_code: "V6Z 1K3",
        latitude: 49.278,
        longitude: -123.1237,
        listing_price: 1_850_000.0,
        history_score: HistoryScore::Possible,
        incidents: &[SeedIncident {
            incident_type: "Suspicious death",
            date: "2017-02-28T00:00:00+00:00",
            summary: "A death at this address was initially investigated as suspicious. \
                      Coroner later ruled it accidental.",
            source_url: None,
            severity: 2,
        }],
    },
];

/// Inserts the demo properties and incidents, skipping entirely if the
/// database already contains any properties.
///
/// Returns the number of properties inserted.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn seed_demo(db: &dyn Database) -> Result<u64, DbError> {
    if queries::count_properties(db).await? > 0 {
        log::info!("Database already seeded, skipping demo data");
        return Ok(0);
    }

    let mut inserted = 0u64;

    for seed in SEED_PROPERTIES {
        let property = queries::insert_property(
            db,
            &NewProperty {
                address: seed.address.to_string(),
                city: seed.city.to_string(),
                province: "BC".to_string(),
                postal_code: Some(seed.postal_code.to_string()),
                latitude: seed.latitude,
                longitude: seed.longitude,
                listing_price: Some(seed.listing_price),
                history_score: seed.history_score,
            },
        )
        .await?;

        for incident in seed.incidents {
            queries::insert_incident(
                db,
                &NewIncident {
                    property_id: Some(property.id.clone()),
                    latitude: seed.latitude,
                    longitude: seed.longitude,
                    incident_type: incident.incident_type.to_string(),
                    date: incident.date.to_string(),
                    summary: incident.summary.to_string(),
                    source_url: incident.source_url.map(String::from),
                    severity: incident.severity,
                },
            )
            .await?;
        }

        inserted += 1;
    }

    log::info!("Seeded {inserted} demo properties");
    Ok(inserted)
}
