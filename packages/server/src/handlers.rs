//! HTTP handler functions for the Killer Listings API.

use actix_web::{HttpResponse, web};
use killer_listings_ai::providers::{ProviderKind, create_provider, detect_provider_from_env};
use killer_listings_ai::{ExtractError, Extraction, extractor};
use killer_listings_database::queries;
use killer_listings_database_models::{BC_BOUNDS, BoundingBox};
use killer_listings_ingest::approval::{self, ApprovalRequest};
use killer_listings_ingest::orchestrator::{self, DEFAULT_DAYS_BACK, ScraperConfig};
use killer_listings_scraper::article;
use killer_listings_server_models::{
    ApiHealth, ApiIncident, ApiMapIncident, ApiMapProperty, ApiProperty, ApproveResponse,
    ExtractRequest, ExtractResponse, GeocodeRequest, GeocodeResponse, MapQueryParams,
    ScrapeRequest, ScrapeResponse, SearchQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/extract`
///
/// Fetches a news article and runs AI extraction on it. The API key
/// comes from the environment when configured, otherwise from the
/// request body (treated as an `OpenAI` key).
pub async fn extract(state: web::Data<AppState>, body: web::Json<ExtractRequest>) -> HttpResponse {
    let url = body.url.as_deref().filter(|u| !u.is_empty());
    let credentials = detect_provider_from_env().or_else(|| {
        body.ai_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .map(|k| (ProviderKind::OpenAi, k))
    });

    let (Some(url), Some((kind, api_key))) = (url, credentials) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "URL and API key are required"
        }));
    };

    let article_text = match article::fetch_article(&state.http, url).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to fetch article {url}: {e:?}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Could not fetch article. Try a different URL."
            }));
        }
    };

    let provider = create_provider(kind, state.http.clone(), api_key);

    match extractor::extract(provider.as_ref(), &article_text, url).await {
        Ok(Extraction::Relevant(incident)) => HttpResponse::Ok().json(ExtractResponse {
            success: true,
            incident: Some(incident),
            message: None,
        }),
        Ok(Extraction::NotRelevant) => HttpResponse::Ok().json(ExtractResponse {
            success: true,
            incident: None,
            message: Some("No BC incident found in this article".to_string()),
        }),
        Err(ExtractError::Parse { message }) => {
            log::error!("Failed to parse AI response: {message}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Could not parse AI response"
            }))
        }
        Err(e) => {
            log::error!("AI extraction failed: {e:?}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "AI extraction failed. Check your API key."
            }))
        }
    }
}

/// `POST /api/geocode`
///
/// Resolves an address to coordinates, Mapbox first (when `MAPBOX_TOKEN`
/// is set) with a Nominatim fallback.
pub async fn geocode(state: web::Data<AppState>, body: web::Json<GeocodeRequest>) -> HttpResponse {
    let address = body.address.as_deref().filter(|a| !a.is_empty());
    let city = body.city.as_deref().filter(|c| !c.is_empty());

    let (Some(address), Some(city)) = (address, city) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Address and city are required"
        }));
    };

    let mapbox_token = std::env::var("MAPBOX_TOKEN").ok();

    match killer_listings_geocoder::geocode(&state.http, mapbox_token.as_deref(), address, city)
        .await
    {
        Ok(Some(point)) => HttpResponse::Ok().json(GeocodeResponse {
            success: true,
            latitude: point.latitude,
            longitude: point.longitude,
            provider: point.provider.as_str().to_string(),
        }),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Address not found"
        })),
        Err(e) => {
            log::error!("Geocoding failed for {address}, {city}: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Geocoding failed"
            }))
        }
    }
}

/// `GET /api/map`
///
/// Returns properties and unlinked incidents inside the viewport.
/// Missing edges default to the BC-wide bounding box.
pub async fn map_data(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let bounds = BoundingBox::new(
        params.north.unwrap_or(BC_BOUNDS.north),
        params.south.unwrap_or(BC_BOUNDS.south),
        params.east.unwrap_or(BC_BOUNDS.east),
        params.west.unwrap_or(BC_BOUNDS.west),
    );

    let properties = queries::properties_in_bounds(state.db.as_ref(), &bounds).await;
    let incidents = queries::unlinked_incidents_in_bounds(state.db.as_ref(), &bounds).await;

    match (properties, incidents) {
        (Ok(properties), Ok(incidents)) => {
            let properties: Vec<ApiMapProperty> =
                properties.into_iter().map(ApiMapProperty::from).collect();
            let incidents: Vec<ApiMapIncident> =
                incidents.into_iter().map(ApiMapIncident::from).collect();

            HttpResponse::Ok().json(serde_json::json!({
                "properties": properties,
                "incidents": incidents,
            }))
        }
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to fetch map data: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch map data"
            }))
        }
    }
}

/// `GET /api/properties`
///
/// Free-text property search with an optional exact-city filter.
pub async fn search_properties(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
) -> HttpResponse {
    let Some(query) = params.q.as_deref().filter(|q| !q.is_empty()) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Search query is required"
        }));
    };

    match queries::search_properties(state.db.as_ref(), query, params.city.as_deref()).await {
        Ok(rows) => {
            let properties: Vec<ApiProperty> = rows
                .into_iter()
                .map(|row| ApiProperty {
                    incident_count: Some(row.incident_count),
                    ..ApiProperty::from(row.property)
                })
                .collect();

            HttpResponse::Ok().json(serde_json::json!({ "properties": properties }))
        }
        Err(e) => {
            log::error!("Search failed for {query:?}: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to search properties"
            }))
        }
    }
}

/// `GET /api/properties/{id}`
///
/// Property detail with its incidents, newest first.
pub async fn property_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    let property = match queries::get_property(state.db.as_ref(), &id).await {
        Ok(Some(property)) => property,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Property not found"
            }));
        }
        Err(e) => {
            log::error!("Failed to fetch property {id}: {e:?}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch property"
            }));
        }
    };

    match queries::incidents_for_property(state.db.as_ref(), &id).await {
        Ok(incidents) => {
            let property = ApiProperty {
                incidents: Some(incidents.into_iter().map(ApiIncident::from).collect()),
                ..ApiProperty::from(property)
            };

            HttpResponse::Ok().json(serde_json::json!({ "property": property }))
        }
        Err(e) => {
            log::error!("Failed to fetch incidents for property {id}: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch property"
            }))
        }
    }
}

/// `POST /api/scraper`
///
/// Runs the news sweep and returns extracted candidates for review.
/// Nothing is persisted here.
pub async fn run_scraper(
    state: web::Data<AppState>,
    body: web::Json<ScrapeRequest>,
) -> HttpResponse {
    let Some((provider, ai_api_key)) = detect_provider_from_env() else {
        log::warn!("No AI API key configured, scraper run skipped");
        return HttpResponse::Ok().json(ScrapeResponse {
            success: true,
            count: 0,
            incidents: Vec::new(),
        });
    };

    let news_api_key = std::env::var("NEWS_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| body.news_api_key.clone());

    let config = ScraperConfig {
        news_api_key,
        ai_api_key,
        provider,
        days_back: body.days_back.unwrap_or(DEFAULT_DAYS_BACK),
    };

    let incidents = orchestrator::run_scraper(&state.http, &config).await;

    HttpResponse::Ok().json(ScrapeResponse {
        success: true,
        count: incidents.len(),
        incidents,
    })
}

/// `PUT /api/scraper`
///
/// Approves a reviewed candidate and persists it.
pub async fn approve_incident(
    state: web::Data<AppState>,
    body: web::Json<ApprovalRequest>,
) -> HttpResponse {
    match approval::approve(state.db.as_ref(), &body).await {
        Ok(approved) => HttpResponse::Ok().json(ApproveResponse {
            success: true,
            property: ApiProperty::from(approved.property),
            incident: ApiIncident::from(approved.incident),
        }),
        Err(killer_listings_ingest::IngestError::Validation { field }) => {
            log::warn!("Approval rejected, missing {field}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing required fields: address, city, latitude, longitude"
            }))
        }
        Err(e) => {
            log::error!("Failed to save incident: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to save incident"
            }))
        }
    }
}
