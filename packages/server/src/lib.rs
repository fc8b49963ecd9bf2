#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for Killer Listings.
//!
//! Serves the REST API for the property-history map: bounding-box map
//! data, free-text property search, property detail with incident
//! history, on-demand article extraction, geocoding, and the scraper
//! run/approve workflow. All state lives in a local `SQLite` database.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use killer_listings_database::{db, seed};
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
    /// Shared HTTP client for geocoding, article fetches, and AI calls.
    pub http: reqwest::Client,
}

/// Starts the Killer Listings API server.
///
/// Opens the `SQLite` database (creating the schema if needed), seeds
/// demo data when `SEED_DEMO` is set, and starts the Actix-Web HTTP
/// server. This is a regular async function — the caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened or seeding fails.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Opening database...");
    let db_conn = db::open_from_env()
        .await
        .expect("Failed to open database");

    if std::env::var("SEED_DEMO").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
        log::info!("Seeding demo data...");
        seed::seed_demo(db_conn.as_ref())
            .await
            .expect("Failed to seed demo data");
    }

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        http: reqwest::Client::new(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/extract", web::post().to(handlers::extract))
                    .route("/geocode", web::post().to(handlers::geocode))
                    .route("/map", web::get().to(handlers::map_data))
                    .route("/properties", web::get().to(handlers::search_properties))
                    .route("/properties/{id}", web::get().to(handlers::property_detail))
                    .route("/scraper", web::post().to(handlers::run_scraper))
                    .route("/scraper", web::put().to(handlers::approve_incident)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
