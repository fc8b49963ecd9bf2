#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion pipeline for Killer Listings.
//!
//! * [`approval`] — turns a human-approved candidate incident into
//!   persisted property and incident rows.
//! * [`orchestrator`] — runs the automated news sweep: search, fetch,
//!   extract, and return candidates for manual review. Nothing the
//!   orchestrator produces touches the database until approved.

pub mod approval;
pub mod orchestrator;

use killer_listings_database::DbError;
use thiserror::Error;

/// Errors from the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required field was missing from an approval request.
    #[error("Missing required field: {field}")]
    Validation {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Persisting the approved incident failed.
    #[error(transparent)]
    Persist(#[from] DbError),
}
