#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database connection, schema, and queries for Killer Listings.
//!
//! Uses `switchy_database` over `SQLite`. The schema is created with
//! `CREATE TABLE IF NOT EXISTS` when the database is opened, so a fresh
//! deployment needs no separate migration step.

pub mod db;
pub mod queries;
pub mod seed;

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Opening the `SQLite` file failed.
    #[error("Failed to open database: {message}")]
    Open {
        /// Description of what went wrong.
        message: String,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
