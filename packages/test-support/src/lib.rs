//! Test support for the league schema crates
//!
//! Unique test data, idempotent test logging, and access to an optional live
//! Postgres database for integration suites.

pub mod live_db;
pub mod logging;
pub mod unique;

pub use live_db::{connect_live_db, live_db_url, reset_league_tables, TEST_DATABASE_URL_VAR};
pub use unique::{unique_email, unique_phone, unique_str};
