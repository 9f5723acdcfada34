//! Optional live Postgres for integration suites.
//!
//! Suites that need a real server read `TEST_DATABASE_URL` and return early
//! when it is unset. The database name must end in `_test`, since
//! `reset_league_tables` drops tables.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

pub const TEST_DATABASE_URL_VAR: &str = "TEST_DATABASE_URL";

/// The live test database URL, if configured and safe to use.
///
/// Panics when the URL points at a database whose name does not end with
/// `_test`, rather than silently skipping.
pub fn live_db_url() -> Option<String> {
    let url = std::env::var(TEST_DATABASE_URL_VAR)
        .ok()
        .filter(|u| !u.trim().is_empty())?;
    let db_name = database_name(&url).unwrap_or_default();
    assert!(
        db_name.ends_with("_test"),
        "{TEST_DATABASE_URL_VAR} must point at a database ending in '_test', got '{db_name}'"
    );
    Some(url)
}

fn database_name(url: &str) -> Option<&str> {
    let after_host = url.split_once("://")?.1.split_once('/')?.1;
    Some(after_host.split(['?', '#']).next().unwrap_or(after_host))
}

pub async fn connect_live_db(url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(url).await
}

/// Drop everything provisioning creates plus the external `players` table.
pub async fn reset_league_tables(conn: &DatabaseConnection) -> Result<(), DbErr> {
    for table in ["payments", "player_accounts", "players"] {
        conn.execute_unprepared(&format!(r#"DROP TABLE IF EXISTS "{table}" CASCADE"#))
            .await?;
    }
    Ok(())
}
