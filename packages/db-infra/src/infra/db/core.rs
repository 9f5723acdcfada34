use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::Connection;
use tracing::{debug, info, warn};

use crate::config::db::ProvisionConfig;
use crate::error::ProvisionError;

/// Opens the single connection a provisioning run works on.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr>;
}

/// Connects to Postgres with one direct attempt, then hands sea-orm a
/// one-connection pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
        let options = PgConnectOptions::from_str(url).map_err(conn_err)?;

        // Dial once directly: the pool retries refused hosts until its
        // acquire timeout and reports only "pool timed out".
        connect_once(&options, timeout).await?.close().await.map_err(conn_err)?;

        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(1)
            .acquire_timeout(timeout)
            .connect_lazy_with(options);
        Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
    }
}

/// A single connection attempt bounded by `timeout`, without retries.
pub async fn connect_once(
    options: &PgConnectOptions,
    timeout: Duration,
) -> Result<PgConnection, DbErr> {
    match tokio::time::timeout(timeout, PgConnection::connect_with(options)).await {
        Ok(result) => result.map_err(conn_err),
        Err(_) => Err(DbErr::Conn(RuntimeErr::Internal(format!(
            "timed out after {}s waiting for the server",
            timeout.as_secs()
        )))),
    }
}

fn conn_err(e: sqlx::Error) -> DbErr {
    DbErr::Conn(RuntimeErr::SqlxError(e))
}

/// Resolve the connection string and open a connection.
///
/// Configuration is validated before the connector is touched, so a missing
/// password never results in a connection attempt.
pub async fn open_connection<C>(
    connector: &C,
    config: &ProvisionConfig,
) -> Result<DatabaseConnection, ProvisionError>
where
    C: Connector + ?Sized,
{
    let url = config.connection_string()?;
    let target = sanitize_db_url(&url);

    info!("connect=start target={}", target);
    let conn = connector
        .connect(&url, config.connect_timeout)
        .await
        .map_err(|source| ProvisionError::Connection {
            target: target.clone(),
            source,
        })?;
    debug!("connect=done target={}", target);

    Ok(conn)
}

/// Close the connection; failures here are logged, not propagated.
pub async fn release_connection(conn: DatabaseConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection");
    }
}

/// Sanitize database URL by masking password in connection strings.
/// Used for logging and error messages.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let Some(scheme_end) = auth_part.find("://") else {
        return url.to_string();
    };
    let userinfo = &auth_part[scheme_end + 3..];
    match userinfo.find(':') {
        Some(colon_pos) => {
            let scheme_user = &auth_part[..scheme_end + 3 + colon_pos];
            format!("{}:***@{}", scheme_user, host_part)
        }
        None => url.to_string(),
    }
}
