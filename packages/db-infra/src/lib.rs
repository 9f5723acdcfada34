//! Configuration, connection handling and the provisioning run for the
//! league registration schema. Used by the `league-db` CLI.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use config::db::ProvisionConfig;
pub use error::ProvisionError;
pub use infra::db::{
    open_connection, provision, provision_if_missing, provision_on, provision_with,
    release_connection, schema_status, Connector, PgConnector, ProvisionMode, ProvisionReport,
    SchemaStatus,
};
pub use infra::db_errors::{classify_db_err, DbErrorKind};
