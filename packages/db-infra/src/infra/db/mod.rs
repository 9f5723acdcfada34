pub mod core;
pub mod provision;

pub use self::core::{
    connect_once, open_connection, release_connection, sanitize_db_url, Connector, PgConnector,
};
pub use provision::{
    apply_and_verify, apply_plan, inspect_schema, present_tables, provision,
    provision_if_missing, provision_if_missing_with, provision_on, provision_with, run_step,
    schema_status, schema_status_with, verify_tables, PlanOutcome, ProvisionMode,
    ProvisionReport, SchemaStatus, StepOutcome, TableStatus,
};
