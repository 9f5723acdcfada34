//! Schema definition for the league registration and payment tables.
//! Pure data: builds the DDL plan and catalog queries, performs no I/O.

pub mod catalog;
pub mod idens;
pub mod plan;
pub mod script;

pub use catalog::{
    column_present_query, tables_present_query, LEAGUE_TABLES, PLAYERS_LINK_COLUMN,
    PROVISIONED_TABLES,
};
pub use plan::{players_column_step, provisioning_plan, ProvisionStep, StepMode};
pub use script::render_script;
