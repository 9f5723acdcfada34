use std::time::Instant;

use league_schema::{
    column_present_query, players_column_step, provisioning_plan, tables_present_query,
    ProvisionStep, StepMode, LEAGUE_TABLES, PLAYERS_LINK_COLUMN, PROVISIONED_TABLES,
};
use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};
use tracing::{debug, error, info};

use crate::config::db::ProvisionConfig;
use crate::error::ProvisionError;
use crate::infra::db::core::{open_connection, release_connection, Connector, PgConnector};
use crate::infra::db_errors::{classify_db_err, DbErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    /// Tolerated undefined-table error; nothing was changed.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOutcome {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl PlanOutcome {
    /// Whether `players.player_account_id` was ensured (false when `players` is absent).
    pub fn players_column_ensured(&self) -> bool {
        self.applied.contains(&"players_account_column")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Tables confirmed present after the run, as returned by the catalog.
    pub tables: Vec<String>,
    pub plan: PlanOutcome,
    /// Set by `provision_if_missing` when both tables were found up front.
    pub already_present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    pub name: &'static str,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatus {
    pub tables: Vec<TableStatus>,
    pub players_link_column: bool,
}

impl SchemaStatus {
    pub fn ready(&self) -> bool {
        self.tables.iter().all(|t| t.exists)
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.tables
            .iter()
            .filter(|t| !t.exists)
            .map(|t| t.name)
            .collect()
    }
}

/// Whether a run applies the whole plan or only fills in what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionMode {
    Full,
    /// Full plan only when a table is missing; otherwise just the players column.
    IfMissing,
}

/// Provision the registration/payment schema against the configured database.
pub async fn provision(config: &ProvisionConfig) -> Result<ProvisionReport, ProvisionError> {
    provision_with(&PgConnector, config).await
}

pub async fn provision_with<C>(
    connector: &C,
    config: &ProvisionConfig,
) -> Result<ProvisionReport, ProvisionError>
where
    C: Connector + ?Sized,
{
    let conn = open_connection(connector, config).await?;
    let result = provision_on(&conn, ProvisionMode::Full).await;
    release_connection(conn).await;
    result
}

/// Like `provision`, but only runs the full plan when a table is missing.
/// With both tables present only the players link column is ensured.
pub async fn provision_if_missing(
    config: &ProvisionConfig,
) -> Result<ProvisionReport, ProvisionError> {
    provision_if_missing_with(&PgConnector, config).await
}

pub async fn provision_if_missing_with<C>(
    connector: &C,
    config: &ProvisionConfig,
) -> Result<ProvisionReport, ProvisionError>
where
    C: Connector + ?Sized,
{
    let conn = open_connection(connector, config).await?;
    let result = provision_on(&conn, ProvisionMode::IfMissing).await;
    release_connection(conn).await;
    result
}

/// Run provisioning on an already open connection. The caller owns the
/// connection and releases it.
pub async fn provision_on<C>(
    conn: &C,
    mode: ProvisionMode,
) -> Result<ProvisionReport, ProvisionError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let start = Instant::now();
    info!("provision=start mode={:?}", mode);

    let result = match mode {
        ProvisionMode::Full => apply_and_verify(conn).await,
        ProvisionMode::IfMissing => ensure_present(conn).await,
    };

    log_result(&result, start);
    result
}

/// Report which league tables exist. Never mutates the schema.
pub async fn schema_status(config: &ProvisionConfig) -> Result<SchemaStatus, ProvisionError> {
    schema_status_with(&PgConnector, config).await
}

pub async fn schema_status_with<C>(
    connector: &C,
    config: &ProvisionConfig,
) -> Result<SchemaStatus, ProvisionError>
where
    C: Connector + ?Sized,
{
    let conn = open_connection(connector, config).await?;
    let result = inspect_schema(&conn).await;
    release_connection(conn).await;
    result
}

/// Run the full plan, then confirm both tables through the catalog.
pub async fn apply_and_verify<C>(conn: &C) -> Result<ProvisionReport, ProvisionError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let plan = apply_plan(conn, &provisioning_plan()).await?;
    let tables = verify_tables(conn).await?;
    Ok(ProvisionReport {
        tables,
        plan,
        already_present: false,
    })
}

async fn ensure_present<C>(conn: &C) -> Result<ProvisionReport, ProvisionError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let found = present_tables(conn, &PROVISIONED_TABLES)
        .await
        .map_err(|e| ProvisionError::execution("check_tables", e))?;

    if found.len() < PROVISIONED_TABLES.len() {
        info!(found = ?found, "tables missing, running full plan");
        return apply_and_verify(conn).await;
    }

    let plan = apply_plan(conn, &[players_column_step()]).await?;
    Ok(ProvisionReport {
        tables: found,
        plan,
        already_present: true,
    })
}

/// Execute steps in order, stopping at the first failure.
pub async fn apply_plan<C>(conn: &C, plan: &[ProvisionStep]) -> Result<PlanOutcome, ProvisionError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut outcome = PlanOutcome::default();
    for step in plan {
        match run_step(conn, step).await? {
            StepOutcome::Applied => outcome.applied.push(step.label),
            StepOutcome::Skipped => outcome.skipped.push(step.label),
        }
    }
    Ok(outcome)
}

pub async fn run_step<C>(conn: &C, step: &ProvisionStep) -> Result<StepOutcome, ProvisionError>
where
    C: ConnectionTrait + TransactionTrait,
{
    debug!(
        step = step.label,
        mode = ?step.mode,
        statements = step.statements.len(),
        "step=start"
    );
    let fail = |e: DbErr| ProvisionError::execution(step.label, e);

    match step.mode {
        StepMode::Required => {
            for sql in &step.statements {
                conn.execute_unprepared(sql).await.map_err(fail)?;
            }
        }
        StepMode::Atomic => {
            let txn = conn.begin().await.map_err(fail)?;
            for sql in &step.statements {
                // dropping txn on error rolls back
                txn.execute_unprepared(sql).await.map_err(fail)?;
            }
            txn.commit().await.map_err(fail)?;
        }
        StepMode::TolerateMissingTable => {
            for sql in &step.statements {
                if let Err(e) = conn.execute_unprepared(sql).await {
                    if classify_db_err(&e) == DbErrorKind::UndefinedTable {
                        info!(step = step.label, "step=skipped reason=undefined_table");
                        return Ok(StepOutcome::Skipped);
                    }
                    return Err(fail(e));
                }
            }
        }
    }

    debug!(step = step.label, "step=done");
    Ok(StepOutcome::Applied)
}

/// Names from `names` that exist in the public schema, in catalog order.
pub async fn present_tables<C>(conn: &C, names: &[&str]) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = conn
        .get_database_backend()
        .build(&tables_present_query(names));
    let rows = conn.query_all(stmt).await?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "table_name"))
        .collect()
}

pub async fn verify_tables<C>(conn: &C) -> Result<Vec<String>, ProvisionError>
where
    C: ConnectionTrait,
{
    let found = present_tables(conn, &PROVISIONED_TABLES)
        .await
        .map_err(|e| ProvisionError::execution("verify_tables", e))?;

    let missing: Vec<String> = PROVISIONED_TABLES
        .iter()
        .filter(|name| !found.iter().any(|f| f == *name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ProvisionError::Verification { missing });
    }

    info!(tables = ?found, "verify=ok");
    Ok(found)
}

pub async fn inspect_schema<C>(conn: &C) -> Result<SchemaStatus, ProvisionError>
where
    C: ConnectionTrait,
{
    let found = present_tables(conn, &LEAGUE_TABLES)
        .await
        .map_err(|e| ProvisionError::execution("status_tables", e))?;

    let (table, column) = PLAYERS_LINK_COLUMN;
    let stmt = conn
        .get_database_backend()
        .build(&column_present_query(table, column));
    let players_link_column = conn
        .query_one(stmt)
        .await
        .map_err(|e| ProvisionError::execution("status_columns", e))?
        .is_some();

    let tables = LEAGUE_TABLES
        .iter()
        .map(|&name| TableStatus {
            name,
            exists: found.iter().any(|f| f == name),
        })
        .collect();

    Ok(SchemaStatus {
        tables,
        players_link_column,
    })
}

fn log_result(result: &Result<ProvisionReport, ProvisionError>, start: Instant) {
    match result {
        Ok(report) => info!(
            tables = ?report.tables,
            skipped = ?report.plan.skipped,
            already_present = report.already_present,
            elapsed_ms = start.elapsed().as_millis(),
            "provision=done"
        ),
        Err(e) => error!(
            error = %e,
            elapsed_ms = start.elapsed().as_millis(),
            "provision=failed"
        ),
    }
}
