use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use db_infra::{Connector, ProvisionConfig};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, RuntimeErr, Value,
};

pub const PLAN_STATEMENTS: usize = 14;

/// Hands out one prepared connection and counts every attempt.
pub struct CountingConnector {
    attempts: AtomicUsize,
    conn: Mutex<Option<DatabaseConnection>>,
}

impl CountingConnector {
    pub fn with(conn: DatabaseConnection) -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Every attempt fails like an unreachable server.
    pub fn refusing() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            conn: Mutex::new(None),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self, _url: &str, _timeout: Duration) -> Result<DatabaseConnection, DbErr> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let conn = self.conn.lock().expect("connector mutex poisoned").take();
        conn.ok_or_else(|| DbErr::Conn(RuntimeErr::Internal("connection refused".into())))
    }
}

pub fn config_with_password(password: &str) -> ProvisionConfig {
    ProvisionConfig {
        password: Some(password.to_string()),
        ..ProvisionConfig::default()
    }
}

pub fn exec_ok(n: usize) -> Vec<MockExecResult> {
    (0..n)
        .map(|_| MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        })
        .collect()
}

pub fn table_rows(names: &[&str]) -> Vec<BTreeMap<&'static str, Value>> {
    names
        .iter()
        .map(|name| BTreeMap::from([("table_name", Value::from(name.to_string()))]))
        .collect()
}

pub fn undefined_table(table: &str) -> DbErr {
    DbErr::Exec(RuntimeErr::Internal(format!(
        r#"relation "{table}" does not exist (SQLSTATE 42P01)"#
    )))
}

pub fn permission_denied(table: &str) -> DbErr {
    DbErr::Exec(RuntimeErr::Internal(format!(
        "permission denied for table {table} (SQLSTATE 42501)"
    )))
}

/// A mock where every plan statement succeeds and both tables verify.
pub fn healthy_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(exec_ok(PLAN_STATEMENTS))
        .append_query_results([table_rows(&["payments", "player_accounts"])])
        .into_connection()
}

/// Flattened SQL text the mock connection executed, without the
/// BEGIN/COMMIT/ROLLBACK markers the mock adds around transactions.
pub fn executed_sql(conn: DatabaseConnection) -> Vec<String> {
    conn.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(|s| s.sql.clone()))
        .filter(|sql| !matches!(sql.as_str(), "BEGIN" | "COMMIT" | "ROLLBACK"))
        .collect()
}
