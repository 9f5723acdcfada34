//! SeaORM error classification.
//!
//! Callers decide what to tolerate by matching on `DbErrorKind`, never on the
//! raw message.

use sea_orm::{DbErr, RuntimeErr};

pub const SQLSTATE_UNDEFINED_TABLE: &str = "42P01";
pub const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Relation does not exist.
    UndefinedTable,
    UniqueViolation,
    /// Could not reach or authenticate against the server.
    Unavailable,
    Other,
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE {code}")) || msg.contains(&format!("SQLSTATE({code})"))
}

fn runtime_sqlstate(err: &RuntimeErr) -> Option<String> {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => sqlx_err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

/// SQLSTATE reported by the server, if the driver surfaced one.
pub fn sqlstate(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Exec(rt) | DbErr::Query(rt) | DbErr::Conn(rt) => runtime_sqlstate(rt),
        _ => None,
    }
}

pub fn classify_db_err(err: &DbErr) -> DbErrorKind {
    let code = sqlstate(err);
    let matches_code = |expected: &str| match &code {
        Some(code) => code == expected,
        // Errors that lost their typed source (mock connections, wrapped
        // runtime errors) still carry the code in the rendered message.
        None => mentions_sqlstate(&err.to_string(), expected),
    };

    if matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        return DbErrorKind::Unavailable;
    }
    if matches_code(SQLSTATE_UNDEFINED_TABLE) {
        return DbErrorKind::UndefinedTable;
    }
    if matches_code(SQLSTATE_UNIQUE_VIOLATION) {
        return DbErrorKind::UniqueViolation;
    }
    DbErrorKind::Other
}
