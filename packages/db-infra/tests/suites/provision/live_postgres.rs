//! Runs against `TEST_DATABASE_URL`; every test returns early without it.

use db_infra::{classify_db_err, provision, DbErrorKind, ProvisionConfig};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use serial_test::serial;
use test_support::{
    connect_live_db, live_db_url, reset_league_tables, unique_email, unique_phone,
};

async fn fresh_db() -> Option<(String, DatabaseConnection)> {
    test_support::logging::init();
    let url = live_db_url()?;
    let conn = connect_live_db(&url).await.expect("connect to test database");
    reset_league_tables(&conn).await.expect("reset league tables");
    Some((url, conn))
}

fn config_for(url: &str) -> ProvisionConfig {
    ProvisionConfig {
        database_url: Some(url.to_string()),
        ..ProvisionConfig::default()
    }
}

async fn strings(conn: &DatabaseConnection, sql: &str) -> Vec<String> {
    conn.query_all(Statement::from_string(DatabaseBackend::Postgres, sql))
        .await
        .expect("catalog query")
        .iter()
        .map(|row| row.try_get::<String>("", "v").expect("text column v"))
        .collect()
}

/// Columns, indexes, policies and RLS flags for the provisioned tables.
async fn schema_snapshot(conn: &DatabaseConnection) -> Vec<String> {
    let mut snapshot = strings(
        conn,
        "SELECT table_name::text || '.' || column_name::text || ' ' || data_type::text \
         || ' ' || is_nullable::text || ' ' || coalesce(column_default::text, '') AS v \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name IN ('player_accounts', 'payments') \
         ORDER BY table_name, ordinal_position",
    )
    .await;
    snapshot.extend(
        strings(
            conn,
            "SELECT indexname::text AS v FROM pg_indexes \
             WHERE schemaname = 'public' AND tablename IN ('player_accounts', 'payments') \
             ORDER BY indexname",
        )
        .await,
    );
    snapshot.extend(
        strings(
            conn,
            "SELECT tablename::text || ':' || policyname::text || ':' || cmd::text AS v \
             FROM pg_policies WHERE schemaname = 'public' ORDER BY tablename, policyname",
        )
        .await,
    );
    snapshot.extend(
        strings(
            conn,
            "SELECT relname::text || ' rls=' || relrowsecurity::text AS v FROM pg_class \
             WHERE relname IN ('player_accounts', 'payments') ORDER BY relname",
        )
        .await,
    );
    snapshot
}

async fn insert_account(
    conn: &DatabaseConnection,
    email: &str,
    phone: &str,
) -> Result<(), sea_orm::DbErr> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "INSERT INTO player_accounts (name, email, phone, password) VALUES ($1, $2, $3, $4)",
        [
            "Test Player".into(),
            email.into(),
            phone.into(),
            "not-a-real-hash".into(),
        ],
    ))
    .await
    .map(|_| ())
}

#[tokio::test]
#[serial]
async fn provisioning_twice_is_idempotent() {
    let Some((url, conn)) = fresh_db().await else {
        return;
    };

    let first = provision(&config_for(&url)).await.expect("first run");
    let after_first = schema_snapshot(&conn).await;
    let second = provision(&config_for(&url)).await.expect("second run");
    let after_second = schema_snapshot(&conn).await;

    assert_eq!(first.tables, vec!["payments", "player_accounts"]);
    assert_eq!(second.tables, first.tables);
    assert_eq!(after_first, after_second);

    let indexes: Vec<_> = after_first
        .iter()
        .filter(|s| s.starts_with("idx_"))
        .collect();
    assert_eq!(indexes.len(), 5, "{indexes:?}");
    assert!(after_first.contains(&"player_accounts rls=true".to_string()));
    assert!(after_first.contains(&"payments:Allow all on payments:ALL".to_string()));
}

#[tokio::test]
#[serial]
async fn duplicate_email_or_phone_is_rejected() {
    let Some((url, conn)) = fresh_db().await else {
        return;
    };
    provision(&config_for(&url)).await.expect("provision");

    let email = unique_email("dup");
    let phone = unique_phone();
    insert_account(&conn, &email, &phone).await.expect("first insert");

    let err = insert_account(&conn, &email, &unique_phone())
        .await
        .expect_err("same email must fail");
    assert_eq!(classify_db_err(&err), DbErrorKind::UniqueViolation);

    let err = insert_account(&conn, &unique_email("dup"), &phone)
        .await
        .expect_err("same phone must fail");
    assert_eq!(classify_db_err(&err), DbErrorKind::UniqueViolation);
}

#[tokio::test]
#[serial]
async fn existing_players_gain_nullable_link_column() {
    let Some((url, conn)) = fresh_db().await else {
        return;
    };
    conn.execute_unprepared(
        "CREATE TABLE players (id SERIAL PRIMARY KEY, name TEXT NOT NULL); \
         INSERT INTO players (name) VALUES ('Ann'), ('Ben');",
    )
    .await
    .expect("seed players");

    let report = provision(&config_for(&url)).await.expect("provision");
    assert!(report.plan.players_column_ensured());

    let nullable = strings(
        &conn,
        "SELECT is_nullable::text AS v FROM information_schema.columns \
         WHERE table_name = 'players' AND column_name = 'player_account_id'",
    )
    .await;
    assert_eq!(nullable, vec!["YES"]);

    let rows = strings(
        &conn,
        "SELECT count(*)::text AS v FROM players WHERE player_account_id IS NULL",
    )
    .await;
    assert_eq!(rows, vec!["2"]);
}

#[tokio::test]
#[serial]
async fn missing_players_table_still_succeeds() {
    let Some((url, _conn)) = fresh_db().await else {
        return;
    };

    let report = provision(&config_for(&url)).await.expect("provision");
    assert_eq!(report.plan.skipped, vec!["players_account_column"]);
    assert_eq!(report.tables.len(), 2);
}
