//! Ordered DDL plan for the registration/payment tables.
//!
//! Every statement is idempotent on its own, so the plan can be re-applied
//! against a database that already holds some or all of these objects.

use sea_orm::sea_query::{
    ColumnDef, Expr, Index, IndexCreateStatement, PostgresQueryBuilder, Table,
    TableAlterStatement, TableCreateStatement,
};

use crate::idens::{Payments, PlayerAccounts, Players};

/// How the executor treats the statements of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Each statement runs on its own; any error fails the run.
    Required,
    /// The target table is owned elsewhere. An undefined-table error means
    /// there is nothing to alter and the step is skipped.
    TolerateMissingTable,
    /// All statements apply in a single transaction.
    Atomic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionStep {
    pub label: &'static str,
    pub mode: StepMode,
    pub statements: Vec<String>,
}

impl ProvisionStep {
    fn new(label: &'static str, mode: StepMode, statements: Vec<String>) -> Self {
        Self {
            label,
            mode,
            statements,
        }
    }
}

pub const PLAYER_ACCOUNTS_POLICY: &str = "Allow all on player_accounts";
pub const PAYMENTS_POLICY: &str = "Allow all on payments";

/// The full plan in execution order: tables, the players link column,
/// row-level security, policies, then indexes.
pub fn provisioning_plan() -> Vec<ProvisionStep> {
    vec![
        ProvisionStep::new(
            "create_player_accounts",
            StepMode::Required,
            vec![player_accounts_table().build(PostgresQueryBuilder)],
        ),
        ProvisionStep::new(
            "create_payments",
            StepMode::Required,
            vec![payments_table().build(PostgresQueryBuilder)],
        ),
        ProvisionStep::new(
            "players_account_column",
            StepMode::TolerateMissingTable,
            vec![players_account_column().build(PostgresQueryBuilder)],
        ),
        ProvisionStep::new(
            "enable_row_level_security",
            StepMode::Required,
            vec![
                enable_rls("player_accounts"),
                enable_rls("payments"),
            ],
        ),
        ProvisionStep::new(
            "policy_player_accounts",
            StepMode::Atomic,
            allow_all_policy(PLAYER_ACCOUNTS_POLICY, "player_accounts"),
        ),
        ProvisionStep::new(
            "policy_payments",
            StepMode::Atomic,
            allow_all_policy(PAYMENTS_POLICY, "payments"),
        ),
        ProvisionStep::new(
            "create_indexes",
            StepMode::Required,
            indexes()
                .iter()
                .map(|idx| idx.build(PostgresQueryBuilder))
                .collect(),
        ),
    ]
}

/// Just the players link column step, for runs where both tables already exist.
pub fn players_column_step() -> ProvisionStep {
    ProvisionStep::new(
        "players_account_column",
        StepMode::TolerateMissingTable,
        vec![players_account_column().build(PostgresQueryBuilder)],
    )
}

fn player_accounts_table() -> TableCreateStatement {
    Table::create()
        .table(PlayerAccounts::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(PlayerAccounts::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(PlayerAccounts::Name).string_len(255).not_null())
        .col(
            ColumnDef::new(PlayerAccounts::Email)
                .string_len(255)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(PlayerAccounts::Phone)
                .string_len(20)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(PlayerAccounts::Password)
                .string_len(255)
                .not_null(),
        )
        .col(ColumnDef::new(PlayerAccounts::PreferredTeam).string_len(100))
        .col(ColumnDef::new(PlayerAccounts::ExperienceLevel).string_len(50))
        .col(ColumnDef::new(PlayerAccounts::Bio).text())
        .col(ColumnDef::new(PlayerAccounts::PhotoUrl).text())
        .col(ColumnDef::new(PlayerAccounts::PlayerId).integer())
        .col(
            ColumnDef::new(PlayerAccounts::PaymentStatus)
                .string_len(50)
                .default("pending"),
        )
        .col(ColumnDef::new(PlayerAccounts::PaymentDate).timestamp_with_time_zone())
        .col(ColumnDef::new(PlayerAccounts::TransactionCode).string_len(100))
        .col(
            ColumnDef::new(PlayerAccounts::Status)
                .string_len(50)
                .default("inactive"),
        )
        .col(
            ColumnDef::new(PlayerAccounts::ProfileCompleted)
                .boolean()
                .default(false),
        )
        .col(
            ColumnDef::new(PlayerAccounts::RegistrationDate)
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(PlayerAccounts::CreatedAt)
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(PlayerAccounts::UpdatedAt)
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn payments_table() -> TableCreateStatement {
    Table::create()
        .table(Payments::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Payments::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        // logical reference to player_accounts.id, deliberately no FK
        .col(ColumnDef::new(Payments::PlayerAccountId).integer())
        .col(ColumnDef::new(Payments::Amount).decimal_len(10, 2).not_null())
        .col(ColumnDef::new(Payments::Phone).string_len(20).not_null())
        .col(ColumnDef::new(Payments::Reference).string_len(100))
        .col(ColumnDef::new(Payments::CheckoutRequestId).string_len(255))
        .col(ColumnDef::new(Payments::MerchantRequestId).string_len(255))
        .col(ColumnDef::new(Payments::TransactionCode).string_len(100))
        .col(
            ColumnDef::new(Payments::Status)
                .string_len(50)
                .default("pending"),
        )
        .col(
            ColumnDef::new(Payments::PaymentType)
                .string_len(50)
                .default("registration"),
        )
        .col(ColumnDef::new(Payments::ErrorMessage).text())
        .col(
            ColumnDef::new(Payments::CreatedAt)
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Payments::CompletedAt).timestamp_with_time_zone())
        .to_owned()
}

fn players_account_column() -> TableAlterStatement {
    Table::alter()
        .table(Players::Table)
        .add_column_if_not_exists(ColumnDef::new(Players::PlayerAccountId).integer())
        .to_owned()
}

fn enable_rls(table: &str) -> String {
    format!(r#"ALTER TABLE "{table}" ENABLE ROW LEVEL SECURITY"#)
}

// sea-query has no policy builder; names are fixed constants so plain formatting is safe.
fn allow_all_policy(policy: &str, table: &str) -> Vec<String> {
    vec![
        format!(r#"DROP POLICY IF EXISTS "{policy}" ON "{table}""#),
        format!(
            r#"CREATE POLICY "{policy}" ON "{table}" FOR ALL USING (true) WITH CHECK (true)"#
        ),
    ]
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_player_accounts_email")
            .table(PlayerAccounts::Table)
            .col(PlayerAccounts::Email)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_player_accounts_phone")
            .table(PlayerAccounts::Table)
            .col(PlayerAccounts::Phone)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_player_accounts_status")
            .table(PlayerAccounts::Table)
            .col(PlayerAccounts::Status)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_payments_checkout_id")
            .table(Payments::Table)
            .col(Payments::CheckoutRequestId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_payments_account_id")
            .table(Payments::Table)
            .col(Payments::PlayerAccountId)
            .to_owned(),
    ]
}
