use sea_orm::sea_query::{Alias, Expr, Func, FunctionCall, Order, Query, SelectStatement};

use crate::idens::InformationSchema;

pub const CATALOG_SCHEMA: &str = "public";

/// Tables this program creates and verifies.
pub const PROVISIONED_TABLES: [&str; 2] = ["player_accounts", "payments"];

/// Every table the league app expects, including the ones it owns itself.
pub const LEAGUE_TABLES: [&str; 5] = [
    "players",
    "player_accounts",
    "payments",
    "fixtures",
    "results",
];

/// Column added to the externally owned `players` table.
pub const PLAYERS_LINK_COLUMN: (&str, &str) = ("players", "player_account_id");

// information_schema columns are `sql_identifier`; cast so drivers decode them as text.
fn as_text(col: InformationSchema) -> FunctionCall {
    Func::cast_as(Expr::col(col), Alias::new("text"))
}

/// `SELECT table_name FROM information_schema.tables` restricted to `names`.
pub fn tables_present_query(names: &[&str]) -> SelectStatement {
    Query::select()
        .expr_as(as_text(InformationSchema::TableName), InformationSchema::TableName)
        .from((InformationSchema::Schema, InformationSchema::Tables))
        .and_where(Expr::col(InformationSchema::TableSchema).eq(CATALOG_SCHEMA))
        .and_where(Expr::col(InformationSchema::TableName).is_in(names.iter().copied()))
        .order_by(InformationSchema::TableName, Order::Asc)
        .to_owned()
}

pub fn column_present_query(table: &str, column: &str) -> SelectStatement {
    Query::select()
        .expr_as(as_text(InformationSchema::ColumnName), InformationSchema::ColumnName)
        .from((InformationSchema::Schema, InformationSchema::Columns))
        .and_where(Expr::col(InformationSchema::TableSchema).eq(CATALOG_SCHEMA))
        .and_where(Expr::col(InformationSchema::TableName).eq(table))
        .and_where(Expr::col(InformationSchema::ColumnName).eq(column))
        .to_owned()
}
