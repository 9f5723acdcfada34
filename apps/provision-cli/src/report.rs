//! Human-readable progress and result lines for stdout.

use db_infra::{ProvisionError, ProvisionReport, SchemaStatus};

pub fn provision_lines(report: &ProvisionReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.already_present {
        lines.push("ℹ️  Tables already present, ensured players link column only".to_string());
    }
    lines.push(format!("✅ Tables verified: {}", report.tables.join(", ")));
    if report.plan.skipped.contains(&"players_account_column") {
        lines.push("ℹ️  No players table found, skipped player_account_id column".to_string());
    }
    lines.push("✅ Database setup complete!".to_string());
    lines
}

pub fn status_lines(status: &SchemaStatus) -> Vec<String> {
    let mut lines: Vec<String> = status
        .tables
        .iter()
        .map(|t| {
            let mark = if t.exists { "✅ exists" } else { "❌ missing" };
            format!("   {}: {}", t.name, mark)
        })
        .collect();
    lines.push(format!(
        "   players.player_account_id: {}",
        if status.players_link_column {
            "✅ exists"
        } else {
            "❌ missing"
        }
    ));
    if status.ready() {
        lines.push("✅ All league tables present".to_string());
    } else {
        lines.push(format!("⚠️  Missing: {}", status.missing().join(", ")));
    }
    lines
}

pub fn error_lines(err: &ProvisionError) -> Vec<String> {
    let mut lines = vec![format!("❌ {err}")];
    lines.extend(err.hints().into_iter().map(|h| format!("   {h}")));
    lines
}
