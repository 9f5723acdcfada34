use std::fmt::Write as _;

use crate::plan::{provisioning_plan, ProvisionStep, StepMode};

const HEADER: &str = "\
-- =====================================================
-- League registration & payment tables
-- Safe to run more than once (every statement is guarded)
-- =====================================================
";

/// Render the provisioning plan as a standalone script for a SQL editor.
///
/// The players step becomes a `DO` block that swallows `undefined_table`, and
/// atomic steps are wrapped in `BEGIN`/`COMMIT`, so pasting the script gives
/// the same result as running the provisioner.
pub fn render_script() -> String {
    let mut out = String::from(HEADER);
    for step in provisioning_plan() {
        out.push('\n');
        let _ = writeln!(out, "-- {}", step.label);
        render_step(&mut out, &step);
    }
    out
}

fn render_step(out: &mut String, step: &ProvisionStep) {
    match step.mode {
        StepMode::Required => {
            for sql in &step.statements {
                let _ = writeln!(out, "{sql};");
            }
        }
        StepMode::Atomic => {
            out.push_str("BEGIN;\n");
            for sql in &step.statements {
                let _ = writeln!(out, "{sql};");
            }
            out.push_str("COMMIT;\n");
        }
        StepMode::TolerateMissingTable => {
            out.push_str("DO $$\nBEGIN\n");
            for sql in &step.statements {
                let _ = writeln!(out, "    {sql};");
            }
            out.push_str("EXCEPTION\n    WHEN undefined_table THEN NULL;\nEND $$;\n");
        }
    }
}
