use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use db_infra::{
    open_connection, provision_on, release_connection, schema_status, PgConnector,
    ProvisionConfig, ProvisionError, ProvisionMode,
};
use league_schema::render_script;
use tracing::warn;

mod cli;
mod report;
mod telemetry;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    // A .env file is optional; variables already in the environment win.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env file");
        }
    }

    exit_code(run(&cli, &mut io::stdout()).await)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: &Cli, out: &mut dyn Write) -> bool {
    match cli.command() {
        Command::PrintSql => {
            say(out, render_script().trim_end());
            true
        }
        Command::Status => {
            say(out, "🔧 Checking database tables...");
            let status = match load_config(cli) {
                Ok(config) => schema_status(&config).await,
                Err(e) => Err(e),
            };
            match status {
                Ok(status) => {
                    print_lines(out, report::status_lines(&status));
                    status.ready()
                }
                Err(e) => fail(out, &e),
            }
        }
        Command::Run { if_missing } => {
            say(out, "🔧 Setting up database tables...");
            let config = match load_config(cli) {
                Ok(config) => config,
                Err(e) => return fail(out, &e),
            };
            if config.has_credentials() {
                say(out, "📡 Connecting to Supabase PostgreSQL...");
            }
            let conn = match open_connection(&PgConnector, &config).await {
                Ok(conn) => conn,
                Err(e) => return fail(out, &e),
            };

            say(out, "📋 Creating tables...");
            let mode = if if_missing {
                ProvisionMode::IfMissing
            } else {
                ProvisionMode::Full
            };
            let result = provision_on(&conn, mode).await;
            release_connection(conn).await;

            match result {
                Ok(report) => {
                    print_lines(out, report::provision_lines(&report));
                    true
                }
                Err(e) => fail(out, &e),
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<ProvisionConfig, ProvisionError> {
    cli.overrides.apply(ProvisionConfig::from_env()?)
}

fn fail(out: &mut dyn Write, err: &ProvisionError) -> bool {
    print_lines(out, report::error_lines(err));
    false
}

fn print_lines(out: &mut dyn Write, lines: Vec<String>) {
    for line in lines {
        say(out, &line);
    }
}

// A closed stdout must not turn a finished run into a panic.
fn say(out: &mut dyn Write, line: &str) {
    let _ = writeln!(out, "{line}");
}
