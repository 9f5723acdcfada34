use clap::{Args, Parser, Subcommand};
use db_infra::db::parse_port;
use db_infra::{ProvisionConfig, ProvisionError};

#[derive(Debug, Parser)]
#[command(name = "league-db")]
#[command(about = "Provision the league registration and payment tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Create tables, policies and indexes (default)
    Run {
        /// Only run the full setup when player_accounts or payments is missing
        #[arg(long)]
        if_missing: bool,
    },
    /// Report which league tables exist without changing anything
    Status,
    /// Print the setup script for a SQL editor; needs no database
    PrintSql,
}

/// Replace the fixed connection identifiers for this run.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Supabase project reference used in the pooler username
    #[arg(long, global = true)]
    pub project_ref: Option<String>,

    /// Pooler host name
    #[arg(long, global = true)]
    pub pooler_host: Option<String>,

    /// Pooler port
    #[arg(long, global = true)]
    pub pooler_port: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    pub database: Option<String>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run { if_missing: false })
    }
}

impl Overrides {
    /// Flags win over the environment.
    pub fn apply(&self, mut config: ProvisionConfig) -> Result<ProvisionConfig, ProvisionError> {
        if let Some(project_ref) = &self.project_ref {
            config.project_ref = project_ref.clone();
        }
        if let Some(host) = &self.pooler_host {
            config.pooler_host = host.clone();
        }
        if let Some(port) = &self.pooler_port {
            config.pooler_port = parse_port(port)?;
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        Ok(config)
    }
}
