use std::env;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ProvisionError;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const PASSWORD_VAR: &str = "SUPABASE_DB_PASSWORD";
pub const PROJECT_REF_VAR: &str = "SUPABASE_PROJECT_REF";
pub const POOLER_HOST_VAR: &str = "SUPABASE_POOLER_HOST";
pub const POOLER_PORT_VAR: &str = "SUPABASE_POOLER_PORT";
pub const DB_NAME_VAR: &str = "SUPABASE_DB_NAME";
pub const CONNECT_TIMEOUT_VAR: &str = "LEAGUE_DB_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_PROJECT_REF: &str = "zliedzrqzvywlsyfggcq";
pub const DEFAULT_POOLER_HOST: &str = "aws-0-eu-central-1.pooler.supabase.com";
pub const DEFAULT_POOLER_PORT: u16 = 6543;
pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Userinfo-safe: keep unreserved characters, escape the rest.
const PASSWORD_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Where the connection string comes from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Full connection string; wins over everything below when set.
    pub database_url: Option<String>,
    pub password: Option<String>,
    pub project_ref: String,
    pub pooler_host: String,
    pub pooler_port: u16,
    pub database: String,
    pub connect_timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            password: None,
            project_ref: DEFAULT_PROJECT_REF.to_string(),
            pooler_host: DEFAULT_POOLER_HOST.to_string(),
            pooler_port: DEFAULT_POOLER_PORT,
            database: DEFAULT_DB_NAME.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ProvisionConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ProvisionError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let pooler_port = match var(POOLER_PORT_VAR) {
            Some(raw) => parse_port(&raw)?,
            None => defaults.pooler_port,
        };
        let connect_timeout = match var(CONNECT_TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    ProvisionError::invalid(format!(
                        "{CONNECT_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
                    ))
                })?,
            None => defaults.connect_timeout,
        };

        Ok(Self {
            database_url: var(DATABASE_URL_VAR),
            password: var(PASSWORD_VAR),
            project_ref: var(PROJECT_REF_VAR).unwrap_or(defaults.project_ref),
            pooler_host: var(POOLER_HOST_VAR).unwrap_or(defaults.pooler_host),
            pooler_port,
            database: var(DB_NAME_VAR).unwrap_or(defaults.database),
            connect_timeout,
        })
    }

    /// True when a connection string can be produced without I/O.
    pub fn has_credentials(&self) -> bool {
        self.database_url.is_some() || self.password.is_some()
    }

    /// Resolve the connection string: `database_url` verbatim if present,
    /// otherwise assembled for the pooler from the password.
    pub fn connection_string(&self) -> Result<String, ProvisionError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }
        match &self.password {
            Some(password) => Ok(self.pooler_url(password)),
            None => Err(ProvisionError::ConfigurationMissing {
                password_var: PASSWORD_VAR,
                url_var: DATABASE_URL_VAR,
            }),
        }
    }

    fn pooler_url(&self, password: &str) -> String {
        let password = utf8_percent_encode(password, PASSWORD_ENCODE_SET);
        format!(
            "postgresql://postgres.{}:{}@{}:{}/{}",
            self.project_ref, password, self.pooler_host, self.pooler_port, self.database
        )
    }
}

pub fn parse_port(raw: &str) -> Result<u16, ProvisionError> {
    raw.trim().parse::<u16>().map_err(|_| {
        ProvisionError::invalid(format!(
            "{POOLER_PORT_VAR} must be a valid port number, got '{raw}'"
        ))
    })
}
