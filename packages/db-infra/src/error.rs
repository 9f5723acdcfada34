use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Neither a full connection string nor a password is configured.
    #[error("Configuration error: {password_var} or {url_var} environment variable required")]
    ConfigurationMissing {
        password_var: &'static str,
        url_var: &'static str,
    },
    #[error("Configuration error: {message}")]
    InvalidConfiguration { message: String },
    #[error("Connection error ({target}): {source}")]
    Connection {
        /// Connection string with the password masked.
        target: String,
        #[source]
        source: DbErr,
    },
    #[error("Execution error in {step}: {source}")]
    Execution {
        step: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("Verification failed: missing tables {}", missing.join(", "))]
    Verification { missing: Vec<String> },
}

impl ProvisionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn execution(step: &'static str, source: DbErr) -> Self {
        Self::Execution { step, source }
    }

    /// Actionable follow-up lines for the operator, if any.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::ConfigurationMissing {
                password_var,
                url_var,
            } => vec![
                format!(
                    "Set {password_var} (find it under Settings > Database in the Supabase dashboard)"
                ),
                format!("or set {url_var} to a full postgresql:// connection string"),
                "Either can live in a .env file next to where you run this".to_string(),
            ],
            Self::Connection { .. } => {
                vec!["Check your database password and connection settings".to_string()]
            }
            Self::InvalidConfiguration { .. }
            | Self::Execution { .. }
            | Self::Verification { .. } => Vec::new(),
        }
    }

    /// True for failures that happened before any network I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing { .. } | Self::InvalidConfiguration { .. }
        )
    }
}
