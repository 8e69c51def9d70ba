//! Errors raised while loading builder inputs
//!
//! Builder operations themselves are total. Only reading session data and
//! configuration from outside can fail.

use crate::config::ConfigError;
use pbq_query::logging::{codes, Code};
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Failed to read session file {}: {source}", .path.display())]
    SessionRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed session data: {0}")]
    SessionParse(#[from] serde_json::Error),

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl BuilderError {
    pub fn error_code(&self) -> Code {
        match self {
            BuilderError::SessionRead { .. } => codes::input::SESSION_READ_FAILED,
            BuilderError::SessionParse(_) => codes::input::SESSION_PARSE_FAILED,
            BuilderError::ConfigRead { .. } => codes::input::CONFIG_READ_FAILED,
            BuilderError::Config(_) => codes::input::CONFIG_PARSE_FAILED,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Message with the registry's recommended action appended
    pub fn user_message(&self) -> String {
        format!(
            "[{}] {}. {}",
            self.error_code().as_str(),
            self,
            codes::get_action(self.error_code().as_str())
        )
    }
}
