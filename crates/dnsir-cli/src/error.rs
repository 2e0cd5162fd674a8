//! Command errors.

use dnsir_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("exiting due to validation errors")]
    Validation,

    #[error("serializing IR: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;
