//! Problems reported while validating and normalizing a configuration.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A validation finding. Only `Error` aborts the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Issue {
    #[display("{_0}")]
    Warning(String),
    #[display("{_0}")]
    Error(String),
}

impl Issue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Warning(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Warning(m) | Self::Error(m) => m,
        }
    }
}
