//! Error types for the logsieve routing layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while assembling, loading, or installing a router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The resolved log directory could not be created.
    #[error("Failed to prepare log directory {}: {source}", path.display())]
    LogDir {
        /// Directory the router tried to create.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// A process-global default subscriber was already installed.
    #[error("Failed to install global logger: {0}")]
    InstallFailed(#[from] tracing::dispatcher::SetGlobalDefaultError),

    /// A severity name could not be parsed.
    #[error("Invalid severity: {0}. Must be one of: verbose, debug, information, warning, error, fatal")]
    InvalidSeverity(String),

    /// Rotation settings that cannot be honored.
    #[error("Invalid rotation policy: {0}")]
    InvalidRotation(String),

    /// Configuration could not be loaded or merged.
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),
}

impl From<figment::Error> for RouterError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Convenience alias for router results.
pub type RouterResult<T> = Result<T, RouterError>;
