//! The six-level severity model used by routing decisions.
//!
//! `tracing` knows five levels; this model carries a sixth, [`Severity::Fatal`],
//! emitted at `Level::ERROR` under the reserved [`FATAL_TARGET`] so per-sink
//! filters can tell the two apart from event metadata alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{Level, Metadata};

use crate::error::RouterError;

/// Event target reserved for fatal records emitted through [`fatal!`](crate::fatal).
pub const FATAL_TARGET: &str = "logsieve::fatal";

/// Ordinal log severity, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Detailed tracing output, the `tracing` TRACE level.
    #[serde(alias = "trace")]
    Verbose,
    /// Development diagnostics.
    Debug,
    /// Routine operational records.
    #[serde(alias = "info")]
    Information,
    /// Something looks wrong but the application continues.
    #[serde(alias = "warn")]
    Warning,
    /// An operation failed.
    Error,
    /// The application cannot continue meaningfully. Descriptive only;
    /// logging at this severity does not terminate anything.
    Fatal,
}

impl Severity {
    /// All severities, least to most severe.
    pub const ALL: [Self; 6] = [
        Self::Verbose,
        Self::Debug,
        Self::Information,
        Self::Warning,
        Self::Error,
        Self::Fatal,
    ];

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Information => "information",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// The `tracing` level this severity is emitted at.
    ///
    /// Fatal folds onto ERROR; [`FATAL_TARGET`] carries the distinction.
    pub const fn tracing_level(self) -> Level {
        match self {
            Self::Verbose => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Information => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Fatal => Level::ERROR,
        }
    }

    /// Recover the severity of an event from its metadata.
    pub fn from_event(metadata: &Metadata<'_>) -> Self {
        Self::from_parts(metadata.level(), metadata.target())
    }

    pub(crate) fn from_parts(level: &Level, target: &str) -> Self {
        if target == FATAL_TARGET {
            return Self::Fatal;
        }
        if *level == Level::TRACE {
            Self::Verbose
        } else if *level == Level::DEBUG {
            Self::Debug
        } else if *level == Level::INFO {
            Self::Information
        } else if *level == Level::WARN {
            Self::Warning
        } else {
            Self::Error
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" | "trace" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(RouterError::InvalidSeverity(s.to_string())),
        }
    }
}

/// Emit a fatal-severity record.
///
/// Expands to a `tracing` event at ERROR level under [`FATAL_TARGET`], which
/// is how sinks distinguish fatal records from plain errors. Accepts the same
/// message and field syntax as the `tracing` macros.
///
/// ```
/// logsieve::fatal!("unrecoverable state, shutting down");
/// ```
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        ::tracing::event!(
            target: $crate::severity::FATAL_TARGET,
            ::tracing::Level::ERROR,
            $($arg)+
        )
    };
}
