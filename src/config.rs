//! Router configuration: the six routing knobs, the rotation policy, and
//! hierarchical loading (defaults, optional YAML file, `LOGSIEVE_*`
//! environment variables).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};
use crate::severity::Severity;

/// How often file sinks start a new physical file regardless of size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RollInterval {
    /// Roll when the UTC date changes.
    #[default]
    Daily,
    /// Roll at the top of every UTC hour.
    Hourly,
    /// Never roll on time; size rolls may still apply.
    Never,
}

/// Rotation policy applied to every file sink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RotationPolicy {
    /// Time boundary for starting a new file.
    #[serde(default)]
    pub interval: RollInterval,

    /// Maximum bytes written to one file before a size roll.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Whether crossing `max_bytes` starts a new file.
    #[serde(default = "default_roll_on_size")]
    pub roll_on_size: bool,

    /// Files kept per sink, newest first; older ones are deleted after a roll.
    #[serde(default = "default_retained_files")]
    pub retained_files: usize,
}

const fn default_max_bytes() -> u64 {
    // 50 MiB
    52_428_800
}

const fn default_roll_on_size() -> bool {
    true
}

const fn default_retained_files() -> usize {
    10
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            interval: RollInterval::default(),
            max_bytes: default_max_bytes(),
            roll_on_size: default_roll_on_size(),
            retained_files: default_retained_files(),
        }
    }
}

/// Declarative routing configuration.
///
/// Every knob is optional with the documented default; [`RouterConfig::load`]
/// layers a YAML file and environment variables on top of these defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouterConfig {
    /// Directory for log files. When the path does not exist on disk the
    /// router falls back to a relative `logs/` directory.
    #[serde(default)]
    pub log_directory: String,

    /// Attach file sinks (combined or per-level).
    #[serde(default)]
    pub write_to_file: bool,

    /// One file per severity level instead of a single combined file.
    #[serde(default)]
    pub separate_files: bool,

    /// Dedicated debug-only file, attached even when `write_to_file` is off.
    #[serde(default)]
    pub separate_debug_file: bool,

    /// Floor for file sinks.
    #[serde(default = "default_file_min_level")]
    pub file_min_level: Severity,

    /// Floor for the console sink.
    #[serde(default = "default_console_min_level")]
    pub console_min_level: Severity,

    /// Rotation applied to every file sink.
    #[serde(default)]
    pub rotation: RotationPolicy,
}

const fn default_file_min_level() -> Severity {
    Severity::Error
}

const fn default_console_min_level() -> Severity {
    Severity::Information
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            log_directory: String::new(),
            write_to_file: false,
            separate_files: false,
            separate_debug_file: false,
            file_min_level: default_file_min_level(),
            console_min_level: default_console_min_level(),
            rotation: RotationPolicy::default(),
        }
    }
}

impl RouterConfig {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. The given YAML file, if any
    /// 3. Environment variables (`LOGSIEVE_*`, `__` for nesting)
    pub fn load(file: Option<&Path>) -> RouterResult<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed("LOGSIEVE_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rotation settings the rolling writer cannot honor.
    pub fn validate(&self) -> RouterResult<()> {
        if self.rotation.retained_files == 0 {
            return Err(RouterError::InvalidRotation(
                "retained_files must be at least 1".to_string(),
            ));
        }
        if self.rotation.roll_on_size && self.rotation.max_bytes == 0 {
            return Err(RouterError::InvalidRotation(
                "max_bytes must be positive when rolling on size".to_string(),
            ));
        }
        Ok(())
    }
}
