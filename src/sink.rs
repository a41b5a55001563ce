//! Sink destinations and the ordered routing plan.
//!
//! [`sinks_for`] is the policy core: it maps a [`RouterConfig`] to the exact
//! ordered set of sinks the subscriber will be built from. Everything here is
//! pure; no filesystem or subscriber state is touched.

use crate::config::RouterConfig;
use crate::filter::SinkFilter;
use crate::severity::Severity;

/// Combined log file, used when per-level files are off.
pub const COMBINED_LOG: &str = "app_.log";
/// Debug-only log file.
pub const DEBUG_LOG: &str = "dbg_.log";
/// Error-only log file.
pub const ERROR_LOG: &str = "err_.log";
/// Warning-only log file.
pub const WARNING_LOG: &str = "wrn_.log";
/// Fatal-only log file.
pub const FATAL_LOG: &str = "ftl_.log";
/// Information-only log file.
pub const INFORMATION_LOG: &str = "inf_.log";
/// Verbose-only log file.
pub const VERBOSE_LOG: &str = "vrb_.log";

/// Where a sink delivers admitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Console,
    /// A rolling file under the resolved log directory, named by its fixed
    /// literal; the rotation machinery appends period stamps.
    File(&'static str),
}

/// One configured sink: a destination plus its admittance filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSpec {
    /// Where admitted events go.
    pub destination: Destination,
    /// Which events are admitted.
    pub filter: SinkFilter,
}

/// The per-level file a severity routes to.
pub const fn level_file(severity: Severity) -> &'static str {
    match severity {
        Severity::Verbose => VERBOSE_LOG,
        Severity::Debug => DEBUG_LOG,
        Severity::Information => INFORMATION_LOG,
        Severity::Warning => WARNING_LOG,
        Severity::Error => ERROR_LOG,
        Severity::Fatal => FATAL_LOG,
    }
}

/// Build the ordered sink set for a configuration.
///
/// The console sink always comes first. A dedicated debug file, when
/// requested, is attached independently of `write_to_file`. Per-level files
/// cover verbose, information, warning, error, and fatal; debug is absent
/// from that set, so when no dedicated debug file was requested a debug sieve
/// is inserted in its place to keep the level from vanishing from disk.
pub fn sinks_for(config: &RouterConfig) -> Vec<SinkSpec> {
    let mut sinks = vec![SinkSpec {
        destination: Destination::Console,
        filter: SinkFilter::Threshold(config.console_min_level),
    }];

    if config.separate_debug_file {
        sinks.push(debug_sink());
    }

    if config.write_to_file {
        if config.separate_files {
            sinks.push(level_sink(Severity::Verbose, config.file_min_level));
            sinks.push(level_sink(Severity::Information, config.file_min_level));
            if !config.separate_debug_file {
                // Floor stays at Debug here, not the configured file minimum.
                sinks.push(debug_sink());
            }
            sinks.push(level_sink(Severity::Warning, config.file_min_level));
            sinks.push(level_sink(Severity::Error, config.file_min_level));
            sinks.push(level_sink(Severity::Fatal, config.file_min_level));
        } else {
            sinks.push(SinkSpec {
                destination: Destination::File(COMBINED_LOG),
                filter: SinkFilter::Threshold(config.file_min_level),
            });
        }
    }

    sinks
}

const fn debug_sink() -> SinkSpec {
    SinkSpec {
        destination: Destination::File(DEBUG_LOG),
        filter: SinkFilter::Exact {
            level: Severity::Debug,
            threshold: Severity::Debug,
        },
    }
}

const fn level_sink(level: Severity, threshold: Severity) -> SinkSpec {
    SinkSpec {
        destination: Destination::File(level_file(level)),
        filter: SinkFilter::Exact { level, threshold },
    }
}
