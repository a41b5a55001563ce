//! Per-sink admittance filters.
//!
//! Two filter shapes exist in the routing policy: a threshold (a level and
//! everything more severe) and an exact-level sieve (one level only, with its
//! own floor). Both are evaluated through the single [`SinkFilter::admits`]
//! function so sinks never special-case one or the other.

use crate::severity::Severity;

/// Admittance rule evaluated by a sink for every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFilter {
    /// Admits events at this severity and above.
    Threshold(Severity),
    /// Admits only events at exactly `level`, and only while `level` clears
    /// `threshold`. A sieve whose level sits below its threshold admits
    /// nothing, which is how per-level files go quiet when the configured
    /// file minimum rises above them.
    Exact {
        /// The one severity this sieve passes.
        level: Severity,
        /// Floor the sieve is additionally gated by.
        threshold: Severity,
    },
}

impl SinkFilter {
    /// Whether an event at `severity` is delivered to the sink.
    pub fn admits(self, severity: Severity) -> bool {
        match self {
            Self::Threshold(threshold) => severity >= threshold,
            Self::Exact { level, threshold } => severity == level && severity >= threshold,
        }
    }

    /// The most verbose severity this filter can ever admit.
    ///
    /// Handed to the subscriber as a max-level hint so disabled levels are
    /// skipped before any sink is consulted.
    pub const fn most_verbose(self) -> Severity {
        match self {
            Self::Threshold(threshold) => threshold,
            Self::Exact { level, .. } => level,
        }
    }
}
