//! Self-diagnostics escape hatch.
//!
//! Failures inside the logging machinery (size rolls, retention pruning)
//! cannot be routed through the subscriber they serve without recursing into
//! it, so they are written to standard error instead. The channel starts
//! off; [`Router::init`](crate::router::Router::init) turns it on, and
//! [`set_enabled`] exposes the toggle for embedders that want it quiet.

use std::fmt::Display;
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn the stderr diagnostics channel on or off.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether machinery failures are currently forwarded to stderr.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Report a machinery failure.
///
/// Write errors on the diagnostics channel itself are discarded; there is
/// nowhere left to report them.
pub(crate) fn report(context: &str, error: &dyn Display) {
    if !is_enabled() {
        return;
    }
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "logsieve: {context}: {error}");
}
