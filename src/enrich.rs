//! Record enrichment: contextual fields file sinks attach to every record,
//! and error-chain capture for call sites that log caught failures.

use std::error::Error;

/// Contextual metadata attached to every record a file sink writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// Thread id and thread name of the emitting thread.
    ThreadInfo,
    /// Source file and line number of the call site.
    SourceLocation,
}

impl Enrichment {
    /// Enrichments applied when the caller specifies none.
    pub const DEFAULT: [Self; 2] = [Self::ThreadInfo, Self::SourceLocation];
}

/// Render an error and its full source chain, outermost first.
///
/// Filters and formatters never see field values, so error context has to be
/// captured where the error is caught; this renders the whole chain into one
/// loggable string.
///
/// ```
/// use std::io::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::NotFound, "missing log directory");
/// assert_eq!(logsieve::error_chain(&err), "missing log directory");
/// ```
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
