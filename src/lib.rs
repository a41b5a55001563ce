//! Logsieve - severity-routed logging built on `tracing`.
//!
//! Logsieve turns a small declarative configuration into a set of log sinks:
//! a console sink, an optional combined file, optional one-file-per-severity
//! sieves, and an optional dedicated debug file. Each sink carries its own
//! severity filter, and file sinks roll by size and by period with bounded
//! retention.
//!
//! # Model
//!
//! - Six ordered severities, `verbose` through `fatal`. `fatal` rides on
//!   `tracing`'s ERROR level under a reserved target and is emitted with
//!   [`fatal!`].
//! - [`RouterConfig`]: the routing knobs plus a rotation policy, loadable
//!   from defaults, a YAML file, and `LOGSIEVE_*` environment variables.
//! - [`Router`]: builds the ordered sink plan into a subscriber.
//!   [`RouterHandle`] owns the dispatcher and the appender guards, and
//!   flushes file sinks when dropped.
//!
//! # Example
//!
//! ```no_run
//! use logsieve::{Router, RouterConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RouterConfig::load(None)?;
//!     let _logging = Router::init(config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod rolling;
pub mod router;
pub mod selflog;
pub mod severity;
pub mod sink;

// Re-export commonly used types for convenience
pub use config::{RollInterval, RotationPolicy, RouterConfig};
pub use enrich::{error_chain, Enrichment};
pub use error::{RouterError, RouterResult};
pub use filter::SinkFilter;
pub use router::{Router, RouterHandle};
pub use severity::Severity;
pub use sink::{Destination, SinkSpec};
