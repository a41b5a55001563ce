//! Router assembly: turn a [`RouterConfig`] into a `tracing` subscriber with
//! one layer per sink, and hand back ownership of the result.
//!
//! A built router is self-contained. [`RouterHandle`] owns the dispatcher and
//! the appender worker guards, so several routers can coexist in one process;
//! installing one as the process-global default is a separate, explicit step.

use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};

use tracing::{dispatcher, Dispatch, Metadata};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{filter_fn, FilterFn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::RouterConfig;
use crate::enrich::Enrichment;
use crate::error::{RouterError, RouterResult};
use crate::filter::SinkFilter;
use crate::rolling::RollingWriter;
use crate::selflog;
use crate::severity::Severity;
use crate::sink::{sinks_for, Destination, SinkSpec};

/// Directory used when the configured one is empty or does not exist.
const FALLBACK_LOG_DIR: &str = "logs";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Builds routing subscribers from a configuration.
#[derive(Debug, Clone)]
pub struct Router {
    config: RouterConfig,
    enrichments: Vec<Enrichment>,
}

impl Router {
    /// Create a router for the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            enrichments: Enrichment::DEFAULT.to_vec(),
        }
    }

    /// Replace the enrichments applied to file sinks.
    pub fn enrichments(mut self, enrichments: &[Enrichment]) -> Self {
        self.enrichments = enrichments.to_vec();
        self
    }

    /// The ordered sink set this router will build.
    pub fn plan(&self) -> Vec<SinkSpec> {
        sinks_for(&self.config)
    }

    /// The directory file sinks will write under.
    pub fn log_directory(&self) -> PathBuf {
        resolve_log_directory(&self.config.log_directory)
    }

    /// Build the subscriber for this router's sink set.
    ///
    /// Process-global state is untouched; the returned handle owns the
    /// dispatcher and the appender guards that flush file sinks on drop.
    ///
    /// # Errors
    /// Fails when file sinks are configured and the log directory cannot
    /// be created.
    pub fn build(&self) -> RouterResult<RouterHandle> {
        let sinks = self.plan();
        let log_directory = self.log_directory();

        if sinks
            .iter()
            .any(|sink| matches!(sink.destination, Destination::File(_)))
        {
            fs::create_dir_all(&log_directory).map_err(|source| RouterError::LogDir {
                path: log_directory.clone(),
                source,
            })?;
        }

        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(sinks.len());
        let mut guards = Vec::new();

        for sink in &sinks {
            match sink.destination {
                Destination::Console => layers.push(console_layer(sink.filter)),
                Destination::File(name) => {
                    let writer = RollingWriter::new(&log_directory, name, self.config.rotation);
                    let (layer, guard) = file_layer(writer, &self.enrichments, sink.filter);
                    layers.push(layer);
                    guards.push(guard);
                }
            }
        }

        let dispatch = Dispatch::new(tracing_subscriber::registry().with(layers));
        Ok(RouterHandle {
            dispatch,
            log_directory,
            _guards: guards,
        })
    }

    /// Build a router, install it as the process-global default, and turn on
    /// the stderr diagnostics channel.
    ///
    /// The usual entry point for applications. Keep the returned handle alive
    /// for the life of the program; dropping it detaches the appender workers
    /// and file sinks stop flushing.
    ///
    /// # Errors
    /// Fails when the log directory cannot be created or another global
    /// default subscriber is already installed.
    pub fn init(config: RouterConfig) -> RouterResult<RouterHandle> {
        selflog::set_enabled(true);
        let router = Self::new(config);
        let handle = router.build()?;
        handle.install()?;
        if router.config.write_to_file {
            tracing::debug!(path = %handle.log_directory().display(), "storing log files");
        }
        Ok(handle)
    }
}

/// A built routing subscriber.
///
/// Owns the dispatcher and the worker guards behind the file sinks. Records
/// are flushed to disk when the handle is dropped.
pub struct RouterHandle {
    dispatch: Dispatch,
    log_directory: PathBuf,
    _guards: Vec<WorkerGuard>,
}

impl RouterHandle {
    /// The dispatcher for this router's subscriber.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// The directory file sinks write under.
    pub fn log_directory(&self) -> &Path {
        &self.log_directory
    }

    /// Run `f` with this router as the default subscriber for the current
    /// thread.
    ///
    /// Lets independently built routers route side by side without touching
    /// the global default.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Install this router as the process-global default subscriber.
    ///
    /// # Errors
    /// Fails when a global default is already installed. The handle itself
    /// stays usable through [`scope`](Self::scope).
    pub fn install(&self) -> RouterResult<()> {
        dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn guard_count(&self) -> usize {
        self._guards.len()
    }
}

fn resolve_log_directory(configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_dir() {
        path::absolute(configured).unwrap_or_else(|_| configured.to_path_buf())
    } else {
        PathBuf::from(FALLBACK_LOG_DIR)
    }
}

fn console_layer(filter: SinkFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stdout)
        .with_target(true)
        .with_filter(severity_filter(filter))
        .boxed()
}

fn file_layer(
    writer: RollingWriter,
    enrichments: &[Enrichment],
    filter: SinkFilter,
) -> (BoxedLayer, WorkerGuard) {
    let (writer, guard) = tracing_appender::non_blocking(writer);
    let thread_info = enrichments.contains(&Enrichment::ThreadInfo);
    let source_location = enrichments.contains(&Enrichment::SourceLocation);

    // File sinks always write JSON for structured log processing
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_thread_ids(thread_info)
        .with_thread_names(thread_info)
        .with_file(source_location)
        .with_line_number(source_location)
        .with_filter(severity_filter(filter))
        .boxed();
    (layer, guard)
}

/// Per-sink severity filter over event metadata.
///
/// The max-level hint lets the subscriber skip callsites no sink will ever
/// admit.
fn severity_filter(filter: SinkFilter) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    filter_fn(move |metadata| filter.admits(Severity::from_event(metadata)))
        .with_max_level_hint(filter.most_verbose().tracing_level())
}
