//! Routing demo binary.
//!
//! Builds a router from configuration plus command line flags, installs it,
//! and emits one record at every severity so the routing outcome can be
//! inspected on the console and in the log directory.
//!
//! # Usage
//!
//! ```bash
//! logsieve --write-to-file --separate-files --separate-debug-file \
//!     --file-min-level verbose --console-min-level verbose
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use logsieve::{error_chain, fatal, Router, RouterConfig, Severity};

#[derive(Parser, Debug)]
#[command(name = "logsieve")]
#[command(about = "Severity-routed logging demo", version)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(long, env = "LOGSIEVE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for log files; falls back to logs/ when it does not exist
    #[arg(long, value_name = "DIR")]
    log_directory: Option<String>,

    /// Attach file sinks
    #[arg(long)]
    write_to_file: bool,

    /// One file per severity level instead of a combined file
    #[arg(long)]
    separate_files: bool,

    /// Dedicated debug-only file
    #[arg(long)]
    separate_debug_file: bool,

    /// Minimum severity admitted by file sinks
    #[arg(long, value_name = "SEVERITY")]
    file_min_level: Option<Severity>,

    /// Minimum severity admitted by the console sink
    #[arg(long, value_name = "SEVERITY")]
    console_min_level: Option<Severity>,
}

/// Layer command line flags over the loaded configuration.
///
/// Boolean flags can only switch features on; use the configuration file or
/// environment to switch them off.
fn apply_args(mut config: RouterConfig, args: &Args) -> RouterConfig {
    if let Some(directory) = &args.log_directory {
        config.log_directory.clone_from(directory);
    }
    config.write_to_file |= args.write_to_file;
    config.separate_files |= args.separate_files;
    config.separate_debug_file |= args.separate_debug_file;
    if let Some(level) = args.file_min_level {
        config.file_min_level = level;
    }
    if let Some(level) = args.console_min_level {
        config.console_min_level = level;
    }
    config
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = apply_args(RouterConfig::load(args.config.as_deref())?, &args);

    // Dropped at the end of main, which flushes the file sinks.
    let _logging = Router::init(config)?;

    println!("Hello World!");
    tracing::info!("hello from the routing demo");
    tracing::warn!("goodbye from the routing demo");
    exercise_levels();
    Ok(())
}

/// One record at every severity, then a caught failure with its error chain.
fn exercise_levels() {
    tracing::debug!("---- debug level ----");
    tracing::warn!("warning level");
    fatal!("fatal level");
    tracing::error!("error level");
    tracing::info!("information level");
    tracing::trace!("verbose level");

    match checked_div(23, 0) {
        Ok(quotient) => tracing::info!(quotient, "division succeeded"),
        Err(error) => tracing::error!(error = %error_chain(&error), "caught division failure"),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("cannot divide {dividend} by zero")]
struct DivisionByZero {
    dividend: i32,
}

fn checked_div(dividend: i32, divisor: i32) -> Result<i32, DivisionByZero> {
    dividend
        .checked_div(divisor)
        .ok_or(DivisionByZero { dividend })
}
