//! Integration tests for severity routing into real files.
//!
//! Every test builds its own router over its own temporary directory and
//! emits through a scoped dispatcher, so tests stay independent of the
//! process-global subscriber and of each other. Dropping the handle joins
//! the appender workers, which flushes the files before they are read.

use std::fs;
use std::path::{Path, PathBuf};

use logsieve::severity::FATAL_TARGET;
use logsieve::{
    fatal, RollInterval, RotationPolicy, Router, RouterConfig, RouterError, Severity,
};
use serde_json::Value;
use tempfile::TempDir;

/// Files a sink produced, identified by its fixed name prefix.
fn sink_files(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            name.to_str()?.starts_with(prefix).then(|| entry.path())
        })
        .collect();
    files.sort();
    files
}

/// Concatenated contents of a sink's files; empty when none exist.
fn sink_contents(dir: &Path, prefix: &str) -> String {
    sink_files(dir, prefix)
        .iter()
        .map(|path| fs::read_to_string(path).unwrap())
        .collect()
}

fn file_config(dir: &TempDir) -> RouterConfig {
    RouterConfig {
        log_directory: dir.path().to_string_lossy().into_owned(),
        write_to_file: true,
        ..RouterConfig::default()
    }
}

#[test]
fn test_combined_file_respects_file_min_level() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        file_min_level: Severity::Warning,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::info!("information record");
        tracing::warn!("warning record");
        tracing::error!("error record");
    });
    drop(handle);

    let combined = sink_contents(temp_dir.path(), "app_.log");
    assert!(!combined.contains("information record"));
    // Admitted records land in emission order.
    let warning_at = combined.find("warning record").unwrap();
    let error_at = combined.find("error record").unwrap();
    assert!(warning_at < error_at);
}

#[test]
fn test_per_level_files_partition_records() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        separate_files: true,
        separate_debug_file: true,
        file_min_level: Severity::Verbose,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::trace!("verbose record");
        tracing::debug!("debug record");
        tracing::info!("information record");
        tracing::warn!("warning record");
        tracing::error!("error record");
        fatal!("fatal record");
    });
    drop(handle);

    let expected = [
        ("vrb_.log", "verbose record"),
        ("dbg_.log", "debug record"),
        ("inf_.log", "information record"),
        ("wrn_.log", "warning record"),
        ("err_.log", "error record"),
        ("ftl_.log", "fatal record"),
    ];
    for (prefix, message) in expected {
        let contents = sink_contents(temp_dir.path(), prefix);
        assert!(
            contents.contains(message),
            "{prefix} should contain its own record"
        );
        for (_, other) in expected.iter().filter(|(_, m)| m != &message) {
            assert!(
                !contents.contains(other),
                "{prefix} should not contain {other:?}"
            );
        }
    }
}

#[test]
fn test_fatal_records_keep_reserved_target() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        separate_files: true,
        file_min_level: Severity::Verbose,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        fatal!("fatal record");
    });
    drop(handle);

    let line = sink_contents(temp_dir.path(), "ftl_.log");
    let record: Value = serde_json::from_str(line.lines().next().unwrap()).unwrap();
    // Fatal is carried as ERROR plus the reserved target.
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["target"], FATAL_TARGET);
}

#[test]
fn test_debug_fallback_keeps_debug_floor() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        separate_files: true,
        file_min_level: Severity::Error,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::debug!("debug record");
        tracing::warn!("warning record");
        tracing::error!("error record");
        fatal!("fatal record");
    });
    drop(handle);

    // Debug still lands on disk: its sieve keeps the Debug floor even though
    // every other per-level sink is gated at Error.
    assert!(sink_contents(temp_dir.path(), "dbg_.log").contains("debug record"));
    assert!(sink_contents(temp_dir.path(), "err_.log").contains("error record"));
    assert!(sink_contents(temp_dir.path(), "ftl_.log").contains("fatal record"));
    // The warning sieve admitted nothing, so its file was never created.
    assert!(sink_files(temp_dir.path(), "wrn_.log").is_empty());
}

#[test]
fn test_debug_file_attaches_without_write_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        log_directory: temp_dir.path().to_string_lossy().into_owned(),
        separate_debug_file: true,
        ..RouterConfig::default()
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::debug!("debug record");
        tracing::info!("information record");
    });
    drop(handle);

    let debug = sink_contents(temp_dir.path(), "dbg_.log");
    assert!(debug.contains("debug record"));
    assert!(!debug.contains("information record"));
    // No other file sink was attached.
    assert!(sink_files(temp_dir.path(), "app_.log").is_empty());
}

#[test]
fn test_debug_file_ignores_file_min_level() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        separate_debug_file: true,
        file_min_level: Severity::Fatal,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::debug!("debug record");
        tracing::error!("error record");
        fatal!("fatal record");
    });
    drop(handle);

    assert!(sink_contents(temp_dir.path(), "dbg_.log").contains("debug record"));
    let combined = sink_contents(temp_dir.path(), "app_.log");
    assert!(combined.contains("fatal record"));
    assert!(!combined.contains("error record"));
}

#[test]
fn test_file_records_are_json_with_enrichment() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        file_min_level: Severity::Verbose,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        tracing::warn!(attempt = 2, "warning record");
    });
    drop(handle);

    let contents = sink_contents(temp_dir.path(), "app_.log");
    let record: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(record["level"], "WARN");
    assert_eq!(record["fields"]["message"], "warning record");
    assert_eq!(record["fields"]["attempt"], 2);
    assert!(record["timestamp"].is_string());
    assert!(record["threadId"].is_string());
    assert!(record["filename"].is_string());
    assert!(record["line_number"].is_number());
}

#[test]
fn test_enrichments_can_be_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        file_min_level: Severity::Verbose,
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).enrichments(&[]).build().unwrap();
    handle.scope(|| {
        tracing::warn!("warning record");
    });
    drop(handle);

    let contents = sink_contents(temp_dir.path(), "app_.log");
    let record: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(record["fields"]["message"], "warning record");
    assert!(record.get("threadId").is_none());
    assert!(record.get("filename").is_none());
    assert!(record.get("line_number").is_none());
}

#[test]
fn test_two_routers_route_independently() {
    let temp_a = TempDir::new().unwrap();
    let temp_b = TempDir::new().unwrap();
    let handle_a = Router::new(file_config(&temp_a)).build().unwrap();
    let handle_b = Router::new(RouterConfig {
        file_min_level: Severity::Information,
        ..file_config(&temp_b)
    })
    .build()
    .unwrap();

    handle_a.scope(|| tracing::error!("first router record"));
    handle_b.scope(|| tracing::info!("second router record"));
    drop(handle_a);
    drop(handle_b);

    let first = sink_contents(temp_a.path(), "app_.log");
    let second = sink_contents(temp_b.path(), "app_.log");
    assert!(first.contains("first router record"));
    assert!(!first.contains("second router record"));
    assert!(second.contains("second router record"));
    assert!(!second.contains("first router record"));
}

#[test]
fn test_second_install_fails() {
    let first = Router::new(RouterConfig::default()).build().unwrap();
    let second = Router::new(RouterConfig::default()).build().unwrap();

    // The process-global default is one-shot, so no other test installs it;
    // everything else routes through scope().
    first.install().unwrap();
    let error = second.install().unwrap_err();
    assert!(matches!(error, RouterError::InstallFailed(_)));
}

#[test]
fn test_rotation_policy_flows_to_file_sinks() {
    let temp_dir = TempDir::new().unwrap();
    let config = RouterConfig {
        file_min_level: Severity::Verbose,
        rotation: RotationPolicy {
            interval: RollInterval::Never,
            max_bytes: 64,
            roll_on_size: true,
            retained_files: 10,
        },
        ..file_config(&temp_dir)
    };

    let handle = Router::new(config).build().unwrap();
    handle.scope(|| {
        // Each JSON record is well past 64 bytes, so the second one rolls.
        tracing::warn!("first oversized record");
        tracing::warn!("second oversized record");
    });
    drop(handle);

    let files = sink_files(temp_dir.path(), "app_.log");
    assert_eq!(files.len(), 2, "size roll should have split the records");
    assert!(sink_contents(temp_dir.path(), "app_.log").contains("second oversized record"));
}
