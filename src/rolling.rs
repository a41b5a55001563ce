//! Size and time based rolling for file sinks.
//!
//! `tracing-appender` only rolls on time, so file sinks write through
//! [`RollingWriter`] instead: an [`io::Write`] that starts a new file when
//! the rotation period turns over or the size limit is reached, and deletes
//! the oldest files beyond the retention count after every roll.
//!
//! File naming follows the rolling-appender convention: the literal sink
//! name, a period stamp when the interval calls for one, and a numeric
//! suffix for size rolls within one period (`app_.log.2026-08-23`,
//! `app_.log.2026-08-23.1`, ...).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::config::{RollInterval, RotationPolicy};
use crate::selflog;

/// Rolling file writer shared with the appender worker thread.
///
/// Writes go through an internal mutex, so clones of one writer append to
/// the same file sequence. The log directory is created on the first write,
/// not at construction.
#[derive(Debug, Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    /// Create a writer for one file sink.
    ///
    /// `prefix` is the literal sink file name; rolled files extend it with
    /// period and sequence suffixes.
    pub fn new(directory: impl Into<PathBuf>, prefix: &'static str, policy: RotationPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                directory: directory.into(),
                prefix,
                policy,
                file: None,
                stamp: None,
                sequence: 0,
                written: 0,
                capped: false,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // A panic mid-write leaves at worst a truncated record; the
            // bookkeeping itself stays usable.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl io::Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

#[derive(Debug)]
struct Inner {
    directory: PathBuf,
    prefix: &'static str,
    policy: RotationPolicy,
    file: Option<File>,
    /// Period stamp of the current file, `None` for `RollInterval::Never`.
    stamp: Option<String>,
    /// Size-roll sequence within the current period, 0 for the base file.
    sequence: u32,
    /// Bytes written to the current file, including what it held on open.
    written: u64,
    /// Whether the size cap for the current file has already been reported.
    capped: bool,
}

impl Inner {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.roll_if_due(Utc::now())?;

        if !self.policy.roll_on_size
            && self.policy.max_bytes > 0
            && self.written >= self.policy.max_bytes
        {
            // Hard cap: records past the limit are dropped until the next
            // period roll.
            if !self.capped {
                self.capped = true;
                selflog::report(
                    self.prefix,
                    &format_args!(
                        "size cap of {} bytes reached, dropping records",
                        self.policy.max_bytes
                    ),
                );
            }
            return Ok(buf.len());
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))?;
        let len = file.write(buf)?;
        self.written += len as u64;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Make sure the current file matches the period and size limits,
    /// opening a new one when it does not.
    fn roll_if_due(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        let stamp = period_stamp(self.policy.interval, now);

        if self.file.is_some() && stamp == self.stamp {
            if self.over_size_limit() {
                self.sequence += 1;
                self.open_current()?;
            }
            return Ok(());
        }

        // First write, a period turnover, or a recovery after a failed open.
        self.stamp = stamp;
        self.sequence = 0;
        self.open_current()?;
        // A restarted process may land on files already at the limit; skip
        // forward until one has room.
        while self.over_size_limit() {
            self.sequence += 1;
            self.open_current()?;
        }
        Ok(())
    }

    fn over_size_limit(&self) -> bool {
        self.policy.roll_on_size
            && self.policy.max_bytes > 0
            && self.written >= self.policy.max_bytes
    }

    /// Open the file named by the current stamp and sequence, then prune.
    ///
    /// On failure the writer is left closed so a later write retries the
    /// whole open, picking the directory back up once it is writable.
    fn open_current(&mut self) -> io::Result<()> {
        let path = self.directory.join(self.current_name());
        let opened = fs::create_dir_all(&self.directory)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));

        let file = match opened {
            Ok(file) => file,
            Err(error) => {
                self.file = None;
                selflog::report(self.prefix, &error);
                return Err(error);
            }
        };

        self.written = file.metadata().map_or(0, |meta| meta.len());
        self.capped = false;
        self.file = Some(file);
        self.prune();
        Ok(())
    }

    fn current_name(&self) -> String {
        let mut name = self.prefix.to_string();
        if let Some(stamp) = &self.stamp {
            name.push('.');
            name.push_str(stamp);
        }
        if self.sequence > 0 {
            name.push('.');
            name.push_str(&self.sequence.to_string());
        }
        name
    }

    /// Delete the oldest files of this sink beyond the retention count.
    ///
    /// Pruning never fails a write; problems go to the diagnostics channel.
    fn prune(&self) {
        let retained = self.policy.retained_files.max(1);

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(error) => {
                selflog::report(self.prefix, &error);
                return;
            }
        };

        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !self.owns(name) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, entry.path()));
        }

        if files.len() <= retained {
            return;
        }

        files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        let excess = files.len() - retained;
        for (_, path) in files.into_iter().take(excess) {
            if let Err(error) = fs::remove_file(&path) {
                selflog::report(self.prefix, &error);
            }
        }
    }

    /// Whether a directory entry belongs to this sink's file sequence.
    fn owns(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

fn period_stamp(interval: RollInterval, now: DateTime<Utc>) -> Option<String> {
    match interval {
        RollInterval::Daily => Some(now.format("%Y-%m-%d").to_string()),
        RollInterval::Hourly => Some(now.format("%Y-%m-%d-%H").to_string()),
        RollInterval::Never => None,
    }
}
