//! The shared logging backend.
//!
//! A `Pipeline` owns everything common to all handles:
//! 1. Minimum severity filter
//! 2. Hook set (annotation, newline trim)
//! 3. Formatter (text or JSON)
//! 4. Output stream
//!
//! Emission is synchronous and infallible from the caller's perspective.
//! Each entry is rendered to one complete line and written under the
//! writer lock with a single call, so concurrent emitters never interleave
//! within a line.

pub mod entry;
pub mod format;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::config::LogConfig;
use crate::hooks::{AnnotateHook, Hook, NewlineHook};
use crate::severity::Severity;

use self::entry::Entry;
use self::format::Format;

/// Configuration snapshot, replaced wholesale by `apply`.
struct Snapshot {
    level: Severity,
    format: Format,
    hooks: Vec<Box<dyn Hook>>,
}

impl Snapshot {
    fn from_config(config: &LogConfig) -> Self {
        let format = if config.json_format {
            Format::Json {
                disable_timestamp: config.disable_timestamp,
            }
        } else {
            Format::Text {
                disable_timestamp: config.disable_timestamp,
            }
        };

        // Always exactly these two, in this order. Re-applying replaces
        // them rather than appending, so repeated configuration never
        // annotates twice.
        let hooks: Vec<Box<dyn Hook>> = vec![
            Box::new(AnnotateHook::new(
                config.caller_levels.clone(),
                config.stack_levels.clone(),
            )),
            Box::new(NewlineHook),
        ];

        Self {
            level: config.level,
            format,
            hooks,
        }
    }
}

/// Shared logging backend: level filter, formatter, hooks, output stream.
///
/// The snapshot is written during configuration application (expected
/// once, at startup) and read-only thereafter. Writes to the output are
/// serialized internally; callers need no locking of their own.
pub struct Pipeline {
    snapshot: RwLock<Snapshot>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Pipeline {
    /// A pipeline with default configuration, writing to standard out.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Snapshot::from_config(&LogConfig::default())),
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Install a fresh snapshot from `config` and bind the output to
    /// standard out.
    ///
    /// Idempotent: applying the same config twice leaves the same level,
    /// formatter, and hook set.
    pub fn apply(&self, config: &LogConfig) {
        *self.snapshot.write() = Snapshot::from_config(config);
        *self.writer.lock() = Box::new(io::stdout());
    }

    /// Swap the output destination. Mainly for isolated instances in
    /// tests and benches; `apply` always rebinds standard out.
    pub fn set_writer(&self, writer: Box<dyn Write + Send>) {
        *self.writer.lock() = writer;
    }

    pub(crate) fn emit(
        &self,
        severity: Severity,
        message: &str,
        fields: &BTreeMap<String, Value>,
        caller: &'static Location<'static>,
    ) {
        let line = {
            let snapshot = self.snapshot.read();
            if severity < snapshot.level {
                return;
            }

            let mut entry = Entry::new(severity, message);
            entry.fields = fields.clone();
            entry.caller = Some(caller);

            for hook in &snapshot.hooks {
                if hook.levels().contains(&severity) {
                    hook.fire(&mut entry);
                }
            }

            let mut line = snapshot.format.render(&entry);
            line.push('\n');
            line
        };

        // One write call per entry keeps lines whole under concurrency.
        // Write failures are not surfaced to logging call sites.
        let mut writer = self.writer.lock();
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    #[cfg(test)]
    pub(crate) fn hook_count(&self) -> usize {
        self.snapshot.read().hooks.len()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref DEFAULT_PIPELINE: Arc<Pipeline> = Arc::new(Pipeline::new());
}

/// The process-wide pipeline shared by every handle that does not carry
/// its own.
pub fn default_pipeline() -> Arc<Pipeline> {
    DEFAULT_PIPELINE.clone()
}
