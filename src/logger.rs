//! The logger handle.
//!
//! A common pattern is to reuse fields between logging statements by
//! reusing the handle returned from `with_field`/`with_fields`:
//!
//! ```
//! use ctxlog::Logger;
//!
//! let logger = Logger::new()
//!     .with_field("component", "ingest")
//!     .with_field("node", "mesh-7");
//! logger.info("logged with component and node");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde_json::Value;

use crate::pipeline::{default_pipeline, Pipeline};
use crate::severity::Severity;

/// A handle that emits leveled, fielded entries through a shared pipeline.
///
/// Cloning is cheap. The field set is copy-on-extend: `with_field` returns
/// a new handle and never mutates this one, so concurrent holders of the
/// same handle never observe each other's additions.
#[derive(Clone)]
pub struct Logger {
    pipeline: Arc<Pipeline>,
    fields: Arc<BTreeMap<String, Value>>,
}

lazy_static! {
    static ref DEFAULT_LOGGER: Logger = Logger::new();
}

/// The process-wide fallback handle, used when a context carries none.
/// Lazily constructed once.
pub fn default_logger() -> Logger {
    DEFAULT_LOGGER.clone()
}

impl Logger {
    /// A handle on the process-wide default pipeline with no preset
    /// fields.
    pub fn new() -> Self {
        Self::with_pipeline(default_pipeline())
    }

    /// A handle on an explicit pipeline instance. Isolated pipelines keep
    /// tests away from the process-wide one.
    pub fn with_pipeline(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            fields: Arc::new(BTreeMap::new()),
        }
    }

    /// A new handle that also carries `key` → `value`.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = (*self.fields).clone();
        fields.insert(key.into(), value.into());
        Self {
            pipeline: self.pipeline.clone(),
            fields: Arc::new(fields),
        }
    }

    /// A new handle carrying every entry of `fields` in addition to the
    /// current set.
    pub fn with_fields<I, K, V>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields = (*self.fields).clone();
        for (key, value) in entries {
            fields.insert(key.into(), value.into());
        }
        Self {
            pipeline: self.pipeline.clone(),
            fields: Arc::new(fields),
        }
    }

    /// A new handle carrying the error's display under the `error` key.
    pub fn with_error(&self, err: &dyn std::error::Error) -> Self {
        self.with_field("error", err.to_string())
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    /// Emits at fatal severity. Does not exit the process.
    #[track_caller]
    pub fn fatal(&self, message: &str) {
        self.log(Severity::Fatal, message);
    }

    /// Emits at panic severity. Does not unwind.
    #[track_caller]
    pub fn panic(&self, message: &str) {
        self.log(Severity::Panic, message);
    }

    /// Emit at an explicit severity.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: &str) {
        self.pipeline
            .emit(severity, message, &self.fields, Location::caller());
    }

    pub(crate) fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    pub(crate) fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
