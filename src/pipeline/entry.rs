//! The log record passed through hooks and formatters.

use std::collections::BTreeMap;
use std::panic::Location;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::severity::Severity;

/// A single entry on its way through the pipeline.
///
/// Hooks mutate the entry in place before a formatter renders it; the
/// field map is sorted so output is deterministic.
#[derive(Debug, Clone)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: BTreeMap<String, Value>,
    /// Call site of the emitting method, when known.
    pub caller: Option<&'static Location<'static>>,
}

impl Entry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            fields: BTreeMap::new(),
            caller: None,
        }
    }
}
