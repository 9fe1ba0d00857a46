//! Call-site and stack annotation.
//!
//! Which severities carry a caller location and which carry a full stack
//! are independent sets, both taken from the applied configuration.

use std::backtrace::Backtrace;

use serde_json::Value;

use super::Hook;
use crate::pipeline::entry::Entry;
use crate::severity::Severity;

/// Attaches `file`/`line` fields for severities in the caller set and a
/// `stack` field for severities in the stack set.
pub struct AnnotateHook {
    caller_levels: Vec<Severity>,
    stack_levels: Vec<Severity>,
    // Union of the two sets; the pipeline consults this to decide firing.
    fire_levels: Vec<Severity>,
}

impl AnnotateHook {
    pub fn new(caller_levels: Vec<Severity>, stack_levels: Vec<Severity>) -> Self {
        let mut fire_levels = caller_levels.clone();
        for level in &stack_levels {
            if !fire_levels.contains(level) {
                fire_levels.push(*level);
            }
        }
        Self {
            caller_levels,
            stack_levels,
            fire_levels,
        }
    }
}

impl Hook for AnnotateHook {
    fn levels(&self) -> &[Severity] {
        &self.fire_levels
    }

    fn fire(&self, entry: &mut Entry) {
        if self.caller_levels.contains(&entry.severity) {
            if let Some(caller) = entry.caller {
                entry
                    .fields
                    .insert("file".to_string(), Value::from(caller.file()));
                entry
                    .fields
                    .insert("line".to_string(), Value::from(caller.line()));
            }
        }

        if self.stack_levels.contains(&entry.severity) {
            let stack = Backtrace::force_capture();
            entry
                .fields
                .insert("stack".to_string(), Value::from(stack.to_string()));
        }
    }
}
