//! Environment-driven pipeline configuration.
//!
//! Five variables are read under a caller-supplied prefix (conventionally
//! `LOG`). We base configuration on the environment rather than a file:
//! the environment is available before any configuration file has been
//! parsed, and it is the easy thing to override per container.
//!
//! Every input is validated independently. A malformed value substitutes
//! its default and parsing continues; a malformed entry inside a comma
//! list is skipped while the valid entries still apply. No input can leave
//! the pipeline unusable.

use std::env;

use serde::Serialize;
use thiserror::Error;

use crate::severity::Severity;

/// A validated snapshot of the environment-driven options.
///
/// Created once at startup and immutable after application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogConfig {
    /// Minimum severity emitted.
    pub level: Severity,
    /// Omit timestamps (useful when output is redirected to a logging
    /// system that already adds them).
    pub disable_timestamp: bool,
    /// JSON output instead of text (useful when output is redirected to a
    /// logging system with JSON support).
    pub json_format: bool,
    /// Severities that get caller file/line fields.
    pub caller_levels: Vec<Severity>,
    /// Severities that get a captured stack field.
    pub stack_levels: Vec<Severity>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            disable_timestamp: true,
            json_format: false,
            caller_levels: Severity::all().to_vec(),
            stack_levels: vec![Severity::Panic],
        }
    }
}

/// A rejected environment value.
///
/// Rejection is never fatal: the default (or the valid remainder of a
/// list) is applied and configuration continues. The full set for one
/// `from_env` call is returned to the caller, who decides whether to log,
/// print, or drop them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{variable}: rejected {value:?}: {reason}")]
pub struct ConfigWarning {
    pub variable: String,
    pub value: String,
    pub reason: String,
}

impl LogConfig {
    /// Read `<prefix>_LEVEL`, `<prefix>_DISABLE_TIMESTAMP`,
    /// `<prefix>_JSON_FORMAT`, `<prefix>_CALLER_LEVELS` and
    /// `<prefix>_STACK_LEVELS`, substituting defaults for anything absent
    /// or malformed.
    pub fn from_env(prefix: &str) -> (Self, Vec<ConfigWarning>) {
        let mut config = LogConfig::default();
        let mut warnings = Vec::new();

        if let Some(raw) = read_var(prefix, "LEVEL") {
            match raw.parse::<Severity>() {
                Ok(level) => config.level = level,
                Err(err) => warnings.push(ConfigWarning {
                    variable: var_name(prefix, "LEVEL"),
                    value: raw,
                    reason: err.to_string(),
                }),
            }
        }

        if let Some(raw) = read_var(prefix, "DISABLE_TIMESTAMP") {
            match parse_bool(&raw) {
                Some(flag) => config.disable_timestamp = flag,
                None => warnings.push(bool_warning(prefix, "DISABLE_TIMESTAMP", raw)),
            }
        }

        if let Some(raw) = read_var(prefix, "JSON_FORMAT") {
            match parse_bool(&raw) {
                Some(flag) => config.json_format = flag,
                None => warnings.push(bool_warning(prefix, "JSON_FORMAT", raw)),
            }
        }

        if let Some(raw) = read_var(prefix, "CALLER_LEVELS") {
            config.caller_levels =
                parse_level_list(&var_name(prefix, "CALLER_LEVELS"), &raw, &mut warnings);
        }

        if let Some(raw) = read_var(prefix, "STACK_LEVELS") {
            config.stack_levels =
                parse_level_list(&var_name(prefix, "STACK_LEVELS"), &raw, &mut warnings);
        }

        (config, warnings)
    }
}

fn var_name(prefix: &str, suffix: &str) -> String {
    format!("{}_{}", prefix, suffix)
}

fn read_var(prefix: &str, suffix: &str) -> Option<String> {
    env::var(var_name(prefix, suffix)).ok()
}

fn bool_warning(prefix: &str, suffix: &str, value: String) -> ConfigWarning {
    ConfigWarning {
        variable: var_name(prefix, suffix),
        value,
        reason: "not a boolean".to_string(),
    }
}

/// Accepts `1/0`, `t/f`, `true/false` in any case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated severity list, skipping malformed entries
/// individually. The valid subset is applied even when empty.
fn parse_level_list(
    variable: &str,
    raw: &str,
    warnings: &mut Vec<ConfigWarning>,
) -> Vec<Severity> {
    let mut levels = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        match token.parse::<Severity>() {
            Ok(level) => {
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
            Err(err) => warnings.push(ConfigWarning {
                variable: variable.to_string(),
                value: token.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    levels
}
