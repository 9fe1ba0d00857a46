//! Entry formatters.
//!
//! Two encodings, selected at configuration time:
//! - text: `level=info msg="..." key=value`, keys sorted, optional
//!   leading `time="<RFC3339>"`
//! - JSON: one self-describing object per line
//!
//! Both render to a single physical line; anything that could embed a raw
//! line break (message, string values) is quoted and escaped.

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use super::entry::Entry;

/// Keys owned by the record shape itself. A caller field with one of these
/// names is emitted under a `fields.` prefix instead of clobbering it.
const RESERVED_KEYS: [&str; 3] = ["level", "msg", "time"];

/// Output encoding for formatted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text { disable_timestamp: bool },
    Json { disable_timestamp: bool },
}

impl Format {
    /// Render `entry` to one line, without the trailing newline.
    pub fn render(&self, entry: &Entry) -> String {
        match self {
            Format::Text { disable_timestamp } => render_text(entry, *disable_timestamp),
            Format::Json { disable_timestamp } => render_json(entry, *disable_timestamp),
        }
    }
}

fn timestamp(entry: &Entry) -> String {
    entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn field_key(key: &str) -> String {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{}", key)
    } else {
        key.to_string()
    }
}

fn render_text(entry: &Entry, disable_timestamp: bool) -> String {
    let mut line = String::new();

    if !disable_timestamp {
        line.push_str(&format!("time={:?} ", timestamp(entry)));
    }
    line.push_str(&format!("level={}", entry.severity));
    line.push_str(&format!(" msg={}", quote(&entry.message)));

    for (key, value) in &entry.fields {
        line.push_str(&format!(" {}={}", field_key(key), text_value(value)));
    }

    line
}

fn render_json(entry: &Entry, disable_timestamp: bool) -> String {
    let mut record = Map::new();

    if !disable_timestamp {
        record.insert("time".to_string(), Value::String(timestamp(entry)));
    }
    record.insert(
        "level".to_string(),
        Value::String(entry.severity.as_str().to_string()),
    );
    record.insert("msg".to_string(), Value::String(entry.message.clone()));

    for (key, value) in &entry.fields {
        record.insert(field_key(key), value.clone());
    }

    Value::Object(record).to_string()
}

/// Bare tokens stay unquoted; anything else is quoted with escapes so the
/// rendered entry stays on one line.
fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_bare) {
        s.to_string()
    } else {
        format!("{:?}", s)
    }
}

fn is_bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        // Compact JSON for numbers, bools, null, and compound values.
        other => other.to_string(),
    }
}
