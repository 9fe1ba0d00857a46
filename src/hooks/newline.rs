//! Trailing newline trim.
//!
//! Callers reusing `format!`-style helpers often hand over messages that
//! already end in a line break; the formatter adds its own, so without this
//! hook such entries would double-space the output.

use super::Hook;
use crate::pipeline::entry::Entry;
use crate::severity::Severity;

/// Strips exactly one trailing line-break sequence from the message.
///
/// At most one trim per entry: a message ending in two breaks keeps one.
/// Embedded breaks are left alone. Fires at every severity.
pub struct NewlineHook;

impl Hook for NewlineHook {
    fn levels(&self) -> &[Severity] {
        Severity::all()
    }

    fn fire(&self, entry: &mut Entry) {
        let message = &mut entry.message;
        if message.ends_with("\r\n") {
            message.truncate(message.len() - 2);
        } else if message.ends_with('\n') || message.ends_with('\r') {
            message.truncate(message.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn trimmed(message: &str) -> String {
        let mut entry = Entry::new(Severity::Info, message);
        NewlineHook.fire(&mut entry);
        entry.message
    }

    #[test]
    fn test_single_trailing_newline_removed() {
        assert_eq!(trimmed("done\n"), "done");
    }

    #[test]
    fn test_crlf_counts_as_one_sequence() {
        assert_eq!(trimmed("done\r\n"), "done");
    }

    #[test]
    fn test_double_trailing_newline_keeps_one() {
        assert_eq!(trimmed("done\n\n"), "done\n");
    }

    #[test]
    fn test_embedded_newline_untouched() {
        assert_eq!(trimmed("first\nsecond"), "first\nsecond");
    }

    #[test]
    fn test_no_trailing_newline_unchanged() {
        assert_eq!(trimmed("done"), "done");
        assert_eq!(trimmed(""), "");
    }

    proptest! {
        /// Whatever the message, the trim removes at most one trailing
        /// sequence and leaves the rest byte-for-byte intact.
        #[test]
        fn prop_at_most_one_trailing_sequence_removed(message: String) {
            let result = trimmed(&message);
            prop_assert!(message.starts_with(&result));

            let stripped = &message[result.len()..];
            prop_assert!(matches!(stripped, "" | "\n" | "\r" | "\r\n"));
            if stripped.is_empty() {
                prop_assert!(!message.ends_with('\n') && !message.ends_with('\r'));
            }
        }
    }
}
