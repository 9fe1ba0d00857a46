//! Request-scoped value propagation.
//!
//! A `Context` carries a logger (and any other scoped values) through a
//! call chain, so shared details live in one place instead of being
//! repeated at every log line. Contexts are immutable: deriving a child
//! allocates a new node pointing at the parent, never mutating shared
//! storage, which makes them safe to hand across threads freely.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::logger::{default_logger, Logger};

/// An opaque binding key.
///
/// Every `Key::new()` mints a fresh identity from a process-wide counter,
/// so keys from unrelated modules cannot collide. The key used for the
/// attached logger is private to this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(u64);

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

impl Key {
    pub fn new() -> Self {
        Key(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

struct Node {
    key: Key,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// An immutable, appendable carrier of request-scoped values.
///
/// Lookup walks from the newest binding to the oldest, so the nearest
/// ancestor's value wins and derivation never loses what an ancestor
/// attached.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

lazy_static! {
    // Logger binding key, deliberately unexported.
    static ref LOGGER_KEY: Key = Key::new();
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self { head: None }
    }

    /// Derive a child context that also carries `value` under `key`.
    pub fn with_value<T>(&self, key: Key, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Node {
                key,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The nearest binding for `key`, or `None` if never set.
    pub fn value<T>(&self, key: Key) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let mut node = self.head.as_ref();
        while let Some(current) = node {
            if current.key == key {
                return current.value.clone().downcast::<T>().ok();
            }
            node = current.parent.as_ref();
        }
        None
    }

    /// Derive a child context carrying `logger`.
    pub fn with_logger(&self, logger: Logger) -> Self {
        self.with_value(*LOGGER_KEY, logger)
    }

    /// The nearest attached handle, or the process-wide default when none
    /// was ever attached. Never fails and never blocks.
    pub fn logger(&self) -> Logger {
        self.value::<Logger>(*LOGGER_KEY)
            .map(|logger| (*logger).clone())
            .unwrap_or_else(default_logger)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut node = self.head.as_ref();
        while let Some(current) = node {
            depth += 1;
            node = current.parent.as_ref();
        }
        f.debug_struct("Context").field("bindings", &depth).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::pipeline::test_support::SharedBuf;
    use crate::pipeline::{default_pipeline, Pipeline};

    fn isolated_logger() -> (Logger, SharedBuf) {
        let pipeline = Arc::new(Pipeline::new());
        pipeline.apply(&LogConfig::default());
        let buf = SharedBuf::default();
        pipeline.set_writer(Box::new(buf.clone()));
        (Logger::with_pipeline(pipeline), buf)
    }

    #[test]
    fn test_attach_then_retrieve_yields_same_handle() {
        let (logger, _buf) = isolated_logger();
        let logger = logger.with_field("request", "req-1");

        let ctx = Context::background().with_logger(logger.clone());
        let retrieved = ctx.logger();

        assert!(Arc::ptr_eq(retrieved.pipeline(), logger.pipeline()));
        assert_eq!(retrieved.fields()["request"], "req-1");
    }

    #[test]
    fn test_empty_context_falls_back_to_default() {
        let retrieved = Context::background().logger();
        assert!(Arc::ptr_eq(retrieved.pipeline(), &default_pipeline()));
    }

    #[test]
    fn test_attaching_to_child_leaves_parent_unchanged() {
        let (logger, _buf) = isolated_logger();

        let parent = Context::background();
        let _child = parent.with_logger(logger);

        let from_parent = parent.logger();
        assert!(Arc::ptr_eq(from_parent.pipeline(), &default_pipeline()));
    }

    #[test]
    fn test_nearest_attachment_wins() {
        let (logger, _buf) = isolated_logger();
        let first = logger.with_field("scope", "outer");
        let second = logger.with_field("scope", "inner");

        let outer = Context::background().with_logger(first);
        let inner = outer.with_logger(second);

        assert_eq!(inner.logger().fields()["scope"], "inner");
        assert_eq!(outer.logger().fields()["scope"], "outer");
    }

    #[test]
    fn test_ancestor_attachment_survives_derivation() {
        let (logger, _buf) = isolated_logger();
        let marked = logger.with_field("request", "req-9");

        let ctx = Context::background().with_logger(marked);
        let derived = ctx.with_value(Key::new(), 42_u32);

        assert_eq!(derived.logger().fields()["request"], "req-9");
    }

    #[test]
    fn test_value_roundtrip_and_absence() {
        let key = Key::new();
        let other = Key::new();

        let ctx = Context::background().with_value(key, "payload".to_string());

        assert_eq!(*ctx.value::<String>(key).unwrap(), "payload");
        assert!(ctx.value::<String>(other).is_none());
        // Wrong type under the right key is absent, not a panic.
        assert!(ctx.value::<u32>(key).is_none());
    }

    #[test]
    fn test_value_shadowing_keeps_parent_intact() {
        let key = Key::new();
        let parent = Context::background().with_value(key, 1_u32);
        let child = parent.with_value(key, 2_u32);

        assert_eq!(*child.value::<u32>(key).unwrap(), 2);
        assert_eq!(*parent.value::<u32>(key).unwrap(), 1);
    }

    #[test]
    fn test_context_is_shareable_across_threads() {
        let (logger, buf) = isolated_logger();
        let ctx = Context::background().with_logger(logger.with_field("shared", true));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                std::thread::spawn(move || ctx.logger().info("from worker"))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(buf.contents().lines().count(), 8);
    }
}
