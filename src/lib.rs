//! ctxlog - Context-scoped structured logging
//!
//! This crate attaches logger handles to request-scoped contexts and
//! configures a shared logging pipeline from the environment. The
//! implementation prioritizes:
//!
//! 1. **Safety** - immutable contexts and copy-on-extend field sets, safe
//!    under concurrent emission from many callers
//! 2. **Resilience** - malformed configuration degrades to documented
//!    defaults, never to an unusable pipeline
//! 3. **Operability** - one complete line per entry, text or JSON,
//!    annotated with call sites where configured
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `severity` - the six ordered levels
//! - `config` - environment-driven configuration with per-input fallback
//! - `pipeline` - the shared backend (filter, hooks, formatter, output)
//! - `hooks` - per-entry post-processing (annotation, newline trim)
//! - `logger` - the fielded handle emitting through a pipeline
//! - `context` - request-scoped value carrier with logger fallback
//! - `facade` - bridge routing `log` macro call sites into the pipeline
//!
//! ## Typical startup
//!
//! ```
//! let warnings = ctxlog::init();
//! for warning in &warnings {
//!     eprintln!("logging config: {}", warning);
//! }
//!
//! let logger = ctxlog::default_logger().with_field("node", "mesh-7");
//! let ctx = ctxlog::Context::background().with_logger(logger);
//!
//! // Deeper in the call chain, possibly on another thread:
//! ctx.logger().info("node registered");
//! ```

pub mod config;
pub mod context;
pub mod facade;
pub mod hooks;
pub mod logger;
pub mod pipeline;
pub mod severity;

pub use config::{ConfigWarning, LogConfig};
pub use context::{Context, Key};
pub use facade::LogBridge;
pub use logger::{default_logger, Logger};
pub use pipeline::{default_pipeline, Pipeline};
pub use severity::Severity;

/// Configure the process-wide pipeline from `<prefix>_*` environment
/// variables.
///
/// Intended once, at startup, before concurrent logging begins. Returns
/// the rejected inputs; the pipeline is configured regardless (rejected
/// inputs fall back to their defaults).
pub fn init_from_env(prefix: &str) -> Vec<ConfigWarning> {
    let (config, warnings) = LogConfig::from_env(prefix);
    default_pipeline().apply(&config);
    warnings
}

/// `init_from_env` under the conventional `LOG` prefix.
pub fn init() -> Vec<ConfigWarning> {
    init_from_env("LOG")
}
