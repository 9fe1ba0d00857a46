//! `log` facade bridge.
//!
//! Code built on the `log` macros keeps working unchanged: the bridge
//! forwards every record through a chosen handle, so facade call sites and
//! handle call sites share one pipeline, one format, and one output.

use log::{Level, Log, Metadata, Record, SetLoggerError};

use crate::logger::Logger;
use crate::severity::Severity;

/// Routes `log` records through a handle.
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Install as the process-global `log` logger.
    ///
    /// Severity filtering stays with the pipeline, so the facade's max
    /// level is opened fully.
    ///
    /// # Errors
    /// Fails if a global logger was already installed.
    pub fn try_install(self) -> Result<(), SetLoggerError> {
        log::set_max_level(log::LevelFilter::Trace);
        log::set_boxed_logger(Box::new(self))
    }
}

/// `log` has five levels, the pipeline six: `trace` folds into debug and
/// nothing maps to fatal or panic.
fn severity_for(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warning,
        Level::Info => Severity::Info,
        Level::Debug | Level::Trace => Severity::Debug,
    }
}

impl Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.logger
            .with_field("target", record.target())
            .log(severity_for(record.level()), &record.args().to_string());
    }

    fn flush(&self) {}
}
