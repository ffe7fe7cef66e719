use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::dispatcher::{global, Dispatcher};
use crate::level::Level;
use crate::record::CallSite;

/// Routes records from the `log` crate facade into a [`Dispatcher`].
///
/// Levels map as `Error`→`Error`, `Warn`→`Warning`, `Info`→`Message`,
/// `Debug`→`Debug1` and `Trace`→`Debug2`. The record's module path (or its
/// target) becomes the origin label. Filtering is left to the sinks.
impl Log for Dispatcher {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let site = CallSite {
            file: record.file().unwrap_or("<unknown>"),
            line: record.line().unwrap_or(0),
            origin: record.module_path().or(Some(record.target())),
        };
        let _ = self.emit(None, &site, from_log_level(record.level()), *record.args());
    }

    fn flush(&self) {}
}

pub fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Message,
        log::Level::Debug => Level::Debug1,
        log::Level::Trace => Level::Debug2,
    }
}

/// Installs the global dispatcher as the `log` crate's logger.
///
/// Fails if another logger has already been installed.
pub fn init_log_bridge() -> Result<(), SetLoggerError> {
    log::set_logger(global())?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
