//! Routing of log calls to whichever sink is currently selected.
//!
//! A [`Dispatcher`] owns one of each sink and a selector naming the active
//! one. Call sites only ever talk to the dispatcher, so output can move from
//! the startup queue to the terminal, or to a log file, without touching
//! them.
//!
//! Most programs use the process-wide instance from [`global`] through the
//! `log_*!` macros. Tests and embedders can build independent instances
//! with [`Dispatcher::new`] or [`Dispatcher::with_terminal`].

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::config::LogConfig;
use crate::error::LogError;
use crate::file_sink::{FileEvent, FileSink};
use crate::level::Level;
use crate::queue_sink::QueueSink;
use crate::record::CallSite;
use crate::sink::Sink;
use crate::terminal_sink::TerminalSink;

/// The sinks a dispatcher can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SinkKind {
    #[default]
    Terminal,
    File,
    Queue,
}

pub struct Dispatcher {
    file: Arc<FileSink>,
    terminal: TerminalSink,
    queue: QueueSink,
    active: Mutex<SinkKind>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("active", &self.active())
            .field("file", &self.file)
            .field("terminal", &self.terminal)
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// A dispatcher whose terminal sink writes to stderr, routing to the
    /// terminal.
    pub fn new() -> Self {
        Self::with_terminal(TerminalSink::stderr)
    }

    /// A dispatcher with a custom terminal sink.
    ///
    /// `make_terminal` receives the file sink the terminal must mirror to.
    pub fn with_terminal(make_terminal: impl FnOnce(Arc<FileSink>) -> TerminalSink) -> Self {
        let file = Arc::new(FileSink::new());
        let terminal = make_terminal(Arc::clone(&file));
        Self {
            file,
            terminal,
            queue: QueueSink::new(),
            active: Mutex::new(SinkKind::default()),
        }
    }

    pub fn active(&self) -> SinkKind {
        *self.active.lock()
    }

    /// Routes all further log calls to `kind`, returning the previous choice.
    pub fn set_active(&self, kind: SinkKind) -> SinkKind {
        std::mem::replace(&mut *self.active.lock(), kind)
    }

    pub fn sink(&self, kind: SinkKind) -> &dyn Sink {
        match kind {
            SinkKind::Terminal => &self.terminal,
            SinkKind::File => &*self.file,
            SinkKind::Queue => &self.queue,
        }
    }

    pub fn file(&self) -> &FileSink {
        &self.file
    }

    pub fn terminal(&self) -> &TerminalSink {
        &self.terminal
    }

    pub fn queue(&self) -> &QueueSink {
        &self.queue
    }

    /// Hands a record to the active sink.
    pub fn emit(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> io::Result<usize> {
        let kind = self.active();
        self.sink(kind).emit(time, site, level, args)
    }

    /// Replays the queued backlog through `target` and empties the queue.
    ///
    /// Replaying into the queue itself just discards the backlog. Returns the
    /// number of records replayed.
    pub fn replay_queue(&self, target: SinkKind) -> usize {
        match target {
            SinkKind::Queue => {
                let count = self.queue.len();
                self.queue.clear();
                count
            }
            kind => self.queue.drain_to(self.sink(kind)),
        }
    }

    /// Exports the backlog to a temporary file, leaving queue and routing as
    /// they are.
    pub fn save_queue(&self) -> io::Result<(NamedTempFile, usize)> {
        self.queue.save_to_tempfile()
    }

    pub fn set_log_file(&self, path: Option<&Path>, verbose: bool) -> Result<(), LogError> {
        let event = self.file.set_filename(path)?;
        self.report(event, verbose);
        Ok(())
    }

    pub fn set_file_level(&self, level: i32, verbose: bool) -> Result<(), LogError> {
        let event = self.file.set_level(level)?;
        self.report(event, verbose);
        Ok(())
    }

    pub fn set_version(&self, version: Option<&str>) {
        self.file.set_version(version);
    }

    pub fn open_log_file(&self, verbose: bool) -> Result<(), LogError> {
        let event = self.file.open()?;
        self.report(Some(event), verbose);
        Ok(())
    }

    pub fn close_log_file(&self, verbose: bool) {
        let event = self.file.close();
        self.report(event, verbose);
    }

    /// Applies a whole [`LogConfig`].
    ///
    /// The log file is opened when both a file and a non-zero level are set.
    pub fn configure(&self, config: &LogConfig) -> Result<(), LogError> {
        self.terminal.set_level(config.terminal_level)?;
        self.queue.set_max_size(config.queue_capacity);
        self.file.set_version(config.version.as_deref());
        self.file.set_filename(config.file.as_deref())?;
        self.file.set_level(config.file_level)?;

        if config.file.is_some() && config.file_level > 0 && !self.file.is_open() {
            self.file.open()?;
        }
        Ok(())
    }

    /// Closes the log file. Routing and the queue are left alone.
    pub fn shutdown(&self) {
        self.file.close();
    }

    fn report(&self, event: Option<FileEvent>, verbose: bool) {
        let Some(event) = event.filter(|_| verbose) else {
            return;
        };
        let site = CallSite::new(file!(), line!(), "log_file");
        let _ = self.emit(None, &site, Level::Message, format_args!("{}", event));
    }
}

lazy_static! {
    /// The process-wide dispatcher, routing to the terminal until told
    /// otherwise.
    static ref GLOBAL_DISPATCHER: Dispatcher = Dispatcher::new();
}

/// The process-wide dispatcher used by the `log_*!` macros.
pub fn global() -> &'static Dispatcher {
    &GLOBAL_DISPATCHER
}

/// Logs through the global dispatcher at the given [`Level`].
///
/// The call site's file, line and module path are captured automatically;
/// the rest is a `format!`-style message.
///
/// # Examples
///
/// ```
/// # use log_dispatcher::{log_at, Level};
/// log_at!(Level::Warning, "disk {} is {}% full", "/var", 93);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {{
        let _ = $crate::dispatcher::global().emit(
            ::std::option::Option::None,
            &$crate::CallSite::new(file!(), line!(), module_path!()),
            $level,
            format_args!($($arg)+),
        );
    }};
}

/// Logs at [`Level::Perror`], appending the last system error.
#[macro_export]
macro_rules! log_perror {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Perror, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_message {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Message, $($arg)+) };
}

/// Logs at debug level `n` (1..=5).
///
/// ```
/// # use log_dispatcher::log_debug;
/// log_debug!(2, "parsed {} headers", 14);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($n:expr, $($arg:tt)+) => { $crate::log_at!($crate::Level::debug($n), $($arg)+) };
}
