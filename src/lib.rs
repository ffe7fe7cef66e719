//! # Log Dispatcher
//!
//! A pluggable logging dispatcher: one process-wide indirection point that
//! routes log records to an interchangeable sink without callers knowing
//! which sink is active.
//!
//! ## Key Features
//!
//! * Log freely during startup, before a terminal or log file is ready:
//!   records are buffered in a bounded queue and replayed later
//! * Switch destinations at runtime (terminal, file, queue) without
//!   changing call sites
//! * Level filtering per sink, with a separate ceiling for file and terminal
//! * Log file open/close/reopen that tracks configuration changes
//!
//! ## Main Components
//!
//! * `Dispatcher`: owns the sinks and the active-sink selector
//! * `TerminalSink`: stderr output, coloured on interactive terminals,
//!   mirrored to the log file
//! * `FileSink`: timestamped lines appended to a log file
//! * `QueueSink` / `BoundedQueue`: in-memory backlog with FIFO eviction
//! * `timestamp`: memoized timestamp formatting
//!
//! ## Quick Start
//!
//! ```
//! use log_dispatcher::{CallSite, Dispatcher, Level, SinkKind};
//!
//! let dispatcher = Dispatcher::new();
//!
//! // Nothing is ready yet: queue everything
//! dispatcher.set_active(SinkKind::Queue);
//! let site = CallSite::new(file!(), line!(), "startup");
//! dispatcher.emit(None, &site, Level::Message, format_args!("reading {}", "config")).unwrap();
//! dispatcher.emit(None, &site, Level::Debug2, format_args!("{} entries", 3)).unwrap();
//! assert_eq!(dispatcher.queue().len(), 2);
//!
//! // The terminal is up: switch over and replay the backlog
//! dispatcher.set_active(SinkKind::Terminal);
//! assert_eq!(dispatcher.replay_queue(SinkKind::Terminal), 2);
//! assert!(dispatcher.queue().is_empty());
//! ```

pub mod bounded_queue;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod file_sink;
pub mod level;
pub mod log_bridge;
pub mod os_error;
pub mod queue_sink;
pub mod record;
pub mod sink;
pub mod terminal_sink;
pub mod timestamp;

pub use bounded_queue::BoundedQueue;
pub use config::LogConfig;
pub use dispatcher::{global, Dispatcher, SinkKind};
pub use error::LogError;
pub use file_sink::{FileEvent, FileSink};
pub use level::Level;
pub use log_bridge::init_log_bridge;
pub use queue_sink::QueueSink;
pub use record::{CallSite, LogRecord};
pub use sink::Sink;
pub use terminal_sink::TerminalSink;
