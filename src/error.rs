use std::io;

/// Errors returned by the configuration surface of the dispatcher.
///
/// Emitting a record never produces one of these: emit paths return
/// `io::Result<usize>`, with `Ok(0)` meaning the record was filtered.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Verbosity outside `0..=5`.
    #[error("invalid log level {0}, expected 0-5")]
    InvalidLevel(i32),

    /// A level given as text that is not a number.
    #[error("invalid log level '{0}', expected a number 0-5")]
    InvalidLevelText(String),

    /// The log file cannot be opened because no filename is configured.
    #[error("no log file name configured")]
    NoFilename,

    #[error("log file error: {0}")]
    Io(#[from] io::Error),
}
