use std::path::PathBuf;

use crate::error::LogError;
use crate::level;

/// Settings for a [`crate::Dispatcher`], applied with
/// [`Dispatcher::configure`](crate::Dispatcher::configure).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file to write to; `None` leaves file logging off.
    pub file: Option<PathBuf>,
    /// File verbosity, `0..=5`. Zero keeps the file closed.
    pub file_level: i32,
    /// Terminal verbosity, `0..=5`.
    pub terminal_level: i32,
    /// Appended to the product name in the log file banner.
    pub version: Option<String>,
    /// Maximum number of queued records; zero is unbounded.
    pub queue_capacity: i64,
}

impl LogConfig {
    /// Builds a config from a command line style file name and level.
    ///
    /// A missing level defaults to 1 when a file is given, matching the usual
    /// expectation that naming a log file turns debugging on.
    pub fn from_args(file: Option<&str>, level: Option<&str>) -> Result<Self, LogError> {
        let file_level = match level {
            Some(text) => {
                let parsed = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| LogError::InvalidLevelText(text.to_owned()))?;
                i32::from(level::verbosity(parsed)?)
            }
            None if file.is_some() => 1,
            None => 0,
        };

        Ok(Self {
            file: file.map(PathBuf::from),
            file_level,
            ..Self::default()
        })
    }
}
