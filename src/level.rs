use std::fmt;

use crate::error::LogError;

/// Severity levels understood by every sink.
///
/// Levels carry a numeric rank and a one-character abbreviation. Negative
/// ranks are errors and warnings, `Message` sits at zero, and the debug
/// levels climb from 1 to 5 with increasing verbosity.
///
/// # Examples
///
/// ```
/// # use log_dispatcher::Level;
/// assert!(Level::Error < Level::Warning);
/// assert_eq!(Level::Debug2.rank(), 2);
/// assert_eq!(Level::Perror.abbrev(), 'P');
/// ```
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Like `Error`, but the current system error description is appended
    Perror = -3,
    Error = -2,
    Warning = -1,
    /// Always terminated by a newline when emitted
    Message = 0,
    Debug1 = 1,
    Debug2 = 2,
    Debug3 = 3,
    Debug4 = 4,
    Debug5 = 5,
}

/// Highest verbosity a sink can be configured with.
pub const MAX_VERBOSITY: u8 = 5;

const ABBREVIATIONS: &[u8; 9] = b"PEWM12345";

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 9] = [
        Level::Perror,
        Level::Error,
        Level::Warning,
        Level::Message,
        Level::Debug1,
        Level::Debug2,
        Level::Debug3,
        Level::Debug4,
        Level::Debug5,
    ];

    #[inline]
    pub const fn rank(self) -> i8 {
        self as i8
    }

    /// One-character tag used in file and export lines.
    pub const fn abbrev(self) -> char {
        ABBREVIATIONS[(self as i8 + 3) as usize] as char
    }

    /// Debug level `n` (1..=5), clamped into range.
    pub const fn debug(n: u8) -> Self {
        match n {
            0 | 1 => Level::Debug1,
            2 => Level::Debug2,
            3 => Level::Debug3,
            4 => Level::Debug4,
            _ => Level::Debug5,
        }
    }

    /// Errors, warnings and messages end their line; debug output does not.
    #[inline]
    pub const fn ends_line(self) -> bool {
        self.rank() <= 0
    }

    /// Whether a sink whose verbosity ceiling is `max` lets this level through.
    ///
    /// The accepted window is `[Perror, max]`.
    #[inline]
    pub const fn passes(self, max: u8) -> bool {
        self.rank() >= Level::Perror.rank() && self.rank() <= max as i8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Perror => "PERROR",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Message => "MESSAGE",
            Level::Debug1 => "DEBUG1",
            Level::Debug2 => "DEBUG2",
            Level::Debug3 => "DEBUG3",
            Level::Debug4 => "DEBUG4",
            Level::Debug5 => "DEBUG5",
        };
        f.write_str(name)
    }
}

/// Checks a verbosity setting, rejecting anything outside `0..=5`.
pub fn verbosity(level: i32) -> Result<u8, LogError> {
    match u8::try_from(level) {
        Ok(v) if v <= MAX_VERBOSITY => Ok(v),
        _ => Err(LogError::InvalidLevel(level)),
    }
}
