use std::time::SystemTime;

use crate::level::Level;

/// Where a log call came from.
///
/// `file` and `line` travel with every record but no sink filters or
/// formats on them. `origin` is the function or module label printed as
/// `origin()` in file output; `None` prints as `UNKNOWN()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
    pub origin: Option<&'a str>,
}

impl<'a> CallSite<'a> {
    pub const fn new(file: &'a str, line: u32, origin: &'a str) -> Self {
        Self {
            file,
            line,
            origin: Some(origin),
        }
    }

    /// A call site with no origin label.
    pub const fn anonymous(file: &'a str, line: u32) -> Self {
        Self {
            file,
            line,
            origin: None,
        }
    }

    pub fn origin_or_unknown(&self) -> &'a str {
        self.origin.unwrap_or("UNKNOWN")
    }
}

/// One log line, fully formatted, as kept by the queue sink.
///
/// Records are immutable once built: the message has already been expanded
/// from its format arguments and the timestamp is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    time: SystemTime,
    file: String,
    line: u32,
    origin: Option<String>,
    level: Level,
    message: String,
}

impl LogRecord {
    pub fn new(time: SystemTime, site: &CallSite<'_>, level: Level, message: String) -> Self {
        Self {
            time,
            file: site.file.to_owned(),
            line: site.line,
            origin: site.origin.map(str::to_owned),
            level,
            message,
        }
    }

    pub fn time(&self) -> SystemTime {
        self.time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Borrowed view of the call site, for handing the record to a sink.
    pub fn call_site(&self) -> CallSite<'_> {
        CallSite {
            file: &self.file,
            line: self.line,
            origin: self.origin.as_deref(),
        }
    }
}
