//! Timestamp formatting for log lines.
//!
//! This module turns points in time into the display strings written by the
//! sinks, memoizing the full date-time text so repeated calls within the same
//! second don't pay for formatting again.

use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

/// Format used for file sink timestamps.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format used when exporting queued records.
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Memoizes the last formatted `YYYY-MM-DD HH:MM:SS` string.
///
/// The cache holds a single entry keyed by the whole second it was formatted
/// for. A call for the same second hands back the very same `Arc<str>`, so
/// callers can hold on to the text without copying it, and the cache never
/// mutates a string it has already given out.
///
/// # Examples
///
/// ```
/// # use log_dispatcher::timestamp::TimestampCache;
/// # use std::sync::Arc;
/// # use std::time::{Duration, UNIX_EPOCH};
/// let cache = TimestampCache::new();
/// let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
///
/// let first = cache.format(Some(t));
/// let second = cache.format(Some(t + Duration::from_millis(300)));
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.len(), "YYYY-MM-DD HH:MM:SS".len());
/// ```
#[derive(Debug, Default)]
pub struct TimestampCache {
    last: Mutex<Option<(i64, Arc<str>)>>,
}

impl TimestampCache {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Formats `time`, or the current time when `None`.
    ///
    /// Returns the cached string when `time` falls within the same second as
    /// the previous call.
    pub fn format(&self, time: Option<SystemTime>) -> Arc<str> {
        let local = to_local(time.unwrap_or_else(SystemTime::now));
        let second = local.timestamp();

        let mut last = self.last.lock();
        if let Some((cached_second, text)) = last.as_ref() {
            if *cached_second == second {
                return Arc::clone(text);
            }
        }

        let text: Arc<str> = local.format(DATE_TIME_FORMAT).to_string().into();
        *last = Some((second, Arc::clone(&text)));
        text
    }

    /// Forgets the cached entry; the next call formats from scratch.
    pub fn reset(&self) {
        *self.last.lock() = None;
    }
}

/// Formats `time` as `HH:MM:SS` in local time.
pub fn format_clock(time: SystemTime) -> String {
    to_local(time).format(CLOCK_FORMAT).to_string()
}

/// Formats `time` as `YYYY-MM-DD HH:MM:SS` in local time, without caching.
pub fn format_date_time(time: SystemTime) -> String {
    to_local(time).format(DATE_TIME_FORMAT).to_string()
}

#[inline]
fn to_local(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}
