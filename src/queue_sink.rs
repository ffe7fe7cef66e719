use std::fmt::{self, Write as _};
use std::io::{self, Seek, SeekFrom, Write};
use std::time::SystemTime;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::bounded_queue::BoundedQueue;
use crate::level::Level;
use crate::os_error;
use crate::record::{CallSite, LogRecord};
use crate::sink::Sink;

/// Queued messages are cut to this many bytes.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Sink that buffers records in memory for later replay or export.
///
/// This is the sink to use while nothing else is ready, typically during
/// startup before a terminal or log file exists. It never filters: every
/// level is kept. A `Perror` record is stored as `Error` with the system
/// error description already appended to its message.
///
/// # Thread Safety
///
/// The backing [`BoundedQueue`] sits behind a mutex. Replay and export hold
/// the lock for their whole run, so records can't be added halfway through.
/// A replay must therefore never target this same queue sink.
#[derive(Debug, Default)]
pub struct QueueSink {
    queue: Mutex<BoundedQueue>,
}

impl QueueSink {
    /// Creates an empty, unbounded queue sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the queue to `size` records. Zero or negative means unbounded.
    pub fn set_max_size(&self, size: i64) {
        let capacity = usize::try_from(size.max(0)).unwrap_or(usize::MAX);
        self.queue.lock().set_capacity(capacity);
    }

    pub fn max_size(&self) -> usize {
        self.queue.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Adds an already-built record, returning the queue length.
    pub fn push(&self, record: LogRecord) -> usize {
        self.queue.lock().enqueue(record)
    }

    /// A copy of the queued records, oldest first.
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.queue.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.queue.lock().clear();
    }

    /// Replays the backlog into `sink` and empties the queue.
    pub fn drain_to(&self, sink: &dyn Sink) -> usize {
        self.queue.lock().drain_to(sink)
    }

    /// Writes the backlog to `out` without clearing it.
    pub fn export_to(&self, out: &mut dyn Write) -> io::Result<usize> {
        self.queue.lock().export_to(out)
    }

    /// Exports the backlog into a new temporary file.
    ///
    /// The file is rewound and ready to read. It is deleted when the returned
    /// handle is dropped, unless the caller persists it.
    pub fn save_to_tempfile(&self) -> io::Result<(NamedTempFile, usize)> {
        let mut file = NamedTempFile::new()?;
        let count = self.export_to(file.as_file_mut())?;
        file.as_file_mut().seek(SeekFrom::Start(0))?;
        Ok((file, count))
    }
}

impl Sink for QueueSink {
    fn emit(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> io::Result<usize> {
        let err = (level == Level::Perror).then(|| os_error::take_last_error().description);

        let mut message = args.to_string();
        truncate_at_boundary(&mut message, MAX_MESSAGE_LEN);

        let level = match err {
            Some(desc) => {
                let _ = write!(message, ": {}", desc);
                truncate_at_boundary(&mut message, MAX_MESSAGE_LEN);
                Level::Error
            }
            None => level,
        };

        let written = message.len();
        let record = LogRecord::new(time.unwrap_or_else(SystemTime::now), site, level, message);
        self.push(record);
        Ok(written)
    }
}

fn truncate_at_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
