use std::collections::VecDeque;
use std::io::{self, Write};

use crate::record::LogRecord;
use crate::sink::Sink;
use crate::timestamp::format_clock;

/// An ordered backlog of log records with optional FIFO eviction.
///
/// Records are kept in insertion order, oldest at the head. With a capacity
/// of zero the queue is unbounded; otherwise, once it is full, every new
/// record pushes the oldest one out, so the queue behaves as a sliding
/// window over the most recent `capacity` records. Evicted records are
/// dropped silently.
///
/// The queue is not synchronized; [`crate::QueueSink`] wraps it in a mutex.
///
/// # Examples
///
/// ```
/// # use log_dispatcher::{BoundedQueue, CallSite, Level, LogRecord};
/// # use std::time::SystemTime;
/// let site = CallSite::new(file!(), line!(), "startup");
/// let mut queue = BoundedQueue::with_capacity(2);
/// for msg in ["A", "B", "C"] {
///     queue.enqueue(LogRecord::new(SystemTime::now(), &site, Level::Message, msg.into()));
/// }
/// let kept: Vec<_> = queue.iter().map(|r| r.message()).collect();
/// assert_eq!(kept, ["B", "C"]);
/// ```
#[derive(Debug, Default)]
pub struct BoundedQueue {
    records: VecDeque<LogRecord>,
    capacity: usize,
}

impl BoundedQueue {
    /// Creates an empty, unbounded queue.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Appends `record` at the tail and returns the resulting count.
    ///
    /// When the queue is bounded and already holds `capacity` or more
    /// records, records are evicted from the head until the new one fits.
    pub fn enqueue(&mut self, record: LogRecord) -> usize {
        if self.capacity > 0 {
            while self.records.len() >= self.capacity {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
        self.records.len()
    }

    /// Sets the capacity; `0` means unbounded.
    ///
    /// A queue already larger than the new capacity is not truncated until
    /// the next [`enqueue`](Self::enqueue).
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter()
    }

    /// Discards every record.
    pub fn clear(&mut self) {
        self.records = VecDeque::new();
    }

    /// Replays every record into `sink`, oldest first, then empties the queue.
    ///
    /// Each record keeps its original time, call site and level; the message
    /// is passed as a literal. The queue ends up empty whatever the sink did
    /// with the records, and emit errors are ignored. Returns how many
    /// records were replayed.
    pub fn drain_to(&mut self, sink: &dyn Sink) -> usize {
        let records = std::mem::take(&mut self.records);
        let count = records.len();
        for record in &records {
            let _ = sink.emit(
                Some(record.time()),
                &record.call_site(),
                record.level(),
                format_args!("{}", record.message()),
            );
        }
        count
    }

    /// Writes the queue to `out` as `[HH:MM:SS]<L> MESSAGE` lines.
    ///
    /// Debug records get no trailing newline, mirroring how they were
    /// emitted. The queue is left untouched. Returns the number of records
    /// written.
    pub fn export_to(&self, out: &mut dyn Write) -> io::Result<usize> {
        let mut count = 0;
        for record in &self.records {
            write!(
                out,
                "[{}]<{}> {}",
                format_clock(record.time()),
                record.level().abbrev(),
                record.message()
            )?;
            if record.level().ends_line() {
                out.write_all(b"\n")?;
            }
            count += 1;
        }
        out.flush()?;
        Ok(count)
    }
}
