use std::fmt::{self, Write as _};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::error::LogError;
use crate::level::{self, Level};
use crate::os_error;
use crate::record::CallSite;
use crate::sink::Sink;
use crate::timestamp::TimestampCache;

/// Product name written at the start of the open banner.
pub const PRODUCT_NAME: &str = "NeoMutt";

/// A state change of the log file worth telling the user about.
///
/// The file sink reports these instead of printing them, since it may be
/// called while the sink that would show them is busy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Opened { path: PathBuf, level: u8 },
    Closed { path: PathBuf },
    LevelChanged(u8),
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileEvent::Opened { path, level } => {
                write!(f, "Debugging at level {} to file '{}'", level, path.display())
            }
            FileEvent::Closed { path } => write!(f, "Closed log file: {}", path.display()),
            FileEvent::LevelChanged(level) => write!(f, "Logging at level {}", level),
        }
    }
}

#[derive(Debug)]
struct OpenLog {
    file: File,
    path: PathBuf,
}

#[derive(Debug, Default)]
struct FileState {
    log: Option<OpenLog>,
    path: Option<PathBuf>,
    level: u8,
    version: Option<String>,
}

/// Sink that appends log lines to a file.
///
/// Lines look like `[YYYY-MM-DD HH:MM:SS]<L> origin() message`. Only levels
/// in `[Perror, level]` are written, and nothing is written while the file
/// is closed.
///
/// # Lifecycle
///
/// The sink starts closed. [`open`](Self::open) needs a filename; it appends
/// (never truncates) and writes a session banner. Changing the filename or
/// level while open closes the file and opens it again with the new
/// settings, so the file always matches the current configuration. Setting
/// the level to 0 closes it. The file is closed, with a closing banner,
/// when the sink is dropped.
#[derive(Debug, Default)]
pub struct FileSink {
    state: Mutex<FileState>,
    clock: TimestampCache,
}

impl FileSink {
    /// Creates a closed sink with no filename and level 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().log.is_some()
    }

    pub fn filename(&self) -> Option<PathBuf> {
        self.state.lock().path.clone()
    }

    pub fn level(&self) -> u8 {
        self.state.lock().level
    }

    pub fn version(&self) -> Option<String> {
        self.state.lock().version.clone()
    }

    /// Sets (or with `None`, clears) the log file name.
    ///
    /// Setting the current name again does nothing. While closed the name is
    /// only stored. While open, the old file is closed and the new one
    /// opened; clearing the name closes the file.
    pub fn set_filename(&self, path: Option<&Path>) -> Result<Option<FileEvent>, LogError> {
        let mut state = self.state.lock();
        if state.path.as_deref() == path {
            return Ok(None);
        }
        state.path = path.map(Path::to_path_buf);

        if state.log.is_none() {
            return Ok(None);
        }
        if state.path.is_none() {
            return Ok(close_log(&self.clock, &mut state));
        }
        open_log(&self.clock, &mut state).map(Some)
    }

    /// Sets the maximum verbosity, `0..=5`.
    ///
    /// Level 0 closes the file. A non-zero level reopens an open file, or
    /// tries to open a closed one when a filename is configured.
    pub fn set_level(&self, level: i32) -> Result<Option<FileEvent>, LogError> {
        let level = level::verbosity(level)?;
        let mut state = self.state.lock();
        if state.level == level {
            return Ok(None);
        }
        state.level = level;

        if level == 0 {
            return Ok(close_log(&self.clock, &mut state));
        }
        if state.log.is_some() {
            open_log(&self.clock, &mut state)?;
            return Ok(Some(FileEvent::LevelChanged(level)));
        }
        if state.path.is_none() {
            return Ok(None);
        }
        open_log(&self.clock, &mut state).map(Some)
    }

    /// Sets the version label appended to the product name in the banner.
    ///
    /// It is printed as-is, so it usually starts with a hyphen.
    pub fn set_version(&self, version: Option<&str>) {
        self.state.lock().version = version.map(str::to_owned);
    }

    /// Opens the configured file for appending, closing any open one first.
    pub fn open(&self) -> Result<FileEvent, LogError> {
        let mut state = self.state.lock();
        open_log(&self.clock, &mut state)
    }

    /// Closes the file, writing a closing banner. Does nothing when closed.
    pub fn close(&self) -> Option<FileEvent> {
        let mut state = self.state.lock();
        close_log(&self.clock, &mut state)
    }
}

impl Sink for FileSink {
    fn emit(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> io::Result<usize> {
        let err = (level == Level::Perror).then(|| os_error::take_last_error().description);
        self.write_line(time, site, level, args, err.as_deref())
    }
}

impl FileSink {
    /// Writes one line, with `err` as the PERROR suffix already resolved by
    /// the caller.
    pub(crate) fn write_line(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
        err: Option<&str>,
    ) -> io::Result<usize> {
        let mut state = self.state.lock();
        if !level.passes(state.level) {
            return Ok(0);
        }
        let Some(log) = state.log.as_mut() else {
            return Ok(0);
        };

        let mut line = String::with_capacity(128);
        let _ = write!(
            line,
            "[{}]<{}> {}() {}",
            self.clock.format(time),
            level.abbrev(),
            site.origin_or_unknown(),
            args
        );
        if let Some(desc) = err {
            let _ = write!(line, ": {}", desc);
        }
        if level.ends_line() {
            line.push('\n');
        }

        log.file.write_all(line.as_bytes())?;
        Ok(line.len())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let FileSink { state, clock } = self;
        close_log(clock, state.get_mut());
    }
}

fn open_log(clock: &TimestampCache, state: &mut FileState) -> Result<FileEvent, LogError> {
    let path = state.path.clone().ok_or(LogError::NoFilename)?;
    close_log(clock, state);

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&path)?;

    let banner = format!(
        "[{}] {}{} debugging at level {}\n",
        clock.format(None),
        PRODUCT_NAME,
        state.version.as_deref().unwrap_or(""),
        state.level
    );
    file.write_all(banner.as_bytes())?;

    state.log = Some(OpenLog {
        file,
        path: path.clone(),
    });
    Ok(FileEvent::Opened {
        path,
        level: state.level,
    })
}

fn close_log(clock: &TimestampCache, state: &mut FileState) -> Option<FileEvent> {
    let mut log = state.log.take()?;
    let _ = writeln!(log.file, "[{}] Closing log.", clock.format(None));
    let _ = log.file.flush();
    Some(FileEvent::Closed { path: log.path })
}
