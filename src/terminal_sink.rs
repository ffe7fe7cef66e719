use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use colored::Colorize;
use parking_lot::Mutex;

use crate::error::LogError;
use crate::file_sink::FileSink;
use crate::level::{self, Level};
use crate::os_error;
use crate::record::CallSite;
use crate::sink::Sink;

/// Sink that writes bare messages to standard error.
///
/// Accepted records are first mirrored to the attached [`FileSink`] (which
/// applies its own filter), then written to the terminal. Errors show in
/// red and warnings in yellow, but only when the output is an interactive
/// terminal; redirected output never contains escape sequences.
///
/// The terminal has its own verbosity ceiling, independent of the file's.
pub struct TerminalSink {
    out: Mutex<Box<dyn Write + Send>>,
    colour: bool,
    level: AtomicU8,
    file: Arc<FileSink>,
}

impl fmt::Debug for TerminalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalSink")
            .field("colour", &self.colour)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl TerminalSink {
    /// A sink on the process's stderr, coloured when stderr is a terminal.
    pub fn stderr(file: Arc<FileSink>) -> Self {
        let colour = io::stderr().is_terminal();
        Self::with_writer(io::stderr(), colour, file)
    }

    /// A sink on any writer. `interactive` says whether it is a terminal,
    /// which decides if colour codes are written.
    pub fn with_writer(out: impl Write + Send + 'static, interactive: bool, file: Arc<FileSink>) -> Self {
        if interactive {
            // colored checks stdout and CLICOLOR itself; our writer decides
            colored::control::set_override(true);
        }
        Self {
            out: Mutex::new(Box::new(out)),
            colour: interactive,
            level: AtomicU8::new(0),
            file,
        }
    }

    pub fn level(&self) -> u8 {
        self.level.load(Ordering::Relaxed)
    }

    /// Sets the terminal's verbosity ceiling, `0..=5`.
    pub fn set_level(&self, level: i32) -> Result<(), LogError> {
        let level = level::verbosity(level)?;
        self.level.store(level, Ordering::Relaxed);
        Ok(())
    }
}

fn paint(level: Level, text: String) -> String {
    match level {
        Level::Perror | Level::Error => text.as_str().red().bold().to_string(),
        Level::Warning => text.as_str().yellow().bold().to_string(),
        _ => text,
    }
}

impl Sink for TerminalSink {
    fn emit(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> io::Result<usize> {
        if !level.passes(self.level()) {
            return Ok(0);
        }
        let err = (level == Level::Perror).then(|| os_error::take_last_error().description);

        let mut text = args.to_string();
        // A failing log file must not keep the line off the terminal
        let _ = self
            .file
            .write_line(time, site, level, format_args!("{}", text), err.as_deref());

        if let Some(desc) = err {
            text.push_str(": ");
            text.push_str(&desc);
        }
        if self.colour {
            text = paint(level, text);
        }
        if level.ends_line() {
            text.push('\n');
        }

        let mut out = self.out.lock();
        out.write_all(text.as_bytes()).and_then(|_| out.flush())?;
        Ok(text.len())
    }
}
