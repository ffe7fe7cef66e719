use std::fmt;
use std::io;
use std::time::SystemTime;

use crate::level::Level;
use crate::record::CallSite;

/// A destination for log output.
///
/// Every sink implements the same emit contract, so the dispatcher can swap
/// between them without call sites noticing. The sink decides whether the
/// record passes its level filter and how it is rendered.
///
/// # Return value
///
/// * `Ok(0)` - the record was filtered out and no I/O happened
/// * `Ok(n)` - `n` bytes were produced
/// * `Err(e)` - writing failed; `e` is also stored in [`crate::os_error`]
///
/// # Examples
///
/// ```
/// # use log_dispatcher::{CallSite, Level, Sink};
/// # use std::{fmt, io, time::SystemTime};
/// #[derive(Debug)]
/// struct CountingSink;
///
/// impl Sink for CountingSink {
///     fn emit(
///         &self,
///         _time: Option<SystemTime>,
///         _site: &CallSite<'_>,
///         _level: Level,
///         args: fmt::Arguments<'_>,
///     ) -> io::Result<usize> {
///         Ok(args.to_string().len())
///     }
/// }
///
/// let site = CallSite::new(file!(), line!(), "main");
/// assert_eq!(CountingSink.emit(None, &site, Level::Message, format_args!("{}", 42)).unwrap(), 2);
/// ```
pub trait Sink: fmt::Debug + Send + Sync {
    /// Offers one record to the sink.
    ///
    /// `time` of `None` means "now". `args` is the already-captured format
    /// string and its arguments; replayed records pass their stored message
    /// as `format_args!("{}", message)` so it is never re-parsed.
    fn emit(
        &self,
        time: Option<SystemTime>,
        site: &CallSite<'_>,
        level: Level,
        args: fmt::Arguments<'_>,
    ) -> io::Result<usize>;
}
