//! Per-thread record of the last system error.
//!
//! `Level::Perror` output appends the description of the operating
//! system's last error, the way C callers read `errno`. A caller can
//! instead arm an explicit error for the next PERROR on its thread with
//! [`set_last_error`]; that override is consumed by the PERROR that reads
//! it, so it never outlives the failure it describes.

use std::cell::RefCell;
use std::io;

thread_local! {
    static LAST_ERROR: RefCell<Option<SystemError>> = const { RefCell::new(None) };
}

/// A captured system error: optional OS code plus its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemError {
    pub code: Option<i32>,
    pub description: String,
}

impl SystemError {
    pub fn from_io(err: &io::Error) -> Self {
        let code = err.raw_os_error();
        let text = err.to_string();
        // std renders OS errors as "<strerror text> (os error N)"
        let description = match code {
            Some(n) => text
                .strip_suffix(&format!(" (os error {})", n))
                .map(str::to_owned)
                .unwrap_or(text),
            None => text,
        };
        Self { code, description }
    }
}

/// Makes `err` the error reported by the next PERROR on this thread.
pub fn set_last_error(err: &io::Error) {
    let captured = SystemError::from_io(err);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(captured));
}

/// Drops a pending override without reporting it.
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// The error the next PERROR would report, leaving any override armed.
pub fn last_error() -> SystemError {
    let os = io::Error::last_os_error();
    LAST_ERROR
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| SystemError::from_io(&os))
}

/// The error for a PERROR being written now, consuming any override.
pub fn take_last_error() -> SystemError {
    let os = io::Error::last_os_error();
    LAST_ERROR
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| SystemError::from_io(&os))
}
