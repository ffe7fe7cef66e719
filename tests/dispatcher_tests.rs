use log_dispatcher::timestamp::{format_clock, format_date_time};
use log_dispatcher::{
    global, init_log_bridge, log_debug, log_error, log_message, log_warning, CallSite, Dispatcher,
    Level, LogConfig, LogError, SinkKind, TerminalSink,
};
use std::fs;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

const SITE: CallSite<'static> = CallSite::new("dispatcher_tests.rs", 11, "main");

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn dispatcher() -> (Dispatcher, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let out = buffer.clone();
    let dispatcher = Dispatcher::with_terminal(move |file| TerminalSink::with_writer(out, false, file));
    (dispatcher, buffer)
}

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

#[test]
fn test_defaults_to_terminal() {
    let (dispatcher, buffer) = dispatcher();
    assert_eq!(dispatcher.active(), SinkKind::Terminal);

    dispatcher.emit(None, &SITE, Level::Message, format_args!("ready")).unwrap();
    assert_eq!(buffer.contents(), "ready\n");
}

#[test]
fn test_hot_swap() {
    let (dispatcher, buffer) = dispatcher();

    assert_eq!(dispatcher.set_active(SinkKind::Queue), SinkKind::Terminal);
    dispatcher.emit(None, &SITE, Level::Warning, format_args!("queued")).unwrap();
    assert!(buffer.contents().is_empty(), "Queued records must not reach the terminal");
    assert_eq!(dispatcher.queue().len(), 1);

    assert_eq!(dispatcher.set_active(SinkKind::Terminal), SinkKind::Queue);
    dispatcher.emit(None, &SITE, Level::Warning, format_args!("direct")).unwrap();
    assert_eq!(buffer.contents(), "direct\n");
    assert_eq!(dispatcher.queue().len(), 1);
}

#[test]
fn test_replay_into_terminal() {
    let (dispatcher, buffer) = dispatcher();
    dispatcher.set_active(SinkKind::Queue);
    dispatcher.emit(None, &SITE, Level::Message, format_args!("one")).unwrap();
    dispatcher.emit(None, &SITE, Level::Debug3, format_args!("filtered")).unwrap();
    dispatcher.emit(None, &SITE, Level::Error, format_args!("two")).unwrap();

    dispatcher.set_active(SinkKind::Terminal);
    assert_eq!(dispatcher.replay_queue(SinkKind::Terminal), 3);

    assert!(dispatcher.queue().is_empty(), "Replay always empties the queue");
    assert_eq!(buffer.contents(), "one\ntwo\n");
}

#[test]
fn test_replay_into_queue_discards() {
    let (dispatcher, _buffer) = dispatcher();
    dispatcher.set_active(SinkKind::Queue);
    for i in 0..4 {
        dispatcher.emit(None, &SITE, Level::Message, format_args!("{}", i)).unwrap();
    }

    assert_eq!(dispatcher.replay_queue(SinkKind::Queue), 4);
    assert!(dispatcher.queue().is_empty());
}

#[test]
fn test_replay_keeps_original_timestamps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (dispatcher, _buffer) = dispatcher();
    dispatcher.set_active(SinkKind::Queue);

    let t = at(1_500_000_000);
    dispatcher.emit(Some(t), &SITE, Level::Warning, format_args!("early warning")).unwrap();

    dispatcher.set_log_file(Some(path.as_path()), false).unwrap();
    dispatcher.set_file_level(1, false).unwrap();
    dispatcher.set_active(SinkKind::File);
    dispatcher.replay_queue(SinkKind::File);
    dispatcher.shutdown();

    let expected = format!("[{}]<W> main() early warning\n", format_date_time(t));
    assert!(fs::read_to_string(&path).unwrap().contains(&expected));
}

#[test]
fn test_verbose_status_messages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (dispatcher, buffer) = dispatcher();

    dispatcher.set_log_file(Some(path.as_path()), true).unwrap();
    assert!(buffer.contents().is_empty(), "Storing a name while closed is silent");

    dispatcher.set_file_level(2, true).unwrap();
    dispatcher.set_file_level(3, true).unwrap();
    dispatcher.close_log_file(true);

    let shown = buffer.contents();
    let expected = format!(
        "Debugging at level 2 to file '{p}'\nLogging at level 3\nClosed log file: {p}\n",
        p = path.display()
    );
    assert_eq!(shown, expected);

    // The terminal mirrors its messages into the log while it is open
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("<M> log_file() Debugging at level 2"));
    assert!(contents.contains("<M> log_file() Logging at level 3"));
}

#[test]
fn test_quiet_status_messages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (dispatcher, buffer) = dispatcher();

    dispatcher.set_log_file(Some(path.as_path()), false).unwrap();
    dispatcher.open_log_file(false).unwrap();
    dispatcher.close_log_file(false);
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_open_without_name_fails() {
    let (dispatcher, _buffer) = dispatcher();
    assert!(matches!(dispatcher.open_log_file(true), Err(LogError::NoFilename)));
    assert!(!dispatcher.file().is_open());
}

#[test]
fn test_configure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (dispatcher, _buffer) = dispatcher();

    let config = LogConfig {
        file: Some(path.clone()),
        file_level: 2,
        terminal_level: 1,
        version: Some("-test".into()),
        queue_capacity: 10,
    };
    dispatcher.configure(&config).unwrap();

    assert!(dispatcher.file().is_open());
    assert_eq!(dispatcher.file().level(), 2);
    assert_eq!(dispatcher.terminal().level(), 1);
    assert_eq!(dispatcher.queue().max_size(), 10);

    // Applying the same config again must not reopen the file
    dispatcher.configure(&config).unwrap();
    dispatcher.shutdown();
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches("NeoMutt-test debugging at level 2").count(), 1);
}

#[test]
fn test_configure_rejects_bad_level() {
    let (dispatcher, _buffer) = dispatcher();
    let config = LogConfig {
        terminal_level: 9,
        ..LogConfig::default()
    };
    assert!(matches!(dispatcher.configure(&config), Err(LogError::InvalidLevel(9))));
}

#[test]
fn test_save_queue_keeps_state() {
    let (dispatcher, _buffer) = dispatcher();
    dispatcher.set_active(SinkKind::Queue);
    dispatcher.emit(Some(at(1_700_000_000)), &SITE, Level::Message, format_args!("saved")).unwrap();

    let (mut file, count) = dispatcher.save_queue().unwrap();
    assert_eq!(count, 1);
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, format!("[{}]<M> saved\n", format_clock(at(1_700_000_000))));

    assert_eq!(dispatcher.active(), SinkKind::Queue);
    assert_eq!(dispatcher.queue().len(), 1);
}

#[test]
fn test_shutdown_closes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("debug.log");
    let (dispatcher, _buffer) = dispatcher();
    dispatcher.set_log_file(Some(path.as_path()), false).unwrap();
    dispatcher.set_file_level(1, false).unwrap();

    dispatcher.shutdown();
    assert!(!dispatcher.file().is_open());
    assert!(fs::read_to_string(&path).unwrap().trim_end().ends_with("Closing log."));
}

// The only test touching the process-wide dispatcher, so nothing races it.
#[test]
fn test_global_macros_and_log_bridge() {
    let dispatcher = global();
    let previous = dispatcher.set_active(SinkKind::Queue);
    dispatcher.queue().clear();

    log_message!("hello {}", "world");
    log_warning!("{} retries left", 2);
    log_error!("gave up");
    log_debug!(4, "deep detail");

    init_log_bridge().unwrap();
    log::info!("from the log crate: {}", 7);
    log::trace!("trace maps to debug two");

    let records = dispatcher.queue().snapshot();
    let seen: Vec<(Level, &str)> = records.iter().map(|r| (r.level(), r.message())).collect();
    assert_eq!(
        seen,
        [
            (Level::Message, "hello world"),
            (Level::Warning, "2 retries left"),
            (Level::Error, "gave up"),
            (Level::Debug4, "deep detail"),
            (Level::Message, "from the log crate: 7"),
            (Level::Debug2, "trace maps to debug two"),
        ]
    );
    assert!(records[0].origin().unwrap().contains("dispatcher_tests"));

    dispatcher.queue().clear();
    dispatcher.set_active(previous);
}
