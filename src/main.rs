use std::env;
use std::process::ExitCode;

use log_dispatcher::os_error::set_last_error;
use log_dispatcher::{
    global, log_debug, log_error, log_message, log_perror, log_warning, LogConfig, LogError,
    SinkKind,
};

// Usage: log_dispatcher [LOGFILE [LEVEL]]
fn main() -> ExitCode {
    let dispatcher = global();

    // Nothing to show output on yet: buffer it
    dispatcher.set_active(SinkKind::Queue);
    dispatcher.queue().set_max_size(100);
    log_message!("starting {}", env!("CARGO_PKG_NAME"));
    log_debug!(1, "arguments: {:?}", env::args().skip(1).collect::<Vec<_>>());

    let file = env::args().nth(1);
    let level = env::args().nth(2);
    let config = match LogConfig::from_args(file.as_deref(), level.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log_error!("bad arguments: {}", e);
            dispatcher.replay_queue(SinkKind::Terminal);
            return ExitCode::FAILURE;
        }
    };
    let config = LogConfig {
        version: Some(format!("-{}", env!("CARGO_PKG_VERSION"))),
        terminal_level: config.file_level,
        queue_capacity: 100,
        ..config
    };

    match dispatcher.configure(&config) {
        Ok(()) => {}
        Err(LogError::Io(err)) => {
            set_last_error(&err);
            log_perror!("can't open log file {:?}", config.file);
        }
        Err(e) => log_error!("can't set up logging: {}", e),
    }

    // Output surface is ready: switch over and replay startup
    dispatcher.set_active(SinkKind::Terminal);
    dispatcher.replay_queue(SinkKind::Terminal);

    log_warning!("this build only demonstrates the dispatcher");
    log_debug!(2, "queue is empty again: {}", dispatcher.queue().is_empty());

    dispatcher.shutdown();
    ExitCode::SUCCESS
}
