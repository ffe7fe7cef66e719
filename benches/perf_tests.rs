use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use log_dispatcher::{CallSite, FileSink, Level, QueueSink, Sink};
use std::sync::Once;
use std::time::Instant;
use tempfile::tempdir;

const ITERATIONS: usize = 10_000;

static LOGGER_INIT: Once = Once::new();

#[derive(Debug)]
struct TestEvent {
    id: i32,
    active: bool,
    description: String,
}

impl std::fmt::Display for TestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event[id={}, active={}, desc={}]", self.id, self.active, self.description)
    }
}

fn setup_log4rs(log_file: &str) {
    LOGGER_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("[{d(%Y-%m-%d %H:%M:%S)}]<{l}> {M}() {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn test_event() -> TestEvent {
    TestEvent {
        id: 42,
        active: true,
        description: "Connection to imap.example.com established, 1532 messages, 12 unread".to_string(),
    }
}

fn bench_file_sink_vs_log4rs(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10); // Fewer samples due to I/O operations

    group.bench_function("file_sink_vs_log4rs", |b| {
        b.iter(|| {
            let dir = tempdir().unwrap();
            let event = test_event();
            let site = CallSite::new(file!(), line!(), "bench");

            let sink = FileSink::new();
            sink.set_filename(Some(dir.path().join("dispatcher.log").as_path())).unwrap();
            sink.set_level(1).unwrap();

            let dispatcher_start = Instant::now();
            for i in 0..ITERATIONS {
                sink.emit(None, &site, Level::Message, format_args!("iteration={}, event={}", i, event))
                    .unwrap();
            }
            sink.close();
            let dispatcher_duration = dispatcher_start.elapsed();

            let traditional_log_file = dir.path().join("log4rs.log").to_str().unwrap().to_string();
            setup_log4rs(&traditional_log_file);

            let traditional_start = Instant::now();
            for i in 0..ITERATIONS {
                info!("iteration={}, event={}", i, event);
            }
            let traditional_duration = traditional_start.elapsed();

            println!("\nPerformance comparison ({} iterations):", ITERATIONS);
            println!("File sink: {:?}", dispatcher_duration);
            println!("log4rs file appender: {:?}", traditional_duration);

            black_box((dispatcher_duration, traditional_duration))
        });
    });

    group.finish();
}

fn bench_queue_sink(c: &mut Criterion) {
    let mut group = c.benchmark_group("Queue Sink");
    let site = CallSite::new(file!(), line!(), "bench");

    for capacity in [0i64, 256] {
        group.bench_function(format!("enqueue_capacity_{}", capacity), |b| {
            let sink = QueueSink::new();
            sink.set_max_size(capacity);
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(sink.emit(None, &site, Level::Debug1, format_args!("record {}", i)).unwrap())
            });
            sink.clear();
        });
    }

    group.finish();
}

criterion_group!(benches, bench_file_sink_vs_log4rs, bench_queue_sink);
criterion_main!(benches);
