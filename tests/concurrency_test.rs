// Concurrent use of a single logger and its derived loggers
use jlo::test_support::SharedBuffer;
use jlo::{LogLevel, Logger, clock};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn shared_logger() -> (Arc<Logger>, SharedBuffer) {
    let buf = SharedBuffer::new();
    let logger = Logger::new(buf.clone()).with_clock(clock::fixed_clock(clock::zero_instant()));
    (Arc::new(logger), buf)
}

#[test]
fn test_concurrent_writes_are_not_interleaved() {
    let (logger, buf) = shared_logger();
    let num_threads = 32;
    let per_thread = 50;
    // Long enough that a torn write would show up.
    let padding = "x".repeat(4096);

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            let padding = padding.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    jlo::infof!(logger, "thread %d record %d %s", thread_id, i, &padding);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }

    let lines = buf.lines();
    assert_eq!(lines.len(), num_threads * per_thread);

    let mut seen = HashSet::new();
    for line in &lines {
        let record: Value = serde_json::from_str(line).expect("every line is one JSON object");
        let message = record["@message"].as_str().unwrap().to_string();
        assert!(message.ends_with(&padding));
        assert!(seen.insert(message), "duplicate record");
    }
}

#[test]
fn test_concurrent_derived_loggers_share_sink() {
    let (logger, buf) = shared_logger();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let child = logger.with_field("worker", i);
                for _ in 0..20 {
                    child.infof("working", &[]);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }

    let lines = buf.json_lines();
    assert_eq!(lines.len(), 16 * 20);
    for line in &lines {
        assert!(line["worker"].is_u64());
    }
    assert!(logger.fields().is_empty());
}

#[test]
fn test_level_changes_race_with_log_calls() {
    let (logger, buf) = shared_logger();
    logger.set_log_level(LogLevel::Debug);

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..1000 {
                let level = if i % 2 == 0 { LogLevel::Error } else { LogLevel::Debug };
                logger.set_log_level(level);
            }
            logger.set_log_level(LogLevel::Debug);
        })
    };

    let loggers: Vec<_> = (0..8)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..200 {
                    logger.debugf("maybe", &[]);
                    logger.fatalf("always", &[]);
                }
            })
        })
        .collect();

    assert!(writer.join().is_ok());
    for handle in loggers {
        assert!(handle.join().is_ok());
    }

    let lines = buf.json_lines();
    let fatal = lines.iter().filter(|l| l["@level"] == "fatal").count();
    let debug = lines.iter().filter(|l| l["@level"] == "debug").count();
    assert_eq!(fatal, 8 * 200);
    assert!(debug <= 8 * 200);
    assert_eq!(lines.len(), fatal + debug);
    assert_eq!(logger.log_level(), LogLevel::Debug);
}
