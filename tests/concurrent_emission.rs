//! Concurrent emission safety.
//!
//! Many workers log at once through both a directly held handle and a
//! context-attached one. Every worker must finish and join, and every
//! emitted line must be whole: with JSON output, a torn or interleaved
//! line would fail to parse.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use ctxlog::{Context, LogConfig, Logger, Pipeline, Severity};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_concurrent_emitters_produce_whole_lines() {
    const WORKERS: usize = 5_000;
    const ENTRIES_PER_WORKER: usize = 50;

    let pipeline = Arc::new(Pipeline::new());
    let config = LogConfig {
        level: Severity::Debug,
        json_format: true,
        ..LogConfig::default()
    };
    pipeline.apply(&config);
    let buf = SharedBuf::default();
    pipeline.set_writer(Box::new(buf.clone()));

    let base = Logger::with_pipeline(pipeline).with_field("mesh", 99);
    let ctx = Context::background().with_logger(base.with_field("attached", true));

    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let base = base.clone();
            let ctx = ctx.clone();
            // Small stacks keep this many workers cheap.
            thread::Builder::new()
                .stack_size(128 * 1024)
                .spawn(move || {
                    let direct = base.with_field("worker", worker as u64);
                    for entry in 0..ENTRIES_PER_WORKER {
                        if (worker + entry) % 2 == 0 {
                            direct.info("direct entry");
                        } else {
                            ctx.logger().with_field("worker", worker as u64).debug("context entry");
                        }
                    }
                })
                .expect("spawn worker")
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker completed without panicking");
    }

    let output = String::from_utf8(buf.0.lock().unwrap().clone()).expect("output is UTF-8");
    assert!(output.ends_with('\n'));

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), WORKERS * ENTRIES_PER_WORKER);

    for line in lines {
        let record: serde_json::Value =
            serde_json::from_str(line).expect("every line is one whole JSON record");
        assert!(record.get("msg").is_some());
        assert_eq!(record["mesh"], 99);
    }
}

#[test]
fn test_default_fallback_under_concurrency() {
    // Retrieval from an unattached context must stay infallible while
    // attached contexts resolve concurrently.
    let empty = Context::background();
    let workers: Vec<_> = (0..64)
        .map(|_| {
            let empty = empty.clone();
            thread::spawn(move || {
                let _ = empty.logger();
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("fallback retrieval never panics");
    }
}
