//! Terminal progress line, refreshed from a shared [`ProgressValues`].

use batchfetch_core::ProgressValues;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL_MS: u64 = 500;
const MIB: f64 = 1_048_576.0;

/// Polls a [`ProgressValues`] on a background thread and redraws one status
/// line on stderr until [`ProgressPrinter::finish`] is called.
///
/// The sink's finished flag is not used to stop: a multi-source stream
/// raises it at the end of every source.
pub struct ProgressPrinter {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressPrinter {
    pub fn spawn(values: Arc<ProgressValues>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let started = Instant::now();
            loop {
                let done = stop_flag.load(Ordering::Acquire);
                eprint!("\r{}", format_line(&values, started.elapsed()));
                if done {
                    eprintln!();
                    break;
                }
                thread::sleep(Duration::from_millis(PROGRESS_INTERVAL_MS));
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Draws the final line and waits for the printer thread.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressPrinter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One status line: bytes done, total and percentage when known, and rate.
pub fn format_line(values: &ProgressValues, elapsed: Duration) -> String {
    let done = values.current();
    let done_mib = done as f64 / MIB;
    let secs = elapsed.as_secs_f64();
    let rate_mib = if secs > 0.0 { done as f64 / secs / MIB } else { 0.0 };
    match (values.total(), values.fraction()) {
        (Some(total), Some(fraction)) => format!(
            "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ",
            done_mib,
            total as f64 / MIB,
            fraction * 100.0,
            rate_mib
        ),
        _ => format!("  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib),
    }
}
