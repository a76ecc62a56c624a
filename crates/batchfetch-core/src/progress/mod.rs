//! Progress reporting for streamed transfers.
//!
//! A [`Progress`] sink receives the expected total and the bytes consumed so
//! far. [`TrackedReader`] feeds a sink while a stream is read.

mod tracked;

pub use tracked::{ReadClose, TrackedReader};

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Anything that can monitor progress, such as a progress bar.
///
/// Methods take `&self` so that one sink can be handed to several readers in turn.
pub trait Progress {
    /// Sets (or overwrites) the expected total.
    fn set(&self, total: u64);
    /// Adds `delta` to the current value.
    fn add(&self, delta: u64);
    /// Replaces the current value.
    fn update(&self, current: u64);
    /// Marks completion. Must not touch the current value: a transfer can
    /// finish early after a failure.
    fn finish(&self);
}

impl<P: Progress + ?Sized> Progress for &P {
    fn set(&self, total: u64) {
        (**self).set(total)
    }
    fn add(&self, delta: u64) {
        (**self).add(delta)
    }
    fn update(&self, current: u64) {
        (**self).update(current)
    }
    fn finish(&self) {
        (**self).finish()
    }
}

impl<P: Progress + ?Sized> Progress for Box<P> {
    fn set(&self, total: u64) {
        (**self).set(total)
    }
    fn add(&self, delta: u64) {
        (**self).add(delta)
    }
    fn update(&self, current: u64) {
        (**self).update(current)
    }
    fn finish(&self) {
        (**self).finish()
    }
}

impl<P: Progress + ?Sized> Progress for Rc<P> {
    fn set(&self, total: u64) {
        (**self).set(total)
    }
    fn add(&self, delta: u64) {
        (**self).add(delta)
    }
    fn update(&self, current: u64) {
        (**self).update(current)
    }
    fn finish(&self) {
        (**self).finish()
    }
}

impl<P: Progress + ?Sized> Progress for Arc<P> {
    fn set(&self, total: u64) {
        (**self).set(total)
    }
    fn add(&self, delta: u64) {
        (**self).add(delta)
    }
    fn update(&self, current: u64) {
        (**self).update(current)
    }
    fn finish(&self) {
        (**self).finish()
    }
}

/// [`Progress`] implementation that simply stores the values.
///
/// Backed by atomics so a reporter thread can poll it while the transfer
/// runs on another.
#[derive(Debug, Default)]
pub struct ProgressValues {
    total: AtomicU64,
    total_known: AtomicBool,
    current: AtomicU64,
    finished: AtomicBool,
}

impl ProgressValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected total, or `None` until [`Progress::set`] is called.
    pub fn total(&self) -> Option<u64> {
        if self.total_known.load(Ordering::Acquire) {
            Some(self.total.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    /// Fraction complete in [0.0, 1.0], or `None` while the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total()?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.current() as f64 / total as f64).min(1.0))
    }
}

impl Progress for ProgressValues {
    fn set(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.total_known.store(true, Ordering::Release);
    }

    fn add(&self, delta: u64) {
        self.current.fetch_add(delta, Ordering::Relaxed);
    }

    fn update(&self, current: u64) {
        self.current.store(current, Ordering::Relaxed);
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_unknown_total() {
        let pv = ProgressValues::new();
        assert_eq!(pv.total(), None);
        assert_eq!(pv.current(), 0);
        assert!(!pv.is_finished());
        assert_eq!(pv.fraction(), None);
    }

    #[test]
    fn set_can_be_called_again() {
        let pv = ProgressValues::new();
        pv.set(10);
        pv.set(1024);
        assert_eq!(pv.total(), Some(1024));
    }

    #[test]
    fn add_and_update() {
        let pv = ProgressValues::new();
        pv.add(5);
        pv.add(7);
        assert_eq!(pv.current(), 12);
        pv.update(2022);
        assert_eq!(pv.current(), 2022);
        pv.update(0);
        assert_eq!(pv.current(), 0);
    }

    #[test]
    fn finish_keeps_current() {
        let pv = ProgressValues::new();
        pv.set(100);
        pv.add(40);
        pv.finish();
        assert!(pv.is_finished());
        assert_eq!(pv.current(), 40);
    }

    #[test]
    fn fraction_clamps_and_handles_zero_total() {
        let pv = ProgressValues::new();
        pv.set(0);
        assert_eq!(pv.fraction(), Some(1.0));
        pv.set(4);
        pv.add(2);
        assert_eq!(pv.fraction(), Some(0.5));
        pv.add(10);
        assert_eq!(pv.fraction(), Some(1.0));
    }

    #[test]
    fn shared_handles_update_one_sink() {
        let pv = Arc::new(ProgressValues::new());
        let a = Arc::clone(&pv);
        let b = &*pv;
        a.add(3);
        b.add(4);
        assert_eq!(pv.current(), 7);
    }
}
