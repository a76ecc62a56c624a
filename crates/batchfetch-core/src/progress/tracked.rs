//! Reader adapter that reports consumed bytes to a progress sink.

use super::Progress;
use std::fs::File;
use std::io::{self, Cursor, Empty, Read};

/// A readable stream that may hold a resource worth releasing explicitly.
///
/// Readers without anything to release use the default no-op `close`.
pub trait ReadClose: Read {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ReadClose for &[u8] {}

impl<T: AsRef<[u8]>> ReadClose for Cursor<T> {}

impl ReadClose for Empty {}

impl ReadClose for File {}

impl<R: ReadClose + ?Sized> ReadClose for Box<R> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Wraps a reader and updates `progress` as it is read from.
///
/// Every successful read adds its byte count; the first end-of-data calls
/// [`Progress::finish`] (once, even if the caller keeps reading).
#[derive(Debug)]
pub struct TrackedReader<R, P> {
    inner: R,
    progress: P,
    finished: bool,
}

impl<R, P: Progress> TrackedReader<R, P> {
    pub fn new(progress: P, inner: R) -> Self {
        Self {
            inner,
            progress,
            finished: false,
        }
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, P: Progress> Read for TrackedReader<R, P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.progress.add(n as u64);
        } else if !buf.is_empty() && !self.finished {
            self.finished = true;
            self.progress.finish();
        }
        Ok(n)
    }
}

impl<R: ReadClose, P: Progress> ReadClose for TrackedReader<R, P> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}
