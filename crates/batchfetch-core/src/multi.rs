//! Several remote sources read back to back as one stream.
//!
//! [`MultiSourceReader::open`] probes every source up front so the progress
//! total covers the whole list. Sources are then opened one at a time, only
//! when the previous one has been drained, and each is wrapped in a
//! [`TrackedReader`] that reports into the same progress sink.

use crate::progress::{Progress, ReadClose, TrackedReader};
use crate::transport::{Transport, TransportError};
use std::error::Error;
use std::fmt;
use std::io::{self, Read};

/// Errors specific to the composite reader.
#[derive(Debug, thiserror::Error)]
pub enum MultiError {
    /// `close` was called with no source open, or the reader was used after `close`.
    #[error("already closed")]
    AlreadyClosed,
    /// A source could not be opened once its turn came.
    #[error("opening source {index} failed: {source}")]
    Open {
        index: usize,
        #[source]
        source: TransportError,
    },
}

impl From<MultiError> for io::Error {
    fn from(err: MultiError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Probing a source failed while building a [`MultiSourceReader`].
///
/// The reader is still handed back (see [`ProbeError::into_reader`]): its
/// progress total only covers the sources probed before the failure.
pub struct ProbeError<R> {
    index: usize,
    error: TransportError,
    reader: R,
}

impl<R> ProbeError<R> {
    /// Position of the source whose probe failed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn error(&self) -> &TransportError {
        &self.error
    }

    pub fn into_error(self) -> TransportError {
        self.error
    }

    /// The partially usable reader.
    pub fn into_reader(self) -> R {
        self.reader
    }

    pub fn into_parts(self) -> (TransportError, R) {
        (self.error, self.reader)
    }
}

impl<R> fmt::Debug for ProbeError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeError")
            .field("index", &self.index)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<R> fmt::Display for ProbeError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "probing source {} failed: {}", self.index, self.error)
    }
}

impl<R> Error for ProbeError<R> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Sum of the probed lengths of `sources`, in order. On failure returns the
/// partial sum with the failing index and error.
pub(crate) fn probe_total<T: Transport>(
    transport: &T,
    sources: &[T::Source],
) -> (u64, Option<(usize, TransportError)>) {
    let mut total = 0u64;
    for (index, source) in sources.iter().enumerate() {
        match transport.probe_length(source) {
            Ok(len) => total = total.saturating_add(len),
            Err(e) => return (total, Some((index, e))),
        }
    }
    (total, None)
}

/// Reads `sources` in order as one continuous stream.
///
/// Only one source is open at a time. End-of-data is reported once, after
/// the last source has been drained; a zero-length source is opened and
/// drained like any other.
pub struct MultiSourceReader<T: Transport, P> {
    transport: T,
    progress: P,
    sources: Vec<T::Source>,
    /// Index of the next source to open.
    next: usize,
    current: Option<TrackedReader<T::Body, P>>,
    closed: bool,
}

impl<T, P> MultiSourceReader<T, P>
where
    T: Transport,
    P: Progress + Clone,
{
    /// Probes every source, sets the summed total on `progress`, and returns
    /// the reader positioned before the first source.
    pub fn open(
        transport: T,
        progress: P,
        sources: Vec<T::Source>,
    ) -> Result<Self, ProbeError<Self>> {
        let (total, failure) = probe_total(&transport, &sources);
        progress.set(total);
        let reader = Self {
            transport,
            progress,
            sources,
            next: 0,
            current: None,
            closed: false,
        };
        match failure {
            None => {
                tracing::debug!(sources = reader.sources.len(), total, "multi-source stream ready");
                Ok(reader)
            }
            Some((index, error)) => {
                tracing::debug!(index, "probe failed: {}", error);
                Err(ProbeError {
                    index,
                    error,
                    reader,
                })
            }
        }
    }

    /// Number of sources not yet opened.
    pub fn remaining(&self) -> usize {
        self.sources.len() - self.next
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Opens the next source. `Ok(false)` when there is none left.
    fn open_next(&mut self) -> Result<bool, MultiError> {
        let Some(source) = self.sources.get(self.next) else {
            return Ok(false);
        };
        let index = self.next;
        self.next += 1;
        let response = self
            .transport
            .open(source)
            .map_err(|source| MultiError::Open { index, source })?;
        tracing::debug!(index, ?source, "opened source");
        self.current = Some(TrackedReader::new(self.progress.clone(), response.body));
        Ok(true)
    }
}

impl<T, P> Read for MultiSourceReader<T, P>
where
    T: Transport,
    P: Progress + Clone,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(MultiError::AlreadyClosed.into());
        }
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let current = match self.current.as_mut() {
                Some(current) => current,
                None => {
                    if !self.open_next()? {
                        return Ok(0);
                    }
                    continue;
                }
            };
            let n = current.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            // drained: release it and move on within this call
            if let Some(mut done) = self.current.take() {
                done.close()?;
            }
        }
    }
}

impl<T, P> ReadClose for MultiSourceReader<T, P>
where
    T: Transport,
    P: Progress + Clone,
{
    /// Closes the open source, if any, and abandons the rest of the list.
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.next = self.sources.len();
        match self.current.take() {
            Some(mut current) => current.close(),
            None => Err(MultiError::AlreadyClosed.into()),
        }
    }
}

impl<T, P> fmt::Debug for MultiSourceReader<T, P>
where
    T: Transport,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSourceReader")
            .field("sources", &self.sources)
            .field("next", &self.next)
            .field("streaming", &self.current.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

/// True if `err` is the [`MultiError::AlreadyClosed`] condition.
pub fn is_already_closed(err: &io::Error) -> bool {
    err.get_ref()
        .and_then(|e| e.downcast_ref::<MultiError>())
        .map_or(false, |e| matches!(e, MultiError::AlreadyClosed))
}
