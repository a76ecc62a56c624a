//! High-level fetch helpers built on a [`Transport`].
//!
//! - [`get`]: one source as a progress-tracked stream.
//! - [`get_file`]: one source saved to disk.
//! - [`total_size`]: summed probe lengths of several sources.
//! - [`get_list`]: several sources as one stream (see [`MultiSourceReader`]).
//! - [`fetch_all`]: several sources saved to separate files as a batch.

use crate::multi::{probe_total, MultiSourceReader, ProbeError};
use crate::process::{process, BatchError, JobFn};
use crate::progress::{Progress, TrackedReader};
use crate::storage;
use crate::transport::{Transport, TransportError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Opens `source` and returns a reader that updates `progress` as it is read.
/// The progress total is set from the response length when the server sends one.
pub fn get<T, P>(
    progress: P,
    transport: &T,
    source: &T::Source,
) -> Result<TrackedReader<T::Body, P>, TransportError>
where
    T: Transport,
    P: Progress,
{
    let response = transport.open(source)?;
    if let Some(len) = response.content_length {
        progress.set(len);
    }
    Ok(TrackedReader::new(progress, response.body))
}

/// Downloads `source` into the file at `path`, returning the bytes written.
pub fn get_file<T, P>(progress: P, transport: &T, source: &T::Source, path: &Path) -> Result<u64>
where
    T: Transport,
    P: Progress,
{
    let reader = get(progress, transport, source)
        .with_context(|| format!("GET {:?} failed", source))?;
    storage::save(reader, path)
}

/// Sum of the expected lengths of `sources`. Stops at the first probe failure.
pub fn total_size<T: Transport>(transport: &T, sources: &[T::Source]) -> Result<u64, TransportError> {
    match probe_total(transport, sources) {
        (total, None) => Ok(total),
        (_, Some((index, e))) => {
            tracing::debug!(index, "size probe failed");
            Err(e)
        }
    }
}

/// Presents `sources` as one stream. Same as [`MultiSourceReader::open`].
#[allow(clippy::type_complexity)]
pub fn get_list<T, P>(
    progress: P,
    transport: T,
    sources: Vec<T::Source>,
) -> Result<MultiSourceReader<T, P>, ProbeError<MultiSourceReader<T, P>>>
where
    T: Transport,
    P: Progress + Clone,
{
    MultiSourceReader::open(transport, progress, sources)
}

/// Downloads every `(source, path)` target, one after the other.
///
/// A failed download does not stop the others; every failure is reported in
/// the returned [`BatchError`] with the position of its target.
/// `progress_for` is called with a target's index right before it starts.
pub fn fetch_all<T, P, F>(
    transport: &T,
    targets: &[(T::Source, PathBuf)],
    mut progress_for: F,
) -> Result<(), BatchError<anyhow::Error>>
where
    T: Transport,
    P: Progress,
    F: FnMut(usize) -> P,
{
    let jobs = targets.iter().enumerate().map(|(index, (source, path))| {
        let progress = progress_for(index);
        JobFn(move || get_file(&progress, transport, source, path).map(|_| ()))
    });
    let result = process(jobs);
    match &result {
        Ok(()) => tracing::info!(count = targets.len(), "batch complete"),
        Err(e) => tracing::warn!(failed = e.len(), count = targets.len(), "batch finished with failures"),
    }
    result
}
