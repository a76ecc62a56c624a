//! Batch processing of independent jobs.
//!
//! Every job is executed, in order, whether or not an earlier one failed.
//! Failures are collected into a [`BatchError`] that records the position and
//! cause of each failed job; a batch without failures returns `Ok(())`.

use std::error::Error;
use std::fmt;

/// One item in a list of (usually similar) things that are processed as a batch.
pub trait Job {
    type Error;

    /// Called exactly once by [`process`].
    fn execute(&mut self) -> Result<(), Self::Error>;
}

/// Wraps a standalone closure as a [`Job`].
pub struct JobFn<F>(pub F);

impl<F, E> Job for JobFn<F>
where
    F: FnMut() -> Result<(), E>,
{
    type Error = E;

    fn execute(&mut self) -> Result<(), E> {
        (self.0)()
    }
}

impl<J: Job + ?Sized> Job for Box<J> {
    type Error = J::Error;

    fn execute(&mut self) -> Result<(), J::Error> {
        (**self).execute()
    }
}

impl<J: Job + ?Sized> Job for &mut J {
    type Error = J::Error;

    fn execute(&mut self) -> Result<(), J::Error> {
        (**self).execute()
    }
}

/// Failure of a single job: its index in the list passed to [`process`] and
/// the error its `execute` returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError<E> {
    pub index: usize,
    pub cause: E,
}

impl<E: fmt::Display> fmt::Display for JobError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl<E: Error + 'static> Error for JobError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.source()
    }
}

/// Returned by [`process`] when one or more jobs failed. Never empty.
///
/// `Display` reports only the number of failures; the alternate form (`{:#}`)
/// lists every failure on its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError<E> {
    errors: Vec<JobError<E>>,
}

impl<E> BatchError<E> {
    /// Failed jobs in ascending index order.
    pub fn errors(&self) -> &[JobError<E>] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<JobError<E>> {
        self.errors
    }

    /// Number of failed jobs (at least 1).
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; a `BatchError` is only built when something failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for BatchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for err in &self.errors {
                writeln!(f, "job {}: {}", err.index, err.cause)?;
            }
            return Ok(());
        }
        let noun = if self.errors.len() > 1 { "errors" } else { "error" };
        write!(
            f,
            "{} {} occurred during batch processing",
            self.errors.len(),
            noun
        )
    }
}

impl<E: fmt::Debug + fmt::Display> Error for BatchError<E> {}

/// Executes every job in order and collects the failures.
///
/// Jobs are never skipped: a failure is recorded as a [`JobError`] and the
/// next job runs. Returns `Ok(())` if every job succeeded.
pub fn process<I>(jobs: I) -> Result<(), BatchError<<I::Item as Job>::Error>>
where
    I: IntoIterator,
    I::Item: Job,
{
    let mut errors = Vec::new();
    for (index, mut job) in jobs.into_iter().enumerate() {
        if let Err(cause) = job.execute() {
            tracing::debug!(index, "batch job failed");
            errors.push(JobError { index, cause });
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BatchError { errors })
    }
}
