//! Batch and sequence runners, progress tracking, and a lazily opened
//! multi-source download stream.

pub mod config;
pub mod fetch;
pub mod logging;
pub mod multi;
pub mod process;
pub mod progress;
pub mod sequence;
pub mod storage;
pub mod transport;
pub mod url_model;

pub use multi::{MultiError, MultiSourceReader, ProbeError};
pub use process::{process, BatchError, Job, JobError, JobFn};
pub use progress::{Progress, ProgressValues, ReadClose, TrackedReader};
pub use sequence::{sequence, SequenceError, Step};
pub use transport::{HttpTransport, Response, Transport, TransportError};
