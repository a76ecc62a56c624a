//! CLI command handlers, one per file.

mod batch;
mod concat;
mod get;
mod size;

pub use batch::run_batch;
pub use concat::run_concat;
pub use get::run_get;
pub use size::run_size;

use super::progress::ProgressPrinter;
use batchfetch_core::ProgressValues;
use std::sync::Arc;

/// Fresh progress sink plus a printer for it when progress output is wanted.
pub(crate) fn progress_for(show: bool) -> (Arc<ProgressValues>, Option<ProgressPrinter>) {
    let values = Arc::new(ProgressValues::new());
    let printer = show.then(|| ProgressPrinter::spawn(Arc::clone(&values)));
    (values, printer)
}
