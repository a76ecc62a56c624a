//! `batchfetch batch` – download several URLs into separate files.

use anyhow::Result;
use batchfetch_core::fetch;
use batchfetch_core::transport::HttpTransport;
use batchfetch_core::url_model::unique_filenames;
use std::path::{Path, PathBuf};
use url::Url;

use super::progress_for;
use crate::cli::progress::ProgressPrinter;

pub fn run_batch(
    transport: &HttpTransport,
    urls: &[Url],
    dir: &Path,
    show_progress: bool,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let targets: Vec<(Url, PathBuf)> = urls
        .iter()
        .cloned()
        .zip(unique_filenames(urls))
        .map(|(url, name)| (url, dir.join(name)))
        .collect();

    // Each target gets its own sink; the previous printer is stopped first.
    let mut current: Option<ProgressPrinter> = None;
    let result = fetch::fetch_all(transport, &targets, |index| {
        if let Some(printer) = current.take() {
            printer.finish();
        }
        if show_progress {
            eprintln!("[{}/{}] {}", index + 1, targets.len(), targets[index].0);
        }
        let (values, printer) = progress_for(show_progress);
        current = printer;
        values
    });
    if let Some(printer) = current.take() {
        printer.finish();
    }

    match result {
        Ok(()) => {
            println!("{} file(s) downloaded to {}", targets.len(), dir.display());
            Ok(())
        }
        Err(batch) => {
            for failure in batch.errors() {
                eprintln!("  {}: {:#}", targets[failure.index].0, failure.cause);
            }
            println!(
                "{} of {} file(s) downloaded to {}",
                targets.len() - batch.len(),
                targets.len(),
                dir.display()
            );
            Err(batch.into())
        }
    }
}
