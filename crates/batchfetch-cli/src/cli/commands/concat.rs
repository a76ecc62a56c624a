//! `batchfetch concat` – download several URLs into one file, in order.

use anyhow::{Context, Result};
use batchfetch_core::fetch;
use batchfetch_core::storage;
use batchfetch_core::transport::HttpTransport;
use std::path::Path;
use url::Url;

use super::progress_for;

pub fn run_concat(
    transport: &HttpTransport,
    urls: Vec<Url>,
    output: &Path,
    show_progress: bool,
) -> Result<()> {
    let count = urls.len();
    let (values, printer) = progress_for(show_progress);
    let result = fetch::get_list(&*values, transport, urls)
        .map_err(|e| {
            let index = e.index();
            anyhow::Error::new(e.into_error())
                .context(format!("could not determine size of source {}", index))
        })
        .and_then(|reader| storage::save(reader, output));
    if let Some(printer) = printer {
        printer.finish();
    }
    let written = result.with_context(|| format!("concatenating into {}", output.display()))?;
    tracing::info!(sources = count, path = %output.display(), bytes = written, "concat complete");
    println!("{} ({} bytes from {} sources)", output.display(), written, count);
    Ok(())
}
