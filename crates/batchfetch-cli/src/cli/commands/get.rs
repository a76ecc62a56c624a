//! `batchfetch get` – download one URL to a file.

use anyhow::Result;
use batchfetch_core::fetch;
use batchfetch_core::transport::HttpTransport;
use batchfetch_core::url_model::derive_filename;
use std::path::{Path, PathBuf};
use url::Url;

use super::progress_for;

pub fn run_get(
    transport: &HttpTransport,
    url: &Url,
    output: Option<&Path>,
    show_progress: bool,
) -> Result<()> {
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(derive_filename(url)),
    };
    let (values, printer) = progress_for(show_progress);
    let result = fetch::get_file(&*values, transport, url, &path);
    if let Some(printer) = printer {
        printer.finish();
    }
    let written = result?;
    tracing::info!(url = %url, path = %path.display(), bytes = written, "download complete");
    println!("{} ({} bytes)", path.display(), written);
    Ok(())
}
