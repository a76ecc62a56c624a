//! `batchfetch size` – print the combined size of several URLs.

use anyhow::Result;
use batchfetch_core::fetch;
use batchfetch_core::transport::HttpTransport;
use url::Url;

pub fn run_size(transport: &HttpTransport, urls: &[Url]) -> Result<()> {
    let total = fetch::total_size(transport, urls)?;
    println!("{} bytes ({:.1} MiB)", total, total as f64 / 1_048_576.0);
    Ok(())
}
