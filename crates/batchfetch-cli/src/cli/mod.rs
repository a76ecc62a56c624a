//! CLI for batchfetch.

mod commands;
mod progress;

use anyhow::Result;
use batchfetch_core::config;
use batchfetch_core::transport::HttpTransport;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use commands::{run_batch, run_concat, run_get, run_size};

/// Top-level CLI for batchfetch.
#[derive(Debug, Parser)]
#[command(name = "batchfetch")]
#[command(about = "batchfetch: download files one by one, concatenated, or as a batch", long_about = None)]
pub struct Cli {
    /// Do not print transfer progress.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one URL to a file.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: Url,
        /// Output file (default: name derived from the URL).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Download several URLs back to back into a single file.
    Concat {
        /// URLs in the order their bodies should appear.
        #[arg(required = true)]
        urls: Vec<Url>,
        /// Output file.
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },

    /// Download several URLs into separate files; failures do not stop the rest.
    Batch {
        /// URLs to download.
        #[arg(required = true)]
        urls: Vec<Url>,
        /// Directory for the downloaded files (default: current directory).
        #[arg(short = 'd', long = "dir", value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the combined size of the given URLs (HEAD requests only).
    Size {
        #[arg(required = true)]
        urls: Vec<Url>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let transport = HttpTransport::new(cfg.http_options());
        let show_progress = !cli.quiet;

        match cli.command {
            CliCommand::Get { url, output } => {
                run_get(&transport, &url, output.as_deref(), show_progress)?
            }
            CliCommand::Concat { urls, output } => {
                run_concat(&transport, urls, &output, show_progress)?
            }
            CliCommand::Batch { urls, dir } => {
                let dir = match dir {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                run_batch(&transport, &urls, &dir, show_progress)?
            }
            CliCommand::Size { urls } => run_size(&transport, &urls)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
