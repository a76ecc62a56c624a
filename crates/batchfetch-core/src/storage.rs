//! Writing a stream to disk.
//!
//! Data goes to `<path>.part` first and is renamed into place only after it
//! has been fully copied and synced, so a failed transfer never leaves a
//! truncated file under the final name.

use crate::multi::is_already_closed;
use crate::progress::ReadClose;
use crate::sequence::{sequence, Step};
use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Copies `reader` into `path` and returns the number of bytes written.
///
/// The reader is closed afterwards whether or not the copy succeeded.
/// On failure the temp file is removed and the error names the step
/// (create, copy, sync or rename) that failed.
pub fn save<R: ReadClose>(reader: R, path: &Path) -> Result<u64> {
    let part = temp_path(path);
    let reader = RefCell::new(reader);
    let file: RefCell<Option<File>> = RefCell::new(None);
    let written = Cell::new(0u64);

    let mut steps = [
        Step::new("create", || -> Result<()> {
            let f = File::create(&part)
                .with_context(|| format!("failed to create {}", part.display()))?;
            *file.borrow_mut() = Some(f);
            Ok(())
        }),
        Step::new("copy", || -> Result<()> {
            let mut slot = file.borrow_mut();
            let f = slot.as_mut().context("temp file not open")?;
            let n = io::copy(&mut *reader.borrow_mut(), f)?;
            written.set(n);
            Ok(())
        }),
        Step::new("sync", || -> Result<()> {
            if let Some(f) = file.borrow_mut().take() {
                f.sync_all()
                    .with_context(|| format!("failed to sync {}", part.display()))?;
            }
            Ok(())
        }),
        Step::new("rename", || -> Result<()> {
            fs::rename(&part, path).with_context(|| {
                format!("failed to rename {} to {}", part.display(), path.display())
            })?;
            Ok(())
        }),
    ];
    let result = sequence(&mut steps);
    drop(steps);

    if let Err(e) = reader.into_inner().close() {
        if !is_already_closed(&e) {
            tracing::warn!("closing stream for {} failed: {}", path.display(), e);
        }
    }

    match result {
        Ok(()) => {
            tracing::info!(bytes = written.get(), "saved {}", path.display());
            Ok(written.get())
        }
        Err(err) => {
            drop(file);
            if part.exists() {
                let _ = fs::remove_file(&part);
            }
            Err(err.cause.context(format!("{} step failed", err.step)))
        }
    }
}
