//! Advisory writer lock

#![allow(clippy::result_large_err)]

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;

use crate::errors::{io_error, locked, Result};
use crate::fs::layout::StoreLayout;

/// Exclusive lock on `{dir}/_lock`, released on drop
///
/// Only writers take it. A second writer fails immediately rather than
/// waiting.
#[derive(Debug)]
pub struct WriterLock {
    file: File,
}

impl WriterLock {
    /// Try to take the writer lock for the store at `layout`
    ///
    /// # Errors
    ///
    /// Returns `Concurrency` if another writer holds the lock and `Io` if the
    /// lock file cannot be opened.
    pub fn acquire(layout: &StoreLayout) -> Result<Self> {
        let path = layout.lock_path();
        let file = open_lock_file(&path)?;
        file.try_lock_exclusive().map_err(|_| locked(layout.dir()))?;
        Ok(Self { file })
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| io_error("open_lock", path, e))
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::errors::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_second_writer_is_rejected_until_release() {
        let temp_dir = TempDir::new().unwrap();
        let layout = StoreLayout::new(temp_dir.path());

        let first = WriterLock::acquire(&layout).unwrap();
        let err = WriterLock::acquire(&layout).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Concurrency);

        drop(first);
        assert!(WriterLock::acquire(&layout).is_ok());
    }
}
