//! Atomic write primitives
//!
//! Uses temp→fsync→rename so a reader never sees a partially written file

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sibling temp path, hidden from label-based lookups by its leading `.`
fn temp_path_for(target_path: &Path) -> PathBuf {
    let name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.tmp", name))
}

/// Atomically write bytes to a file
///
/// The temp file is synced before the rename, so once this returns the
/// target holds either its previous content or all of `content`.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_store_dir", parent, e))?;
    }

    let temp_path = temp_path_for(target_path);
    {
        let mut file =
            File::create(&temp_path).map_err(|e| io_error("create_temp", &temp_path, e))?;
        file.write_all(content)
            .map_err(|e| io_error("write_temp", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| io_error("sync_temp", &temp_path, e))?;
    }

    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", target_path, e))?;

    Ok(())
}
