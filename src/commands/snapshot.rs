// src/commands/snapshot.rs
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::SnapshotError;

/// Create the creator directory (and parents) if it doesn't exist.
pub fn ensure_directory(dir: &Path) -> Result<(), SnapshotError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(SnapshotError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|source| SnapshotError::Create {
        path: dir.to_path_buf(),
        source,
    })
}

/// Names of the regular files directly inside `dir`, sorted by name.
pub fn snapshot(dir: &Path) -> Result<Vec<OsString>, SnapshotError> {
    ensure_directory(dir)?;

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| SnapshotError::List {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() {
            names.push(entry.file_name().to_os_string());
        }
    }

    Ok(names)
}
