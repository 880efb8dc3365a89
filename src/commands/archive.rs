// src/commands/archive.rs
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use uuid::Uuid;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::ArchiveError;

/// Deflate at its best ratio.
const COMPRESSION_LEVEL: i32 = 9;

/// Publishes zips of new files under `base_path`, reachable at `base_url`.
/// Archives are assembled in `staging_dir`, which must share a filesystem with `base_path`.
pub struct Archiver {
    base_path: PathBuf,
    staging_dir: PathBuf,
    base_url: String,
}

impl Archiver {
    pub fn new(
        base_path: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            staging_dir: staging_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Zip `files` from `source_dir` and return the public download link.
    pub fn publish(
        &self,
        creator: &str,
        files: &[OsString],
        source_dir: &Path,
    ) -> Result<String, ArchiveError> {
        let name = archive_name(creator);
        let destination = self.base_path.join(&name);

        info!("Creating archive for {}...", creator);
        create_archive(files, source_dir, &destination, &self.staging_dir)?;
        info!(
            "Archive for {} created successfully! -> {}",
            creator,
            destination.display()
        );

        Ok(archive_url(&self.base_url, &name))
    }
}

/// Hidden sibling of the public directory: `/srv/www/zips` -> `/srv/www/.zips.staging`.
pub fn default_staging_dir(base_path: &Path) -> PathBuf {
    let name = base_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "archives".to_string());
    let parent = base_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    parent.join(format!(".{name}.staging"))
}

/// Unique per call so retried or overlapping runs never collide.
pub fn archive_name(creator: &str) -> String {
    format!("{}_new_images-{}.zip", creator, Uuid::new_v4())
}

pub fn archive_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}

/// Strip any path components so an entry can't escape the extraction dir.
fn entry_name(file: &OsStr) -> Option<String> {
    Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}

fn write_zip(files: &[OsString], source_dir: &Path, out: &File) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .unix_permissions(0o644);

    for file in files {
        let path = source_dir.join(file);
        let source_err = |source| ArchiveError::Source {
            path: path.clone(),
            source,
        };

        let name = entry_name(file).ok_or_else(|| {
            source_err(io::Error::new(io::ErrorKind::InvalidInput, "not a file name"))
        })?;
        let mut src = File::open(&path).map_err(source_err)?;

        zip.start_file(name, options)?;
        io::copy(&mut src, &mut zip).map_err(source_err)?;
    }

    zip.finish()?;
    Ok(())
}

/// Build the zip in `staging_dir` and rename it to `destination` once complete.
/// Nothing ever exists at `destination` unless the whole archive was written.
pub fn create_archive(
    files: &[OsString],
    source_dir: &Path,
    destination: &Path,
    staging_dir: &Path,
) -> Result<(), ArchiveError> {
    let staging_err = |source| ArchiveError::Write {
        path: staging_dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(staging_dir).map_err(staging_err)?;
    let tmp = tempfile::Builder::new()
        .suffix(".zip.part")
        .tempfile_in(staging_dir)
        .map_err(staging_err)?;

    write_zip(files, source_dir, tmp.as_file())?;
    tmp.as_file().sync_all().map_err(staging_err)?;

    // dropping the temp file on failure removes it
    tmp.persist(destination)
        .map_err(|e| ArchiveError::Write {
            path: destination.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}
