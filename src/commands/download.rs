// src/commands/download.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use log::warn;
use tokio::process::Command;
use tokio::runtime::Builder;

use crate::data_struct::CreatorEntry;
use crate::error::DownloadError;

/// Fetches a creator's posts into `save_dir/<creator name>`.
pub trait Downloader {
    fn download(
        &self,
        creator: &CreatorEntry,
        save_dir: &Path,
        force_all: bool,
    ) -> Result<(), DownloadError>;
}

/// Runs the external fanbox-dl binary.
pub struct FanboxDownloader {
    program: PathBuf,
    timeout: Duration,
}

impl FanboxDownloader {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

/// `--skip-files --sessid <id> --creator <name> --save-dir <dir> [--all]`
pub fn build_args(session_id: &str, creator: &str, save_dir: &Path, force_all: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--skip-files".into(),
        "--sessid".into(),
        session_id.into(),
        "--creator".into(),
        creator.into(),
        "--save-dir".into(),
        save_dir.into(),
    ];

    if force_all {
        args.push("--all".into());
    }

    args
}

impl FanboxDownloader {
    async fn run(&self, args: Vec<OsString>) -> Result<(), DownloadError> {
        let io_err = |source| DownloadError::Io {
            program: self.program.clone(),
            source,
        };

        // stdout/stderr are inherited so progress shows up live
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(io_err)?;

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(res) => res.map_err(io_err)?,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("Could not kill {}: {}", self.program.display(), e);
                }
                return Err(DownloadError::TimedOut {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(DownloadError::Failed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

impl Downloader for FanboxDownloader {
    fn download(
        &self,
        creator: &CreatorEntry,
        save_dir: &Path,
        force_all: bool,
    ) -> Result<(), DownloadError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| DownloadError::Io {
                program: self.program.clone(),
                source,
            })?;

        let args = build_args(&creator.session_id, &creator.name, save_dir, force_all);
        runtime.block_on(self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> CreatorEntry {
        CreatorEntry {
            name: "alice".into(),
            session_id: "123_secret".into(),
            url: "https://alice.fanbox.cc".into(),
            banner: "https://img/banner.png".into(),
            logo: "https://img/logo.png".into(),
            archive: false,
        }
    }

    #[test]
    fn args_without_force() {
        let args = build_args("sid", "alice", Path::new("/data/images"), false);
        let expected: Vec<OsString> = [
            "--skip-files", "--sessid", "sid", "--creator", "alice", "--save-dir", "/data/images",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn force_appends_all() {
        let args = build_args("sid", "alice", Path::new("/data/images"), true);
        assert_eq!(args.last().unwrap(), "--all");
        assert_eq!(args.len(), 8);
    }

    #[test]
    fn missing_binary_is_io_error() {
        let downloader = FanboxDownloader::new("/nonexistent/fanbox-dl", Duration::from_secs(5));
        let err = downloader
            .download(&creator(), Path::new("/tmp"), false)
            .unwrap_err();
        assert!(matches!(err, DownloadError::Io { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;
        use tempfile::tempdir;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-dl.sh");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn zero_exit_is_success() {
            let downloader = FanboxDownloader::new("true", Duration::from_secs(5));
            downloader
                .download(&creator(), Path::new("/tmp"), false)
                .unwrap();
        }

        #[test]
        fn nonzero_exit_is_failure() {
            let downloader = FanboxDownloader::new("false", Duration::from_secs(5));
            let err = downloader
                .download(&creator(), Path::new("/tmp"), false)
                .unwrap_err();
            assert!(matches!(err, DownloadError::Failed { .. }));
        }

        #[test]
        fn passes_arguments_through() {
            let dir = tempdir().unwrap();
            let out = dir.path().join("args.txt");
            let program = script(dir.path(), &format!("echo \"$@\" > {}", out.display()));

            FanboxDownloader::new(program, Duration::from_secs(5))
                .download(&creator(), Path::new("/data/images"), true)
                .unwrap();

            let recorded = fs::read_to_string(out).unwrap();
            assert_eq!(
                recorded.trim(),
                "--skip-files --sessid 123_secret --creator alice --save-dir /data/images --all"
            );
        }

        #[test]
        fn hung_process_is_killed() {
            let dir = tempdir().unwrap();
            let program = script(dir.path(), "exec sleep 30");

            let started = Instant::now();
            let err = FanboxDownloader::new(program, Duration::from_millis(300))
                .download(&creator(), Path::new("/tmp"), false)
                .unwrap_err();

            assert!(matches!(err, DownloadError::TimedOut { .. }));
            assert!(started.elapsed() < Duration::from_secs(10));
        }
    }
}
