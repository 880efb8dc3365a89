// src/commands/run.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::commands::archive::Archiver;
use crate::commands::diff::compute_new_files;
use crate::commands::download::Downloader;
use crate::commands::notify::Notifier;
use crate::commands::redact::redact;
use crate::commands::snapshot::snapshot;
use crate::data_struct::CreatorEntry;
use crate::error::CreatorError;

/// Terminal state of one creator's iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Notified { new_files: usize },
    /// New files were fetched but the success notification could not be delivered.
    Undelivered { new_files: usize },
    NoNewFiles,
    Failed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub notified: usize,
    pub undelivered: usize,
    pub new_files: usize,
    pub no_new_files: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Notified { new_files } => {
                self.notified += 1;
                self.new_files += new_files;
            }
            Outcome::Undelivered { new_files } => {
                self.undelivered += 1;
                self.new_files += new_files;
            }
            Outcome::NoNewFiles => self.no_new_files += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

pub struct Pipeline<'a> {
    images_dir: PathBuf,
    downloader: &'a dyn Downloader,
    archiver: &'a Archiver,
    notifier: &'a Notifier<'a>,
    force_all: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        downloader: &'a dyn Downloader,
        archiver: &'a Archiver,
        notifier: &'a Notifier<'a>,
        force_all: bool,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            downloader,
            archiver,
            notifier,
            force_all,
        }
    }

    fn creator_dir(&self, creator: &CreatorEntry) -> PathBuf {
        self.images_dir.join(&creator.name)
    }

    /// Snapshot, download, snapshot again and diff.
    fn fetch_new_files(
        &self,
        creator: &CreatorEntry,
        dir: &Path,
    ) -> Result<Vec<OsString>, CreatorError> {
        let before = snapshot(dir)?;

        info!("Downloading images for {}...", creator.name);
        self.downloader
            .download(creator, &self.images_dir, self.force_all)?;

        let after = snapshot(dir)?;
        Ok(compute_new_files(&before, &after))
    }

    fn try_process(&self, creator: &CreatorEntry) -> Result<Outcome, CreatorError> {
        let dir = self.creator_dir(creator);
        let new_files = self.fetch_new_files(creator, &dir)?;

        if new_files.is_empty() {
            info!("No new images downloaded for {}.", creator.name);
            return Ok(Outcome::NoNewFiles);
        }
        info!(
            "Images for {} downloaded successfully! ({} new)",
            creator.name,
            new_files.len()
        );

        let archive_url = if creator.archive {
            Some(self.archiver.publish(&creator.name, &new_files, &dir)?)
        } else {
            None
        };

        match self
            .notifier
            .notify_success(creator, &new_files, archive_url.as_deref())
        {
            Ok(()) => Ok(Outcome::Notified {
                new_files: new_files.len(),
            }),
            Err(e) => {
                warn!("Could not send success notification for {}: {}", creator.name, e);
                Ok(Outcome::Undelivered {
                    new_files: new_files.len(),
                })
            }
        }
    }

    /// Never fails: errors end up in the log and the error notification.
    pub fn process(&self, creator: &CreatorEntry) -> Outcome {
        match self.try_process(creator) {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = redact(&e.to_string(), &[&creator.session_id]);
                error!("Error downloading images for {}: {}", creator.name, message);

                if let Err(e) = self.notifier.notify_error(creator, &message) {
                    warn!("Could not send error notification for {}: {}", creator.name, e);
                }
                Outcome::Failed
            }
        }
    }

    /// One creator at a time; returns once every creator reached a terminal state.
    pub fn run_batch(&self, creators: &[CreatorEntry]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for creator in creators {
            let outcome = self.process(creator);
            summary.record(&outcome);
        }
        summary
    }
}
