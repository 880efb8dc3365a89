// src/data_struct.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DOWNLOADER: &str = "./fanbox-dl";
pub const DEFAULT_USERNAME: &str = "Fanbox-dl-auto";
pub const DEFAULT_AVATAR_URL: &str = "https://avatars.githubusercontent.com/u/17667652?v=4";
pub const DEFAULT_PREVIEW_LIMIT: usize = 15;

/// Process-wide settings read from `config.json`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub webhook_url: String,
    #[serde(rename = "archiveBaseURL")]
    pub archive_base_url: String,
    pub archive_base_path: PathBuf,
    /// Private working directory for archives in progress; same filesystem as `archive_base_path`.
    #[serde(default)]
    pub archive_staging_path: Option<PathBuf>,
    #[serde(default)]
    pub images_dir: Option<PathBuf>,
    #[serde(default = "default_downloader")]
    pub downloader_path: PathBuf,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,
}

impl Config {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

fn default_downloader() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOADER)
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_avatar_url() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

fn default_download_timeout() -> u64 {
    60 * 60
}

fn default_webhook_timeout() -> u64 {
    30
}

/// One tracked creator from `creators.json`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatorEntry {
    pub name: String,
    pub session_id: String,
    pub url: String,
    pub banner: String,
    pub logo: String,
    pub archive: bool,
}
