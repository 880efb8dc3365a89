// src/commands/config.rs
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::data_struct::{Config, CreatorEntry};
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "config.json";
pub const CREATORS_FILE: &str = "creators.json";

/// Read and deserialize one JSON file. Missing and malformed files are both fatal.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = read_json(path)?;

    if config.webhook_url.trim().is_empty() {
        return Err(ConfigError::Invalid("webhookUrl must not be empty".into()));
    }

    Ok(config)
}

pub fn load_creators(path: &Path) -> Result<Vec<CreatorEntry>, ConfigError> {
    let creators: Vec<CreatorEntry> = read_json(path)?;

    let mut seen = HashSet::new();
    for creator in &creators {
        let name = creator.name.as_str();
        if name.is_empty() || name == "." || name == ".." {
            return Err(ConfigError::Invalid(format!("invalid creator name '{name}'")));
        }
        // the name becomes a directory under imagesDir
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "creator name '{name}' must not contain path separators"
            )));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Invalid(format!("duplicate creator '{name}'")));
        }
    }

    Ok(creators)
}

/// Load both files from `dir`, config first.
pub fn load_all(dir: &Path) -> Result<(Config, Vec<CreatorEntry>), ConfigError> {
    let config = load_config(&dir.join(CONFIG_FILE))?;
    let creators = load_creators(&dir.join(CREATORS_FILE))?;
    Ok((config, creators))
}
