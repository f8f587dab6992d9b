//! Settings file location and loading.
//!
//! The file is JSON. A missing file is not an error (defaults apply); a
//! malformed one is reported so the caller can log it and carry on.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "config.json";

/// `<platform config dir>/ghostcursor/config.json`.
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("dev", "ghostcursor", "ghostcursor").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join(SETTINGS_FILE_NAME))
}

/// Read and parse `path`. Returns `T::default()` if the file does not exist.
pub fn load_settings<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_settings(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse settings text. Blank text counts as an empty object.
pub fn parse_settings<T>(text: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(text)
}

/// Load, logging and falling back to defaults on any failure.
pub fn load_settings_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    load_settings(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using default settings");
        T::default()
    })
}
