use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::store::{Result, StoreError};

/// Settings the host delivers to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backing file of the store. `None` leaves the store without a target.
    pub filename: Option<PathBuf>,
}

/// On-disk layout of a settings file: a `[store]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    store: StoreSettings,
}

impl StoreSettings {
    /// Creates settings pointing at `filename`.
    pub fn with_filename(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
        }
    }

    /// Parses settings from TOML content.
    ///
    /// A relative `filename` is resolved against `base_dir` when given.
    ///
    /// # Errors
    /// Returns `StoreError::Settings` if the content is not valid TOML or
    /// does not match the settings layout.
    pub fn from_toml_str(content: &str, location: &Path, base_dir: Option<&Path>) -> Result<Self> {
        let file: SettingsFile = toml::from_str(content).map_err(|e| StoreError::Settings {
            path: location.to_path_buf(),
            details: e.to_string(),
        })?;

        let mut settings = file.store;
        if let (Some(filename), Some(base)) = (&settings.filename, base_dir) {
            if filename.is_relative() {
                settings.filename = Some(base.join(filename));
            }
        }

        Ok(settings)
    }

    /// Loads settings from a TOML settings file.
    ///
    /// Returns `None` if the file does not exist. Relative store paths are
    /// resolved against the settings file's directory.
    ///
    /// # Errors
    /// Returns `StoreError::Settings` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Settings {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                });
            }
        };

        Self::from_toml_str(&content, path, path.parent()).map(Some)
    }
}
