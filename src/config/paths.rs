use std::{
    env,
    io::{Error, ErrorKind},
    path::PathBuf,
};

/// Utility struct for locating the CLI's settings, store and log files
///
/// Follows the XDG Base Directory specification
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory path for the application
    ///
    /// - First checks `XDG_CONFIG_HOME`
    /// - Falls back to `$HOME/.config`
    /// - Appends "jsonstore" to the base config directory
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` environment variables are set
    pub fn config_dir() -> Result<PathBuf, Error> {
        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join("jsonstore"))
    }

    /// Returns the path to the settings file naming the store
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    pub fn settings_file() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }

    /// Returns the store file used when the settings name none
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    pub fn default_store() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("store.json"))
    }

    /// Get the application log directory
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if the directory cannot be determined or created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let log_dir = Self::config_dir()?.join("logs");

        if !log_dir.exists() {
            std::fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }
}
