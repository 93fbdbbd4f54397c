use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, info, instrument, warn};

use crate::store::{Result, SharedTarget};

use super::StoreSettings;

/// The host side of store configuration.
///
/// On `init`, the store hands the host its current settings together with
/// an applier. The host applies replacement settings through the applier,
/// either immediately or whenever its own configuration changes.
pub trait SettingsHost {
    /// Delivers `current` settings and accepts replacements through `applier`.
    ///
    /// # Errors
    /// Returns an error if the host cannot produce its settings.
    fn deliver(&self, current: StoreSettings, applier: SettingsApplier) -> Result<()>;
}

/// Handle that swaps the store's file target.
///
/// Cloneable and cheap; every clone reconfigures the same store.
#[derive(Clone)]
pub struct SettingsApplier {
    target: SharedTarget,
}

impl SettingsApplier {
    pub(crate) fn new(target: SharedTarget) -> Self {
        Self { target }
    }

    /// Applies a settings transition.
    ///
    /// `stale` is informational only. When `fresh` is present its filename
    /// replaces the file target before the next store access. Returns once
    /// the settings are in effect.
    #[instrument(skip_all)]
    pub fn apply(&self, stale: Option<&StoreSettings>, fresh: Option<StoreSettings>) {
        if let Some(stale) = stale {
            debug!(previous = ?stale.filename, "Replacing store settings");
        }

        if let Some(fresh) = fresh {
            info!(filename = ?fresh.filename, "Applying store settings");
            *self.target.write().unwrap_or_else(PoisonError::into_inner) = fresh.filename;
        }
    }

    /// Returns the settings currently in effect.
    pub fn current(&self) -> StoreSettings {
        StoreSettings {
            filename: self
                .target
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

/// Host that applies one fixed settings value at init.
#[derive(Debug, Clone, Default)]
pub struct FixedSettings(pub StoreSettings);

impl SettingsHost for FixedSettings {
    fn deliver(&self, current: StoreSettings, applier: SettingsApplier) -> Result<()> {
        applier.apply(Some(&current), Some(self.0.clone()));
        Ok(())
    }
}

/// Host that reads the store settings from a TOML file.
///
/// The file holds a `[store]` table with a `filename`. A missing file, or
/// one without a filename, leaves the store's current target in place.
/// Call [`reload`](Self::reload) after the file changes to reconfigure the
/// store.
pub struct TomlSettingsHost {
    path: PathBuf,
    applier: Mutex<Option<SettingsApplier>>,
}

impl TomlSettingsHost {
    /// Creates a host for the settings file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            applier: Mutex::new(None),
        }
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the settings file and applies it to the store.
    ///
    /// Returns `false` if no store has been initialized with this host yet.
    ///
    /// # Errors
    /// Returns `StoreError::Settings` if the file cannot be read or parsed;
    /// the store keeps its current target in that case.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reload(&self) -> Result<bool> {
        let Some(applier) = self
            .applier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        else {
            warn!("Settings reload requested before store init");
            return Ok(false);
        };

        let current = applier.current();
        applier.apply(Some(&current), self.read_fresh()?);
        Ok(true)
    }

    fn read_fresh(&self) -> Result<Option<StoreSettings>> {
        let fresh = StoreSettings::load(&self.path)?.filter(|s| s.filename.is_some());

        if fresh.is_none() {
            debug!("No store file named in settings, keeping current target");
        }

        Ok(fresh)
    }
}

impl SettingsHost for TomlSettingsHost {
    fn deliver(&self, current: StoreSettings, applier: SettingsApplier) -> Result<()> {
        applier.apply(Some(&current), self.read_fresh()?);

        *self.applier.lock().unwrap_or_else(PoisonError::into_inner) = Some(applier);
        Ok(())
    }
}
