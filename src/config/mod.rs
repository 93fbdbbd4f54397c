//! Store settings and the host side of store configuration.
//!
//! The store is told which file to use through a [`SettingsHost`]. Hosts
//! hand replacement settings to the store through a [`SettingsApplier`],
//! which is how the backing file changes at runtime.

mod host;
mod paths;
mod settings;

#[cfg(test)]
mod tests;

pub use host::{FixedSettings, SettingsApplier, SettingsHost, TomlSettingsHost};
pub use paths::ConfigPaths;
pub use settings::StoreSettings;
