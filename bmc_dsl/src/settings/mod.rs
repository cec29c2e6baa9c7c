//! Settings steering the merge engine.
//!
//! Settings are layered with Figment: compiled-in defaults first, then an
//! optional TOML file named by `BMC_DSL_CONFIG_PATH`, then `BMC_DSL_*`
//! environment variables.
//!
//! ```toml
//! # bmc_dsl.toml
//! fail_for_non_mergeable = true
//! remove_absent_properties = false
//! ```

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Prefix of the environment variables read by [`MergeSettings::load`].
pub const ENV_PREFIX: &str = "BMC_DSL_";

/// Environment variable naming an optional TOML settings file.
pub const CONFIG_PATH_ENV: &str = "BMC_DSL_CONFIG_PATH";

/// Options controlling how an override is planned against its base.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Fail instead of skipping when an override targets a property that
    /// cannot be overridden, such as `Actions`.
    pub fail_for_non_mergeable: bool,
    /// Remove base properties that the override does not mention, except `Id`.
    pub remove_absent_properties: bool,
}

impl MergeSettings {
    /// Load settings from the default Figment stack.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Gathering`] when a source cannot be read or a
    /// value has the wrong type.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::figment())
    }

    /// Extract settings from a caller-supplied Figment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Gathering`] when extraction fails.
    pub fn load_from(figment: &Figment) -> Result<Self, SettingsError> {
        Ok(figment.extract()?)
    }

    /// The default Figment stack used by [`MergeSettings::load`].
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config_path"]))
    }
}
