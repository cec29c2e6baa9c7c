//! Shared helpers for working with `figment::Jail` in tests.
//!
//! The jail isolates the working directory and environment, so settings files
//! and `BMC_DSL_*` variables created by one test never leak into another.

use anyhow::{Result, anyhow};
use bmc_dsl::MergeSettings;

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down once the closure completes, even when it fails.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or the closure returns a
/// [`figment::error::Error`].
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Runs `setup` inside a jail and loads [`MergeSettings`] from it.
///
/// # Errors
///
/// Returns an error if `setup` fails or the settings cannot be loaded.
pub fn load_settings<F>(setup: F) -> Result<MergeSettings>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<()>,
{
    with_jail(|jail| {
        setup(jail)?;
        MergeSettings::load().map_err(figment_error)
    })
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adapter, which hands over the error by value"
)]
#[must_use]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
