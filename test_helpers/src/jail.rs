//! Environment isolation built on `figment::Jail`.

use anyhow::{Result, anyhow};

/// Runs `f` with the given environment variables set inside a
/// [`figment::Jail`], returning the closure's output.
///
/// The jail serialises access to the process environment and restores it once
/// the closure completes, even when the closure fails.
///
/// # Errors
///
/// Returns an error if the jail fails or the closure returns an error.
pub fn with_env<F, T>(vars: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (key, value) in vars {
            jail.set_env(key, value);
        }
        output = Some(f().map_err(|err| figment::Error::from(err.to_string()))?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}
