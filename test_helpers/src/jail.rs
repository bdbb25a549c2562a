//! `figment::Jail` adapters.
//!
//! A jail runs its closure inside a fresh temporary working directory and
//! restores every environment variable it set once the closure returns. Only
//! one jail runs at a time.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] and returns its output.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
///
/// # Examples
///
/// ```
/// use test_helpers::jail::with_jail;
///
/// # fn main() -> anyhow::Result<()> {
/// let seen = with_jail(|jail| {
///     jail.set_env("STRATA_DOC_VALUE", "on");
///     Ok(std::env::var("STRATA_DOC_VALUE").ok())
/// })?;
/// assert_eq!(seen.as_deref(), Some("on"));
/// # Ok(())
/// # }
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Turns a displayable error into a jail failure so `?` works inside
/// [`with_jail`] closures.
///
/// # Examples
///
/// ```
/// use test_helpers::jail::{jail_error, with_jail};
///
/// let outcome = with_jail(|_| -> figment::error::Result<()> {
///     "x".parse::<u8>().map_err(jail_error)?;
///     Ok(())
/// });
/// assert!(outcome.is_err());
/// ```
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a map_err adapter, which hands over the error by value"
)]
pub fn jail_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
