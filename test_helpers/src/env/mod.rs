//! Guarded mutation of process environment variables.
//!
//! Every mutation runs under one global re-entrant mutex and yields an
//! [`EnvVarGuard`] that puts the previous value back (or removes the
//! variable) when dropped. Guards on the same key restore in LIFO order.
//!
//! Tests that read the whole environment, such as prefix scans, should hold
//! an [`EnvScope`] so no other test mutates variables mid-read.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _guard = env::set_var("STRATA_DOC_KEY", "value");
//! assert_eq!(std::env::var("STRATA_DOC_KEY").ok().as_deref(), Some("value"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Replaces the environment entry for `key`.
///
/// # Safety
///
/// The caller must hold `ENV_MUTEX`.
unsafe fn write_entry(key: &str, value: Option<&OsStr>) {
    match value {
        // SAFETY: serialised by the caller through `ENV_MUTEX`.
        Some(val) => unsafe { env::set_var(key, val) },
        // SAFETY: serialised by the caller through `ENV_MUTEX`.
        None => unsafe { env::remove_var(key) },
    }
}

fn swap_locked(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    let original = env::var_os(&key);
    // SAFETY: every caller holds `ENV_MUTEX`.
    unsafe { write_entry(&key, value) };
    EnvVarGuard { key, original }
}

fn swap(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    swap_locked(key, value)
}

/// Restores one environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    /// Name of the guarded variable.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        let original = self.original.take();
        // SAFETY: `ENV_MUTEX` is held for the restoration.
        unsafe { write_entry(&self.key, original.as_deref()) };
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

/// Sets `key` to `value` until the returned guard drops.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    swap(key.into(), Some(value.as_ref()))
}

/// Removes `key` until the returned guard drops.
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::remove_var("STRATA_DOC_ABSENT");
/// assert!(std::env::var_os("STRATA_DOC_ABSENT").is_none());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    swap(key.into(), None)
}

/// Holds the environment lock and a set of guards for its whole lifetime.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl EnvScope {
    /// Acquires the environment lock with no guards yet.
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            _lock: ENV_MUTEX.lock(),
        }
    }

    /// Sets `key` to `value` for the lifetime of the scope.
    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        self.guards.push(swap_locked(key.into(), Some(value.as_ref())));
        self
    }

    /// Removes `key` for the lifetime of the scope.
    pub fn remove<K>(&mut self, key: K) -> &mut Self
    where
        K: Into<String>,
    {
        self.guards.push(swap_locked(key.into(), None));
        self
    }

    /// Removes every variable whose name starts with `<prefix>_`.
    ///
    /// ```
    /// use test_helpers::env::EnvScope;
    ///
    /// let _outer = test_helpers::env::set_var("STRATA_DOC_SCOPE_A", "1");
    /// let mut scope = EnvScope::new();
    /// scope.clear_prefix("STRATA_DOC_SCOPE");
    /// assert!(std::env::var_os("STRATA_DOC_SCOPE_A").is_none());
    /// ```
    pub fn clear_prefix(&mut self, prefix: &str) -> &mut Self {
        let qualified = format!("{prefix}_");
        let matching: Vec<String> = env::vars_os()
            .filter_map(|(name, _)| name.into_string().ok())
            .filter(|name| name.starts_with(&qualified))
            .collect();
        for name in matching {
            self.remove(name);
        }
        self
    }

    /// Number of guards held by the scope.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope holds no guards.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Default for EnvScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Runs `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_MUTEX.lock();
    f()
}

#[cfg(test)]
mod tests;
