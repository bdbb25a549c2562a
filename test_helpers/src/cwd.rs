//! Guarded working-directory changes.
//!
//! Resolvers with no registered root search the current directory, so tests
//! exercising that path move into a scratch directory first. The guard holds
//! a global mutex for its lifetime and moves back on drop.
//!
//! # Examples
//!
//! ```no_run
//! use test_helpers::cwd;
//!
//! # fn run() -> anyhow::Result<()> {
//! let guard = cwd::set_dir("/tmp/strata-scratch")?;
//! // The process now runs from `/tmp/strata-scratch`.
//! guard.restore()?;
//! # Ok(())
//! # }
//! ```

use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Mutex, MutexGuard};

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// Restores the previous working directory when dropped.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Directory that will be restored.
    #[must_use]
    pub fn original(&self) -> &Utf8Path {
        &self.original
    }

    /// Moves back to the original directory, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be entered.
    pub fn restore(&self) -> Result<()> {
        std::env::set_current_dir(&self.original)
            .with_context(|| format!("restore working directory {}", self.original))
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _unused = std::env::set_current_dir(&self.original);
    }
}

/// Enters `path`, returning a guard that moves back on drop.
///
/// The original directory is read and checked for UTF-8 before moving, so a
/// failure never leaves the process elsewhere.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or is not UTF-8,
/// or if `path` cannot be entered.
pub fn set_dir(path: impl AsRef<Utf8Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let current = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(current)
        .map_err(|raw| anyhow!("cwd is not valid UTF-8: {}", raw.display()))?;
    let target = path.as_ref();
    std::env::set_current_dir(target).with_context(|| format!("enter {target}"))?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
