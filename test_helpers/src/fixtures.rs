//! Temporary directory trees laid out as configuration roots.
//!
//! ```
//! use test_helpers::fixtures::ConfigTree;
//!
//! # fn main() -> anyhow::Result<()> {
//! let tree = ConfigTree::new()?;
//! let path = tree.write("defaults", "settings.json", r#"{"a": 1}"#)?;
//! assert!(path.ends_with("defaults/settings.json"));
//! assert!(tree.root("defaults")?.is_dir());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A scratch directory removed when dropped.
#[derive(Debug)]
pub struct ConfigTree {
    _dir: TempDir,
    base: Utf8PathBuf,
}

impl ConfigTree {
    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|raw| anyhow!("temporary directory is not UTF-8: {}", raw.display()))?;
        Ok(Self { _dir: dir, base })
    }

    /// Base directory of the tree.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Path of the root `name`, created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn root(&self, name: &str) -> Result<Utf8PathBuf> {
        let path = self.base.join(name);
        std::fs::create_dir_all(&path).with_context(|| format!("create {path}"))?;
        Ok(path)
    }

    /// Path of `name` beneath the base; nothing is created.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.base.join(name)
    }

    /// Writes `contents` to `file` inside root `root` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or the file cannot be written.
    pub fn write(&self, root: &str, file: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root(root)?.join(file);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}
