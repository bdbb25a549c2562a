//! Filesystem access for configuration sources.
//!
//! Files are read through a `cap-std` handle on their parent directory. Each
//! read acquires the file, reads it fully and releases it before any parsing
//! happens.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::{StrataError, StrataResult};

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` and return it with the file name.
///
/// Yields `Ok(None)` when the parent directory does not exist.
fn open_parent(path: &Utf8Path) -> StrataResult<Option<(Dir, &str)>> {
    let Some(file_name) = path.file_name() else {
        return Ok(None);
    };
    match Dir::open_ambient_dir(parent_or_dot(path), ambient_authority()) {
        Ok(dir) => Ok(Some((dir, file_name))),
        Err(err) if is_absent(&err) => Ok(None),
        Err(err) => Err(StrataError::file(path, err)),
    }
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Returns `true` when `path` names an existing regular file.
///
/// # Errors
///
/// Returns [`StrataError::File`] when the file system refuses the lookup for
/// a reason other than absence.
pub(crate) fn exists(path: &Utf8Path) -> StrataResult<bool> {
    let Some((dir, name)) = open_parent(path)? else {
        return Ok(false);
    };
    match dir.metadata(name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if is_absent(&err) => Ok(false),
        Err(err) => Err(StrataError::file(path, err)),
    }
}

/// Read the full content of `path`.
///
/// Yields `Ok(None)` when the file does not exist or is not a regular file.
///
/// # Errors
///
/// Returns [`StrataError::File`] for any other IO failure, including
/// content that is not valid UTF-8.
pub(crate) fn read(path: &Utf8Path) -> StrataResult<Option<String>> {
    if !exists(path)? {
        return Ok(None);
    }
    let Some((dir, name)) = open_parent(path)? else {
        return Ok(None);
    };
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if is_absent(&err) => Ok(None),
        Err(err) => Err(StrataError::file(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, anyhow, ensure};
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8_root(dir: &TempDir) -> Result<Utf8PathBuf> {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary directory is not UTF-8: {path:?}"))
    }

    #[rstest]
    #[case("a/b.toml", "a")]
    #[case("b.toml", ".")]
    #[case("/b.toml", "/")]
    fn parent_falls_back_to_dot(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(parent_or_dot(Utf8Path::new(path)), Utf8Path::new(expected));
    }

    #[test]
    fn reads_existing_file() -> Result<()> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = utf8_root(&dir)?;
        let file = root.join("settings.json");
        std::fs::write(&file, "{\"a\": 1}").context("write settings")?;
        let contents = read(&file).map_err(|err| anyhow!(err.to_string()))?;
        ensure!(contents.as_deref() == Some("{\"a\": 1}"), "got {contents:?}");
        Ok(())
    }

    #[rstest]
    #[case("missing.json")]
    #[case("no/such/dir/missing.json")]
    fn absent_paths_read_as_none(#[case] relative: &str) -> Result<()> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = utf8_root(&dir)?;
        let path = root.join(relative);
        ensure!(!exists(&path).map_err(|err| anyhow!(err.to_string()))?, "{path} exists");
        let contents = read(&path).map_err(|err| anyhow!(err.to_string()))?;
        ensure!(contents.is_none(), "expected no content for {path}");
        Ok(())
    }

    #[test]
    fn directories_are_not_sources() -> Result<()> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = utf8_root(&dir)?;
        let nested = root.join("settings.json");
        std::fs::create_dir(&nested).context("create directory named like a file")?;
        ensure!(!exists(&nested).map_err(|err| anyhow!(err.to_string()))?, "directory counted as file");
        Ok(())
    }

    #[test]
    fn parent_that_is_a_file_reads_as_absent() -> Result<()> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = utf8_root(&dir)?;
        let blocker = root.join("blocker");
        std::fs::write(&blocker, "").context("write blocker file")?;
        let path = blocker.join("settings.json");
        let contents = read(&path).map_err(|err| anyhow!(err.to_string()))?;
        ensure!(contents.is_none(), "expected no content under a file parent");
        Ok(())
    }
}
