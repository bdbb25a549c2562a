//! Constructors and classification helpers for `StrataError`.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use super::{SourceError, StrataError};

impl StrataError {
    /// Construct a [`StrataError::SourceNotFound`] for `path`.
    #[must_use]
    pub fn source_not_found(path: &Utf8Path) -> Arc<Self> {
        Arc::new(Self::SourceNotFound {
            path: path.to_path_buf(),
        })
    }

    /// Construct a [`StrataError::Parse`] wrapping the parser failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::{Utf8Path, Utf8PathBuf};
    /// use strata_config::StrataError;
    ///
    /// let err = StrataError::parse(Utf8Path::new("app.json"), "json", "unexpected token");
    /// assert!(matches!(&*err, StrataError::Parse { format: "json", .. }));
    /// ```
    #[must_use]
    pub fn parse(path: &Utf8Path, format: &'static str, source: impl Into<SourceError>) -> Arc<Self> {
        Arc::new(Self::Parse {
            path: path.to_path_buf(),
            format,
            source: source.into(),
        })
    }

    /// Construct a [`StrataError::File`] for an IO failure on `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, source: std::io::Error) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Construct a [`StrataError::UnsupportedFormat`] for `name`.
    #[must_use]
    pub fn unsupported_format(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::UnsupportedFormat { name: name.into() })
    }

    /// Construct a [`StrataError::KeyNotFound`] for `key`.
    #[must_use]
    pub fn key_not_found(key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::KeyNotFound { key: key.into() })
    }

    /// Construct a [`StrataError::NoConfigurationFound`] listing the
    /// candidates that were searched.
    #[must_use]
    pub fn no_configuration_found(filename: &Utf8Path, searched: Vec<Utf8PathBuf>) -> Arc<Self> {
        Arc::new(Self::NoConfigurationFound {
            filename: filename.to_path_buf(),
            searched,
        })
    }

    /// Returns `true` for errors a caller may suppress by ignoring missing
    /// sources.
    ///
    /// Malformed content is never classified as missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::{Utf8Path, Utf8PathBuf};
    /// use strata_config::StrataError;
    ///
    /// assert!(StrataError::source_not_found(Utf8Path::new("a.toml")).is_missing());
    /// assert!(!StrataError::key_not_found("port").is_missing());
    /// ```
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::NoConfigurationFound { .. }
        )
    }
}
