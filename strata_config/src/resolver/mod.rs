//! Layered, multi-root configuration resolution.
//!
//! A [`Resolver`] names one configuration file and an ordered list of search
//! roots. Building it merges the defaults first and then every root that
//! holds the file, in registration order, so later roots override earlier
//! ones.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::trace;

use crate::{Format, OnMissing, Store, StrataError, StrataResult};

/// Root searched when none has been registered.
const IMPLICIT_ROOT: &str = ".";

/// Builder describing where a configuration file lives and how to read it.
///
/// # Examples
///
/// ```rust,no_run
/// use strata_config::{OnMissing, Resolver};
///
/// # fn run() -> strata_config::StrataResult<()> {
/// let store = Resolver::new("settings.json")
///     .add_folder_path("config/defaults")
///     .add_folder_path("config/production")
///     .build(OnMissing::Error)?;
/// let port = store.get_recursive(["server", "port"]);
/// # let _ = port;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Resolver {
    filename: Utf8PathBuf,
    format: Option<Format>,
    defaults: Store,
    roots: Vec<Utf8PathBuf>,
}

/// Result of [`Resolver::build_report`].
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Resolution {
    /// Accumulated configuration.
    pub store: Store,
    /// Files merged into `store`, in merge order.
    pub sources: Vec<Utf8PathBuf>,
}

impl Resolver {
    /// Creates a resolver for `filename` with no roots and empty defaults.
    #[must_use]
    pub fn new(filename: impl Into<Utf8PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            format: None,
            defaults: Store::new(),
            roots: Vec::new(),
        }
    }

    /// Forces `format` instead of inferring it from the filename extension.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Forces the format named `name` (a format name or extension).
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedFormat`] when `name` is unknown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::Resolver;
    ///
    /// assert!(Resolver::new("app.conf").format_name("TOML").is_ok());
    /// assert!(Resolver::new("app.conf").format_name("xml").is_err());
    /// ```
    pub fn format_name(self, name: &str) -> StrataResult<Self> {
        Ok(self.format(name.parse()?))
    }

    /// Replaces the defaults seeded into every build.
    #[must_use]
    pub fn defaults(mut self, defaults: impl Into<Store>) -> Self {
        self.defaults = defaults.into();
        self
    }

    /// Replaces the defaults in place.
    pub fn set_defaults(&mut self, defaults: impl Into<Store>) -> &mut Self {
        self.defaults = defaults.into();
        self
    }

    /// Appends a search root. The path is not checked; a root that does not
    /// exist simply never matches.
    #[must_use]
    pub fn add_folder_path(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Primary filename searched in each root.
    #[must_use]
    pub fn filename(&self) -> &Utf8Path {
        &self.filename
    }

    /// Registered roots, in search order.
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Candidate file paths in the order they are searched.
    ///
    /// Falls back to the current directory when no root was registered.
    ///
    /// ```rust
    /// use camino::Utf8PathBuf;
    /// use strata_config::Resolver;
    ///
    /// let resolver = Resolver::new("app.toml");
    /// assert_eq!(resolver.candidates(), [Utf8PathBuf::from("./app.toml")]);
    ///
    /// let resolver = resolver.add_folder_path("etc").add_folder_path("home");
    /// assert_eq!(
    ///     resolver.candidates(),
    ///     [Utf8PathBuf::from("etc/app.toml"), Utf8PathBuf::from("home/app.toml")]
    /// );
    /// ```
    #[must_use]
    pub fn candidates(&self) -> Vec<Utf8PathBuf> {
        if self.roots.is_empty() {
            return vec![Utf8Path::new(IMPLICIT_ROOT).join(&self.filename)];
        }
        self.roots
            .iter()
            .map(|root| root.join(&self.filename))
            .collect()
    }

    /// Format used for every candidate: the override, or the one implied by
    /// the filename.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedFormat`] when no override is set
    /// and the extension is not recognised.
    pub fn resolved_format(&self) -> StrataResult<Format> {
        self.format
            .map_or_else(|| Format::for_path(&self.filename), Ok)
    }

    /// Builds a fresh [`Store`] from the defaults and every matching file.
    ///
    /// The resolver itself is left untouched, so building twice yields two
    /// independent stores with identical content.
    ///
    /// # Errors
    ///
    /// - [`StrataError::UnsupportedFormat`] or [`StrataError::FormatDisabled`]
    ///   before any file is touched.
    /// - [`StrataError::Parse`] or [`StrataError::File`] as soon as one
    ///   candidate fails; no partial store is returned.
    /// - [`StrataError::NoConfigurationFound`] when no candidate exists and
    ///   `on_missing` is [`OnMissing::Error`].
    pub fn build(&self, on_missing: OnMissing) -> StrataResult<Store> {
        self.build_report(on_missing).map(|resolution| resolution.store)
    }

    /// As [`Resolver::build`], also reporting which files were merged.
    ///
    /// # Errors
    ///
    /// As [`Resolver::build`].
    pub fn build_report(&self, on_missing: OnMissing) -> StrataResult<Resolution> {
        let format = self.resolved_format()?;
        format.ensure_enabled()?;
        let mut store = self.defaults.clone();
        let candidates = self.candidates();
        let mut sources = Vec::new();
        for candidate in &candidates {
            let merged = store.merge_source(candidate, format.name(), format.parser())?;
            trace!(
                path = %candidate,
                format = format.name(),
                merged,
                "checked configuration candidate"
            );
            if merged {
                sources.push(candidate.clone());
            }
        }
        if sources.is_empty() && on_missing == OnMissing::Error {
            return Err(StrataError::no_configuration_found(&self.filename, candidates));
        }
        Ok(Resolution { store, sources })
    }
}
