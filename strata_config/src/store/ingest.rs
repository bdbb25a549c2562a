//! File ingestion: read a source, parse it, deep-merge the result.

use camino::Utf8Path;
use serde_json::{Map, Value};
use tracing::debug;

use super::{OnMissing, Store};
use crate::format::DEFAULT_DOTENV;
use crate::{Format, SourceError, StrataError, StrataResult, source};

/// Label reported in parse errors raised by caller-supplied parsers.
const CUSTOM_FORMAT: &str = "custom";

impl Store {
    /// Merge the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::SourceNotFound`] when the file is absent and
    /// `on_missing` is [`OnMissing::Error`], [`StrataError::Parse`] when the
    /// content is malformed and [`StrataError::File`] when it cannot be read.
    pub fn load_json(
        &mut self,
        path: impl AsRef<Utf8Path>,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        self.load_format(path, Format::Json, on_missing)
    }

    /// Merge the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`]; additionally
    /// [`StrataError::FormatDisabled`] without the `toml` feature.
    pub fn load_toml(
        &mut self,
        path: impl AsRef<Utf8Path>,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        self.load_format(path, Format::Toml, on_missing)
    }

    /// Merge the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`]; additionally
    /// [`StrataError::FormatDisabled`] without the `yaml` feature.
    pub fn load_yaml(
        &mut self,
        path: impl AsRef<Utf8Path>,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        self.load_format(path, Format::Yaml, on_missing)
    }

    /// Merge the INI file at `path`; each section becomes a nested mapping.
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`]; additionally
    /// [`StrataError::FormatDisabled`] without the `ini` feature.
    pub fn load_ini(
        &mut self,
        path: impl AsRef<Utf8Path>,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        self.load_format(path, Format::Ini, on_missing)
    }

    /// Merge the dotenv file at `path` as flat string values.
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`]; additionally
    /// [`StrataError::FormatDisabled`] without the `dotenv` feature.
    pub fn load_dotenv(
        &mut self,
        path: impl AsRef<Utf8Path>,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        self.load_format(path, Format::Env, on_missing)
    }

    /// Merge `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// As [`Store::load_dotenv`].
    pub fn load_default_dotenv(&mut self, on_missing: OnMissing) -> StrataResult<&mut Self> {
        self.load_dotenv(DEFAULT_DOTENV, on_missing)
    }

    /// Merge the file at `path` using the parser registered for `format`.
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`]; additionally
    /// [`StrataError::FormatDisabled`] when the format's feature is off.
    pub fn load_format(
        &mut self,
        path: impl AsRef<Utf8Path>,
        format: Format,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self> {
        format.ensure_enabled()?;
        self.load_with(path.as_ref(), format.name(), format.parser(), on_missing)
    }

    /// Merge the file at `path` using a caller-supplied parser.
    ///
    /// The parser receives the whole file content and returns the mapping to
    /// merge; its errors surface as [`StrataError::Parse`].
    ///
    /// # Errors
    ///
    /// As [`Store::load_json`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use serde_json::{Map, Value};
    /// use strata_config::{OnMissing, Store};
    ///
    /// fn key_per_line(data: &str) -> Result<Map<String, Value>, std::io::Error> {
    ///     Ok(data
    ///         .lines()
    ///         .map(|line| (line.to_owned(), Value::Bool(true)))
    ///         .collect())
    /// }
    ///
    /// # fn run() -> strata_config::StrataResult<()> {
    /// let mut store = Store::new();
    /// store.load_file("features.txt", key_per_line, OnMissing::Ignore)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_file<F, E>(
        &mut self,
        path: impl AsRef<Utf8Path>,
        parse: F,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self>
    where
        F: FnOnce(&str) -> Result<Map<String, Value>, E>,
        E: Into<SourceError>,
    {
        self.load_with(path.as_ref(), CUSTOM_FORMAT, parse, on_missing)
    }

    fn load_with<F, E>(
        &mut self,
        path: &Utf8Path,
        format: &'static str,
        parse: F,
        on_missing: OnMissing,
    ) -> StrataResult<&mut Self>
    where
        F: FnOnce(&str) -> Result<Map<String, Value>, E>,
        E: Into<SourceError>,
    {
        if self.merge_source(path, format, parse)? {
            return Ok(self);
        }
        match on_missing {
            OnMissing::Error => Err(StrataError::source_not_found(path)),
            OnMissing::Ignore => {
                debug!(%path, format, "skipped missing configuration source");
                Ok(self)
            }
        }
    }

    /// Read, parse and merge `path`; `Ok(false)` when it does not exist.
    ///
    /// Nothing is merged unless parsing succeeds, so a failure leaves the
    /// store untouched.
    pub(crate) fn merge_source<F, E>(
        &mut self,
        path: &Utf8Path,
        format: &'static str,
        parse: F,
    ) -> StrataResult<bool>
    where
        F: FnOnce(&str) -> Result<Map<String, Value>, E>,
        E: Into<SourceError>,
    {
        let Some(contents) = source::read(path)? else {
            return Ok(false);
        };
        let layer = parse(&contents).map_err(|err| StrataError::parse(path, format, err))?;
        debug!(%path, format, keys = layer.len(), "merged configuration source");
        self.merge(layer);
        Ok(true)
    }
}
