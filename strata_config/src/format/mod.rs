//! Closed table of supported configuration formats.
//!
//! Each [`Format`] maps to the file extensions it claims and to a parser
//! function turning raw text into a mapping. Dispatch happens once per
//! ingestion; supporting a new format means adding a variant and a table
//! entry here.

mod parsers;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use camino::Utf8Path;
use serde_json::{Map, Value};

use crate::{SourceError, StrataError, StrataResult};

/// Conventional dotenv file name, used when no explicit path is supplied.
pub const DEFAULT_DOTENV: &str = ".env";

/// Parser contract shared by every format: raw text in, mapping out.
pub type ParseFn = fn(&str) -> Result<Map<String, Value>, SourceError>;

/// Configuration formats understood by the store and resolver.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Format {
    /// JSON documents (JSON5 when the `json5` feature is enabled).
    Json,
    /// TOML documents.
    Toml,
    /// YAML documents.
    Yaml,
    /// INI documents; sections become nested mappings.
    Ini,
    /// Line-oriented `KEY=VALUE` dotenv files.
    Env,
}

impl Format {
    /// Every format, in extension lookup order.
    pub const ALL: [Self; 5] = [Self::Json, Self::Toml, Self::Yaml, Self::Ini, Self::Env];

    /// Canonical lower-case name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Ini => "ini",
            Self::Env => "env",
        }
    }

    /// File extensions claimed by the format, without the leading dot.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Toml => &["toml"],
            Self::Yaml => &["yaml", "yml"],
            Self::Ini => &["ini"],
            Self::Env => &["env"],
        }
    }

    /// Cargo feature gating the format, if any.
    #[must_use]
    pub const fn feature(self) -> Option<&'static str> {
        match self {
            Self::Json => None,
            Self::Toml => Some("toml"),
            Self::Yaml => Some("yaml"),
            Self::Ini => Some("ini"),
            Self::Env => Some("dotenv"),
        }
    }

    /// Whether the parser for this format was compiled in.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::Json => true,
            Self::Toml => cfg!(feature = "toml"),
            Self::Yaml => cfg!(feature = "yaml"),
            Self::Ini => cfg!(feature = "ini"),
            Self::Env => cfg!(feature = "dotenv"),
        }
    }

    /// Parser function backing the format.
    #[must_use]
    pub const fn parser(self) -> ParseFn {
        match self {
            Self::Json => parsers::parse_json,
            Self::Toml => parsers::parse_toml,
            Self::Yaml => parsers::parse_yaml,
            Self::Ini => parsers::parse_ini,
            Self::Env => parsers::parse_dotenv,
        }
    }

    /// Parse `data` with this format's parser.
    ///
    /// # Errors
    ///
    /// Returns the parser's error when `data` is malformed or its document
    /// root is not a mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::Format;
    ///
    /// let map = Format::Json.parse(r#"{"port": 8080}"#).expect("valid json");
    /// assert_eq!(map["port"], 8080);
    /// ```
    pub fn parse(self, data: &str) -> Result<Map<String, Value>, SourceError> {
        (self.parser())(data)
    }

    /// Look up a format by file extension, ignoring ASCII case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
    }

    /// Infer the format of `path` from its extension.
    ///
    /// A file named exactly `.env` is treated as dotenv.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedFormat`] when the path has no
    /// extension or the extension is not in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use strata_config::Format;
    ///
    /// assert_eq!(Format::for_path(Utf8Path::new("app.YML")).ok(), Some(Format::Yaml));
    /// assert_eq!(Format::for_path(Utf8Path::new(".env")).ok(), Some(Format::Env));
    /// assert!(Format::for_path(Utf8Path::new("app.xml")).is_err());
    /// ```
    pub fn for_path(path: &Utf8Path) -> StrataResult<Self> {
        if path.file_name() == Some(DEFAULT_DOTENV) {
            return Ok(Self::Env);
        }
        let ext = path
            .extension()
            .ok_or_else(|| StrataError::unsupported_format(path.as_str()))?;
        Self::from_extension(ext).ok_or_else(|| StrataError::unsupported_format(ext))
    }

    pub(crate) fn ensure_enabled(self) -> StrataResult<()> {
        match self.feature() {
            Some(feature) if !self.is_enabled() => Err(Arc::new(StrataError::FormatDisabled {
                format: self.name(),
                feature,
            })),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Arc<StrataError>;

    /// Accepts a format name or one of its extensions, with or without a
    /// leading dot, ignoring ASCII case. `dotenv` names [`Format::Env`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let bare = name.strip_prefix('.').unwrap_or(name);
        if bare.eq_ignore_ascii_case("dotenv") {
            return Ok(Self::Env);
        }
        Self::from_extension(bare).ok_or_else(|| StrataError::unsupported_format(name))
    }
}
