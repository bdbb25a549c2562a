//! Primary error enum for configuration resolution flows.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Boxed error returned by format parsers and custom parse functions.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading or querying configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A named configuration source does not exist.
    #[error("configuration source '{path}' does not exist")]
    SourceNotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// A source exists but its content is malformed for its format.
    #[error("failed to parse '{path}' as {format}: {source}")]
    Parse {
        /// Path of the malformed source.
        path: Utf8PathBuf,
        /// Name of the format the content was parsed as.
        format: &'static str,
        /// Underlying error reported by the parser.
        #[source]
        source: SourceError,
    },

    /// A file extension or explicit format name is not recognised.
    #[error("unsupported configuration format '{name}'")]
    UnsupportedFormat {
        /// Extension or format name that failed to resolve.
        name: String,
    },

    /// The format is known but its Cargo feature is disabled.
    #[error("{format} support is disabled: enable the '{feature}' feature")]
    FormatDisabled {
        /// Name of the disabled format.
        format: &'static str,
        /// Cargo feature that enables the format.
        feature: &'static str,
    },

    /// Direct key lookup on a store for an absent key.
    #[error("configuration key '{key}' not found")]
    KeyNotFound {
        /// Key that was requested.
        key: String,
    },

    /// A resolver build located no matching file in any search root.
    #[error(
        "no configuration file '{filename}' found (searched: {})",
        join_paths(.searched)
    )]
    NoConfigurationFound {
        /// File name the resolver searched for.
        filename: Utf8PathBuf,
        /// Candidate paths that were checked, in search order.
        searched: Vec<Utf8PathBuf>,
    },

    /// Reading a source failed for a reason other than absence.
    #[error("failed to read configuration source '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Resolved values could not be deserialised into the requested type.
    #[error("failed to extract configuration: {0}")]
    Extract(#[from] serde_json::Error),
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    if paths.is_empty() {
        return String::from("<none>");
    }
    paths
        .iter()
        .map(Utf8PathBuf::as_path)
        .map(Utf8Path::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
