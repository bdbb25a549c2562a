//! Parser functions backing each [`Format`](super::Format).
//!
//! Every parser yields a mapping of string keys to JSON values. Parsers for
//! formats whose feature is disabled still exist so the dispatch table stays
//! total; they refuse every input.

use serde_json::{Map, Value};

use crate::SourceError;

type ParseResult = Result<Map<String, Value>, SourceError>;

/// Accept a document root only when it is a mapping; `null` (an empty
/// document) counts as an empty mapping.
fn into_mapping(value: Value) -> ParseResult {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(format!(
            "expected a mapping at the document root, found {}",
            value_kind(&other)
        )
        .into()),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(not(all(feature = "toml", feature = "yaml", feature = "ini", feature = "dotenv")))]
fn disabled(feature: &str) -> SourceError {
    format!("{feature} feature disabled").into()
}

pub(super) fn parse_json(data: &str) -> ParseResult {
    #[cfg(feature = "json5")]
    let value: Value = json5::from_str(data)?;
    #[cfg(not(feature = "json5"))]
    let value: Value = serde_json::from_str(data)?;
    into_mapping(value)
}

#[cfg(feature = "toml")]
pub(super) fn parse_toml(data: &str) -> ParseResult {
    let table: toml::Table = toml::from_str(data)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

#[cfg(not(feature = "toml"))]
pub(super) fn parse_toml(_data: &str) -> ParseResult {
    Err(disabled("toml"))
}

/// Datetimes become their RFC 3339 text; non-finite floats, which JSON
/// numbers cannot carry, become their textual form.
#[cfg(feature = "toml")]
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(int) => Value::from(int),
        toml::Value::Float(float) => serde_json::Number::from_f64(float)
            .map_or_else(|| Value::String(float.to_string()), Value::Number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, nested)| (key, toml_to_json(nested)))
                .collect(),
        ),
    }
}

#[cfg(feature = "yaml")]
pub(super) fn parse_yaml(data: &str) -> ParseResult {
    if data.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_saphyr::from_str_with_options(
        data,
        serde_saphyr::Options {
            strict_booleans: true,
            ..serde_saphyr::Options::default()
        },
    )
    .map_err(|err| SourceError::from(err.to_string()))?;
    into_mapping(value)
}

#[cfg(not(feature = "yaml"))]
pub(super) fn parse_yaml(_data: &str) -> ParseResult {
    Err(disabled("yaml"))
}

#[cfg(feature = "ini")]
const DEFAULT_SECTION: &str = "DEFAULT";

/// Sections become nested mappings with lower-cased option names. Entries
/// under `[DEFAULT]` are inherited by every other section; entries before
/// the first header stay at the top level. Values are kept as written:
/// backslashes and quotes are not interpreted.
#[cfg(feature = "ini")]
pub(super) fn parse_ini(data: &str) -> ParseResult {
    use crate::merge::merge_map;

    let document = ini::Ini::load_from_str_opt(
        data,
        ini::ParseOption {
            enabled_escape: false,
            enabled_quote: false,
            ..ini::ParseOption::default()
        },
    )?;
    let mut root = Map::new();
    let mut defaults = Map::new();
    let mut sections = Map::new();
    for (section, properties) in document.iter() {
        let entries: Map<String, Value> = properties
            .iter()
            .map(|(key, value)| (key.to_lowercase(), Value::String(value.to_owned())))
            .collect();
        match section {
            None => merge_map(&mut root, entries),
            Some(DEFAULT_SECTION) => merge_map(&mut defaults, entries),
            Some(name) => {
                let mut named = Map::new();
                named.insert(name.to_owned(), Value::Object(entries));
                merge_map(&mut sections, named);
            }
        }
    }
    for (name, entries) in sections {
        let mut table = defaults.clone();
        if let Value::Object(own) = entries {
            merge_map(&mut table, own);
        }
        root.insert(name, Value::Object(table));
    }
    Ok(root)
}

#[cfg(not(feature = "ini"))]
pub(super) fn parse_ini(_data: &str) -> ParseResult {
    Err(disabled("ini"))
}

/// Line-parse failures report the offending position only; the raw line may
/// hold a secret and is never echoed.
#[cfg(feature = "dotenv")]
pub(super) fn parse_dotenv(data: &str) -> ParseResult {
    dotenvy::from_read_iter(data.as_bytes())
        .map(|entry| match entry {
            Ok((key, value)) => Ok((key, Value::String(value))),
            Err(dotenvy::Error::LineParse(_, index)) => {
                Err(format!("invalid dotenv syntax at position {index}").into())
            }
            Err(err) => Err(SourceError::from(err)),
        })
        .collect()
}

#[cfg(not(feature = "dotenv"))]
pub(super) fn parse_dotenv(_data: &str) -> ParseResult {
    Err(disabled("dotenv"))
}
