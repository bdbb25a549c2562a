//! Environment-variable ingestion.

use serde_json::{Map, Value};
use tracing::debug;

use super::Store;

/// Separator placed between a prefix and the variable name it qualifies.
const PREFIX_SEPARATOR: char = '_';

impl Store {
    /// Merge process environment variables named `<prefix>_<NAME>`.
    ///
    /// The environment is read once, at call time. Each selected variable is
    /// stored under `NAME` (prefix and separator stripped) as a string.
    /// Variables whose name or value is not valid UTF-8 are skipped.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::Store;
    ///
    /// // With MY_COOL_APP_EXAMPLE=ohyes in the environment:
    /// let mut store = Store::new();
    /// store.load_environment("MY_COOL_APP");
    /// assert_eq!(store.get("EXAMPLE").and_then(|v| v.as_str()), Some("ohyes"));
    /// ```
    pub fn load_environment(&mut self, prefix: &str) -> &mut Self {
        let vars = std::env::vars_os().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(name), Ok(text)) => Some((name, text)),
                (Ok(name), Err(_)) => {
                    debug!(name = %name, "skipped environment variable with non-UTF-8 value");
                    None
                }
                (Err(raw), _) => {
                    debug!(name = ?raw, "skipped environment variable with non-UTF-8 name");
                    None
                }
            }
        });
        self.load_vars(prefix, vars)
    }

    /// Merge the `<prefix>_<NAME>` entries of `vars` as flat string values.
    ///
    /// This is the selection [`Store::load_environment`] applies to the
    /// process environment, exposed for callers holding their own snapshot.
    /// Names that are empty once the prefix is stripped are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::Store;
    ///
    /// let mut store = Store::new();
    /// store.load_vars(
    ///     "APP",
    ///     [("APP_PORT", "8080"), ("APPLICATION", "ignored"), ("OTHER", "ignored")],
    /// );
    /// assert_eq!(store.into_value(), json!({"PORT": "8080"}));
    /// ```
    pub fn load_vars<I, K, V>(&mut self, prefix: &str, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut search = String::with_capacity(prefix.len() + 1);
        search.push_str(prefix);
        search.push(PREFIX_SEPARATOR);

        let layer: Map<String, Value> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.as_ref().strip_prefix(search.as_str())?;
                if name.is_empty() {
                    return None;
                }
                Some((name.to_owned(), Value::String(value.into())))
            })
            .collect();
        debug!(prefix, keys = layer.len(), "merged environment variables");
        self.merge(layer)
    }
}
