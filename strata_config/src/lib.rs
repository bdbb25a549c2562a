//! Layered configuration loading.
//!
//! `strata_config` gathers configuration from files, `.env` files and the
//! process environment into a single [`Store`], a string-keyed tree of JSON
//! values. Every source is deep-merged on top of what is already there:
//! nested mappings combine key by key, and any other value replaces what it
//! lands on.
//!
//! A [`Resolver`] searches an ordered list of directories for one file name
//! and merges every match, so later directories override earlier ones.
//!
//! ```rust
//! use serde_json::json;
//! use strata_config::Store;
//!
//! let mut store = Store::with_defaults([
//!     ("database", json!({"connection": {"path": "x", "timeout": 5}})),
//! ]);
//! store
//!     .update([("database", json!({"connection": {"timeout": 30}}))])
//!     .load_vars("MY_APP", [("MY_APP_MODE", "production")]);
//!
//! assert_eq!(
//!     store.get_recursive(["database", "connection", "path"]),
//!     Some(&json!("x"))
//! );
//! assert_eq!(store.get("MODE"), Some(&json!("production")));
//! let fallback = json!(false);
//! assert_eq!(store.get_recursive_or(["database", "pool"], &fallback), &fallback);
//! ```

use std::sync::Arc;

mod error;
mod format;
mod merge;
mod resolver;
mod result_ext;
mod source;
mod store;

pub use error::{SourceError, StrataError};
pub use format::{DEFAULT_DOTENV, Format, ParseFn};
pub use merge::{merge_map, merge_value};
pub use resolver::{Resolution, Resolver};
pub use result_ext::StrataResultExt;
pub use serde_json;
pub use store::{OnMissing, Store};

/// Result alias used by every fallible operation in the crate.
pub type StrataResult<T> = Result<T, Arc<StrataError>>;
