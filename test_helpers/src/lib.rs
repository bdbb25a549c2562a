//! Test helpers shared across the workspace.
//!
//! - [`env`]: guarded mutation of process environment variables.
//! - [`cwd`]: guarded change of the working directory.
//! - [`jail`]: a thin wrapper over `figment::Jail` returning `anyhow` results.
//! - [`fixtures`]: temporary directory trees holding configuration roots.

pub mod cwd;
pub mod env;
pub mod fixtures;
pub mod jail;
