//! End-to-end tests for layered resolution across search roots.
//!
//! Covers root precedence, every built-in format, the missing-file policy,
//! the implicit current-directory root and typed extraction of a build.

use anyhow::{Result, anyhow, ensure};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;
use serial_test::serial;
use strata_config::{Format, OnMissing, Resolver, Store, StrataError, StrataResult};
use test_helpers::{cwd, fixtures::ConfigTree};

fn to_anyhow<T>(result: StrataResult<T>) -> Result<T> {
    result.map_err(|err| anyhow!(err.to_string()))
}

#[fixture]
fn tree() -> Result<ConfigTree> {
    ConfigTree::new()
}

#[rstest]
fn production_root_overrides_defaults_root(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("defaults_dir", "settings.json", r#"{"test": "first"}"#)?;
    tree.write("production_dir", "settings.json", r#"{"test": "second"}"#)?;
    let store = to_anyhow(
        Resolver::new("settings.json")
            .add_folder_path(tree.root("defaults_dir")?)
            .add_folder_path(tree.root("production_dir")?)
            .build(OnMissing::Error),
    )?;
    ensure!(
        store.get("test") == Some(&json!("second")),
        "unexpected value {:?}",
        store.get("test")
    );
    Ok(())
}

#[rstest]
#[case::json("app.json", r#"{"server": {"host": "a", "port": 1}}"#, r#"{"server": {"port": 2}}"#)]
#[case::toml("app.toml", "[server]\nhost = \"a\"\nport = 1\n", "[server]\nport = 2\n")]
#[case::yaml("app.yaml", "server:\n  host: a\n  port: 1\n", "server:\n  port: 2\n")]
#[case::yml("app.yml", "server:\n  host: a\n  port: 1\n", "server:\n  port: 2\n")]
fn every_format_layers_the_same_way(
    tree: Result<ConfigTree>,
    #[case] filename: &str,
    #[case] base: &str,
    #[case] overlay: &str,
) -> Result<()> {
    let tree = tree?;
    tree.write("base", filename, base)?;
    tree.write("overlay", filename, overlay)?;
    let store = to_anyhow(
        Resolver::new(filename)
            .add_folder_path(tree.root("base")?)
            .add_folder_path(tree.root("overlay")?)
            .build(OnMissing::Error),
    )?;
    ensure!(
        store.into_value() == json!({"server": {"host": "a", "port": 2}}),
        "layers did not merge for {filename}"
    );
    Ok(())
}

#[rstest]
fn ini_sections_layer_as_strings(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("base", "app.ini", "[server]\nhost = a\nport = 1\n")?;
    tree.write("overlay", "app.ini", "[server]\nport = 2\n")?;
    let store = to_anyhow(
        Resolver::new("app.ini")
            .add_folder_path(tree.root("base")?)
            .add_folder_path(tree.root("overlay")?)
            .build(OnMissing::Error),
    )?;
    ensure!(
        store.into_value() == json!({"server": {"host": "a", "port": "2"}}),
        "unexpected ini merge"
    );
    Ok(())
}

#[rstest]
fn explicit_format_reads_unusual_names(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("etc", "app.conf", "name = \"demo\"\n")?;
    let store = to_anyhow(
        to_anyhow(Resolver::new("app.conf").format_name("toml"))?
            .add_folder_path(tree.root("etc")?)
            .build(OnMissing::Error),
    )?;
    ensure!(store.get("name") == Some(&json!("demo")), "override ignored");
    let inferred = Resolver::new("app.conf")
        .add_folder_path(tree.root("etc")?)
        .build(OnMissing::Ignore);
    match inferred {
        Ok(found) => Err(anyhow!("expected UnsupportedFormat, got {found:?}")),
        Err(err) => {
            ensure!(
                matches!(err.as_ref(), StrataError::UnsupportedFormat { name } if name == "conf"),
                "unexpected error {err:?}"
            );
            Ok(())
        }
    }
}

#[rstest]
fn nothing_found_is_fatal_unless_ignored(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    let resolver = Resolver::new("nope.json")
        .defaults(Store::with_defaults([("fallback", json!(true))]))
        .add_folder_path(tree.root("empty")?)
        .add_folder_path(tree.path("never_created"));
    match resolver.build(OnMissing::Error) {
        Ok(store) => return Err(anyhow!("expected NoConfigurationFound, got {store:?}")),
        Err(err) => {
            ensure!(
                matches!(
                    err.as_ref(),
                    StrataError::NoConfigurationFound { searched, .. } if searched.len() == 2
                ),
                "unexpected error {err:?}"
            );
            ensure!(
                err.to_string().contains("nope.json"),
                "message should name the file: {err}"
            );
        }
    }
    let store = to_anyhow(resolver.build(OnMissing::Ignore))?;
    ensure!(
        store.into_value() == json!({"fallback": true}),
        "silent build should return the defaults"
    );
    Ok(())
}

#[rstest]
fn malformed_later_root_aborts_the_build(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("good", "app.yaml", "value: 1\n")?;
    let broken = tree.write("bad", "app.yaml", "value: [1, 2\n")?;
    let result = Resolver::new("app.yaml")
        .add_folder_path(tree.root("good")?)
        .add_folder_path(tree.root("bad")?)
        .build(OnMissing::Ignore);
    match result {
        Ok(store) => Err(anyhow!("expected a parse error, got {store:?}")),
        Err(err) => match err.as_ref() {
            StrataError::Parse { path, format, .. } => {
                ensure!(*path == broken, "error names {path}, expected {broken}");
                ensure!(path.starts_with(tree.base()), "{path} outside the tree");
                ensure!(*format == Format::Yaml.name(), "unexpected format {format}");
                Ok(())
            }
            other => Err(anyhow!("unexpected error {other:?}")),
        },
    }
}

#[rstest]
#[serial]
fn implicit_root_is_the_working_directory(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("work", "settings.toml", "mode = \"local\"\n")?;
    tree.write("elsewhere", "settings.toml", "mode = \"explicit\"\n")?;
    let guard = cwd::set_dir(tree.root("work")?)?;
    let implicit = to_anyhow(Resolver::new("settings.toml").build_report(OnMissing::Error))?;
    let explicit = to_anyhow(
        Resolver::new("settings.toml")
            .add_folder_path(tree.root("elsewhere")?)
            .build_report(OnMissing::Error),
    )?;
    guard.restore()?;
    let current = std::env::current_dir()?;
    ensure!(
        current == guard.original().as_std_path(),
        "working directory not restored to {}",
        guard.original()
    );
    ensure!(
        implicit.sources == [Utf8PathBuf::from("./settings.toml")],
        "unexpected implicit sources {:?}",
        implicit.sources
    );
    ensure!(
        implicit.store.get("mode") == Some(&json!("local")),
        "implicit root not searched"
    );
    ensure!(
        explicit.store.get("mode") == Some(&json!("explicit")) && explicit.sources.len() == 1,
        "working directory must not join explicit roots"
    );
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Database {
    path: String,
    pool: u8,
}

#[derive(Debug, Deserialize, PartialEq)]
struct AppConfig {
    name: String,
    database: Database,
}

#[rstest]
fn resolved_store_extracts_into_typed_config(tree: Result<ConfigTree>) -> Result<()> {
    let tree = tree?;
    tree.write("site", "app.json", r#"{"database": {"path": "/var/lib/app.db"}}"#)?;
    let store = to_anyhow(
        Resolver::new("app.json")
            .defaults(Store::with_defaults([
                ("name", json!("demo")),
                ("database", json!({"path": "memory", "pool": 4})),
            ]))
            .add_folder_path(tree.root("site")?)
            .build(OnMissing::Error),
    )?;
    let config: AppConfig = to_anyhow(store.extract())?;
    ensure!(
        config
            == AppConfig {
                name: String::from("demo"),
                database: Database {
                    path: String::from("/var/lib/app.db"),
                    pool: 4,
                },
            },
        "unexpected config {config:?}"
    );
    Ok(())
}
