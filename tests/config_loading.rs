//! Behaviour-driven tests for project configuration loading.

use std::cell::RefCell;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use glossa::{CONFIG_FILE_NAME, SharedConfig};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

mod support;

use support::locale::StepLocale;

struct ConfigWorld {
    dir: TempDir,
    result: RefCell<Option<Result<SharedConfig, String>>>,
}

impl ConfigWorld {
    fn path(&self) -> Utf8PathBuf {
        Utf8Path::from_path(self.dir.path())
            .expect("temporary directory should be UTF-8")
            .join(CONFIG_FILE_NAME)
    }

    fn write(&self, contents: &str) {
        fs::write(self.path(), contents).expect("write configuration file");
    }

    fn loaded(&self) -> SharedConfig {
        let borrow = self.result.borrow();
        match borrow.as_ref() {
            Some(Ok(config)) => config.clone(),
            Some(Err(error)) => panic!("expected configuration loading to succeed: {error}"),
            None => panic!("configuration should be loaded"),
        }
    }
}

#[fixture]
fn world() -> ConfigWorld {
    ConfigWorld {
        dir: TempDir::new().expect("create temporary directory"),
        result: RefCell::new(None),
    }
}

/// Expand the `\n` and `\"` escapes used to keep TOML on one step line.
fn unescape(contents: &str) -> String {
    contents.replace("\\n", "\n").replace("\\\"", "\"")
}

#[given("a configuration file containing \"{contents}\"")]
fn given_file(world: &ConfigWorld, contents: String) {
    world.write(&unescape(&contents));
}

#[given("an empty configuration file")]
fn given_empty_file(world: &ConfigWorld) {
    world.write("");
}

#[given("a configuration file whose source locale is {locale}")]
fn given_source_locale(world: &ConfigWorld, locale: StepLocale) {
    world.write(&format!("source_locale = \"{}\"\n", locale.into_inner()));
}

#[given("no configuration file")]
fn given_no_file(world: &ConfigWorld) {
    assert!(!world.path().exists());
}

#[when("the configuration is loaded")]
fn when_loaded(world: &ConfigWorld) {
    let outcome = SharedConfig::load_from(&world.path()).map_err(|error| error.to_string());
    world.result.replace(Some(outcome));
}

#[then("the source locale is \"{expected}\"")]
fn then_source_locale(world: &ConfigWorld, expected: String) {
    assert_eq!(world.loaded().source_locale(), expected);
}

fn extracted(world: &ConfigWorld, source: &str, file: &str) -> usize {
    world
        .loaded()
        .extractors()
        .extract_source(Utf8Path::new(file), source)
        .expect("extraction should succeed")
        .len()
}

#[then("the extractors recognise \"{source}\" in \"{file}\"")]
fn then_recognised(world: &ConfigWorld, source: String, file: String) {
    assert_eq!(extracted(world, &source, &file), 1);
}

#[then("the extractors ignore \"{source}\" in \"{file}\"")]
fn then_ignored(world: &ConfigWorld, source: String, file: String) {
    assert_eq!(extracted(world, &source, &file), 0);
}

#[then("a configuration error mentioning \"{snippet}\" is reported")]
fn then_error(world: &ConfigWorld, snippet: String) {
    let borrow = world.result.borrow();
    match borrow.as_ref() {
        Some(Err(error)) => assert!(
            error.contains(snippet.as_str()),
            "expected error '{error}' to mention '{snippet}'",
        ),
        Some(Ok(config)) => {
            panic!("expected configuration loading to fail but succeeded with {config:?}")
        }
        None => panic!("configuration should be loaded"),
    }
}

#[scenario("tests/features/config_loading.feature", index = 0)]
fn scenario_defaults(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 1)]
fn scenario_name_overrides(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 2)]
fn scenario_blank_locale(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 3)]
fn scenario_unknown_keys(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 4)]
fn scenario_missing_file(world: ConfigWorld) {
    let _ = world;
}
