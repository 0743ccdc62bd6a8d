#![allow(dead_code)]

use std::path::PathBuf;

use xcccr::config::{Config, ConfigFile};
use xcccr::model::CoverageReport;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Load a JSON report from `tests/fixtures`.
pub fn fixture(name: &str) -> CoverageReport {
    xcccr::load::read_report(&fixture_path(name)).unwrap()
}

/// Resolve a TOML snippet with `/proj` as the project root.
pub fn config(toml: &str) -> Config {
    ConfigFile::from_toml_str(toml)
        .unwrap()
        .resolve("/proj")
        .unwrap()
}
