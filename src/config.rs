//! Run configuration.
//!
//! [`ConfigFile`] is the raw, layered shape (defaults, then `.xcccr.toml`,
//! then CLI overrides). [`ConfigFile::resolve`] validates it once and turns
//! it into a [`Config`], which is all the comparison core ever sees.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, XcccrError};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".xcccr.toml";

/// Config as written in TOML. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project_path: String,
    pub filter_targets: Vec<String>,
    pub filter_paths: Vec<String>,
    pub filter_warn_paths: Vec<String>,
    pub filter_pattern: String,
    pub invert_filter: bool,
    pub invert_path_filter: bool,
    pub invert_regexp: bool,
    pub invert_target_filter: bool,
    pub invert_warnpath_filter: bool,
    pub include_masked: bool,
    pub meter_loc: bool,
    pub zero_warn_only: bool,
    pub tolerance: i64,
    pub line_annotations: bool,
}

impl ConfigFile {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a config file. A file that does not exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Selective invert flags as written, before invert-all is applied.
    #[must_use]
    pub fn selected_inverts(&self) -> InvertFlags {
        InvertFlags {
            path: self.invert_path_filter,
            regex: self.invert_regexp,
            target: self.invert_target_filter,
            warn_path: self.invert_warnpath_filter,
        }
    }

    pub fn set_inverts(&mut self, flags: InvertFlags) {
        self.invert_path_filter = flags.path;
        self.invert_regexp = flags.regex;
        self.invert_target_filter = flags.target;
        self.invert_warnpath_filter = flags.warn_path;
    }

    /// Validate and compile. `workdir` is used when no project path is set.
    pub fn resolve(self, workdir: &str) -> Result<Config> {
        let tolerance = u32::try_from(self.tolerance)
            .ok()
            .filter(|t| *t <= 100)
            .ok_or(XcccrError::Tolerance(self.tolerance))?;

        let regex = if self.filter_pattern.is_empty() {
            None
        } else {
            Some(Regex::new(&self.filter_pattern)?)
        };

        let invert = self.selected_inverts().with_invert_all(self.invert_filter);

        let project_path = if self.project_path.is_empty() {
            workdir
        } else {
            self.project_path.as_str()
        };

        Ok(Config {
            project_path: with_trailing_slash(project_path),
            filter: FilterConfig {
                targets: self.filter_targets,
                paths: self.filter_paths,
                warn_paths: self.filter_warn_paths,
                regex,
                invert,
            },
            include_masked: self.include_masked,
            meter_loc: self.meter_loc,
            zero_warn_only: self.zero_warn_only,
            tolerance,
            line_annotations: self.line_annotations,
        })
    }
}

/// The four independent filter inversion axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvertFlags {
    pub path: bool,
    pub regex: bool,
    pub target: bool,
    pub warn_path: bool,
}

impl InvertFlags {
    #[must_use]
    pub fn all() -> Self {
        Self {
            path: true,
            regex: true,
            target: true,
            warn_path: true,
        }
    }

    /// Invert-all overrides whatever the individual axes say.
    #[must_use]
    pub fn with_invert_all(self, invert_all: bool) -> Self {
        if invert_all {
            Self::all()
        } else {
            self
        }
    }

    /// Turn on axes named by letters: `p`ath, `r`egex, `t`arget, `w`arn-path.
    /// Unknown letters are ignored.
    pub fn select(&mut self, letters: &str) {
        for c in letters.chars() {
            match c {
                'p' => self.path = true,
                'r' => self.regex = true,
                't' => self.target = true,
                'w' => self.warn_path = true,
                other => {
                    tracing::warn!(letter = %other, "ignoring unknown selective invert letter")
                }
            }
        }
    }
}

/// Inputs of the filter predicates.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Target name substrings.
    pub targets: Vec<String>,
    /// File path substrings.
    pub paths: Vec<String>,
    /// File path substrings muted for warnings.
    pub warn_paths: Vec<String>,
    /// When set, replaces target and path substring filtering.
    pub regex: Option<Regex>,
    pub invert: InvertFlags,
}

/// Validated configuration handed to the comparison core.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root, always ending in `/`; stripped from annotation paths.
    pub project_path: String,
    pub filter: FilterConfig,
    /// Use report-wide counters for the verdict instead of filtered totals.
    pub include_masked: bool,
    /// Phrase coverage as covered LOC instead of percent.
    pub meter_loc: bool,
    /// 0% current coverage warns instead of failing.
    pub zero_warn_only: bool,
    /// Percentage points of drop tolerated before failing.
    pub tolerance: u32,
    /// One annotation per function warning instead of one per file.
    pub line_annotations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_path: "/".to_string(),
            filter: FilterConfig::default(),
            include_masked: false,
            meter_loc: false,
            zero_warn_only: false,
            tolerance: 0,
            line_annotations: false,
        }
    }
}

impl Config {
    /// Path relative to the project root, or unchanged if outside it.
    #[must_use]
    pub fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.project_path.as_str()).unwrap_or(path)
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let cfg = ConfigFile::from_toml_str(
            r#"
            filter_targets = ["Tests"]
            filter_paths = ["Generated/", "Pods/"]
            filter_warn_paths = ["Legacy/"]
            invert_regexp = true
            tolerance = 5
            meter_loc = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.filter_targets, vec!["Tests"]);
        assert_eq!(cfg.filter_paths.len(), 2);
        assert!(cfg.invert_regexp);
        assert!(cfg.meter_loc);
        assert_eq!(cfg.tolerance, 5);
        assert!(!cfg.include_masked);
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let err = ConfigFile::from_toml_str("tolerence = 5").unwrap_err();
        assert!(matches!(err, XcccrError::Toml(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ConfigFile::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn test_tolerance_range() {
        for bad in [-1, 101] {
            let cfg = ConfigFile {
                tolerance: bad,
                ..Default::default()
            };
            assert!(matches!(
                cfg.resolve("/w"),
                Err(XcccrError::Tolerance(t)) if t == bad
            ));
        }
        let cfg = ConfigFile {
            tolerance: 100,
            ..Default::default()
        };
        assert_eq!(cfg.resolve("/w").unwrap().tolerance, 100);
    }

    #[test]
    fn test_invalid_pattern() {
        let cfg = ConfigFile {
            filter_pattern: "(unclosed".to_string(),
            ..Default::default()
        };
        assert!(matches!(cfg.resolve("/w"), Err(XcccrError::InvalidPattern(_))));
    }

    #[test]
    fn test_empty_pattern_means_no_regex() {
        let cfg = ConfigFile::default().resolve("/w").unwrap();
        assert!(cfg.filter.regex.is_none());
    }

    #[test]
    fn test_invert_all_overrides_every_axis() {
        let individual = [
            InvertFlags::default(),
            InvertFlags {
                path: true,
                ..Default::default()
            },
            InvertFlags {
                regex: true,
                warn_path: true,
                ..Default::default()
            },
            InvertFlags::all(),
        ];
        for flags in individual {
            assert_eq!(flags.with_invert_all(true), InvertFlags::all());
            assert_eq!(flags.with_invert_all(false), flags);
        }
    }

    #[test]
    fn test_invert_all_applied_on_resolve() {
        let cfg = ConfigFile {
            invert_filter: true,
            invert_path_filter: false,
            ..Default::default()
        };
        assert_eq!(cfg.resolve("/w").unwrap().filter.invert, InvertFlags::all());
    }

    #[test]
    fn test_select_letters() {
        let mut flags = InvertFlags::default();
        flags.select("pw?");
        assert_eq!(
            flags,
            InvertFlags {
                path: true,
                warn_path: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_project_path_defaults_to_workdir() {
        let cfg = ConfigFile::default().resolve("/Users/ci/app").unwrap();
        assert_eq!(cfg.project_path, "/Users/ci/app/");

        let cfg = ConfigFile {
            project_path: "/src/".to_string(),
            ..Default::default()
        }
        .resolve("/Users/ci/app")
        .unwrap();
        assert_eq!(cfg.project_path, "/src/");
    }

    #[test]
    fn test_relative_path() {
        let cfg = ConfigFile::default().resolve("/proj").unwrap();
        assert_eq!(cfg.relative_path("/proj/App/View.swift"), "App/View.swift");
        assert_eq!(cfg.relative_path("/other/View.swift"), "/other/View.swift");
    }
}
