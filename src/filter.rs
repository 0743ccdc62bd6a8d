//! Scope predicates evaluated on current-tree entities.
//!
//! Substring lists and the regex select entities by default: a match
//! *excludes* the entity unless its axis is inverted, in which case only
//! matching entities are kept. With an empty list nothing matches, so
//! everything is allowed, and inverting allows nothing.

use crate::config::FilterConfig;
use crate::model::{File, Target};

/// Whether any of `needles` occurs in `haystack`. False for an empty list.
#[must_use]
pub fn contains_any(needles: &[String], haystack: &str) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Filter predicates over one [`FilterConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Filters<'a> {
    config: &'a FilterConfig,
}

impl<'a> Filters<'a> {
    #[must_use]
    pub fn new(config: &'a FilterConfig) -> Self {
        Self { config }
    }

    /// A configured regex lets every target through and filters paths instead.
    #[must_use]
    pub fn target_is_allowed(&self, target: &Target) -> bool {
        if self.config.regex.is_some() {
            return true;
        }
        contains_any(&self.config.targets, &target.name) == self.config.invert.target
    }

    /// Whether the file counts toward totals.
    #[must_use]
    pub fn path_is_allowed(&self, file: &File) -> bool {
        match &self.config.regex {
            Some(re) => re.is_match(&file.path) == self.config.invert.regex,
            None => contains_any(&self.config.paths, &file.path) == self.config.invert.path,
        }
    }

    /// Whether a counted file may produce warnings.
    #[must_use]
    pub fn warn_is_allowed(&self, file: &File) -> bool {
        contains_any(&self.config.warn_paths, &file.path) == self.config.invert.warn_path
    }
}
