//! Walk the current coverage tree, pair every node with its baseline
//! counterpart and report per-file diff units and regression warnings.

use std::fmt::Write;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::filter::Filters;
use crate::index;
use crate::model::{lines_percent, CoverageReport, DiffUnit, File, Function, Target};

/// Receives the walker's output as it is produced.
pub trait WalkSink {
    /// Called exactly once for every file that passes the path filter.
    fn unit(&mut self, unit: DiffUnit);

    fn annotate(&mut self, annotation: Annotation);
}

/// Why a function is worth a warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunctionWarning<'a> {
    Lowered { function: &'a Function, was: u32 },
    NotCovered(&'a Function),
}

impl<'a> FunctionWarning<'a> {
    /// Compare a current function against its baseline, if it had one.
    #[must_use]
    pub fn check(last: Option<&'a Function>, current: &'a Function) -> Option<Self> {
        match last {
            Some(last) if last.line_coverage > current.line_coverage => Some(Self::Lowered {
                function: current,
                was: last.percent(),
            }),
            _ if current.percent() == 0 => Some(Self::NotCovered(current)),
            _ => None,
        }
    }

    #[must_use]
    pub fn function(&self) -> &'a Function {
        match *self {
            Self::Lowered { function, .. } | Self::NotCovered(function) => function,
        }
    }

    /// Message without the line number.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Lowered { function, was } => format!(
                "{} coverage is lowered to {}% (was {}%).",
                function.name,
                function.percent(),
                was
            ),
            Self::NotCovered(function) => format!("{} is not covered.", function.name),
        }
    }
}

pub struct Walker<'a> {
    config: &'a Config,
    filters: Filters<'a>,
}

impl<'a> Walker<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            filters: Filters::new(&config.filter),
        }
    }

    pub fn walk(&self, last: &CoverageReport, current: &CoverageReport, sink: &mut dyn WalkSink) {
        let last_targets = index::targets(last);
        let unseen = Target::default();
        for target in &current.targets {
            if !self.filters.target_is_allowed(target) {
                tracing::debug!(target = %target.name, "target filtered out");
                continue;
            }
            let last_target = match last_targets.get(target.name.as_str()) {
                Some(&t) => t,
                None => {
                    tracing::debug!(target = %target.name, "target has no baseline");
                    &unseen
                }
            };
            self.walk_target(last_target, target, sink);
        }
    }

    fn walk_target(&self, last: &Target, current: &Target, sink: &mut dyn WalkSink) {
        let last_files = index::files(last);
        let unseen = File::default();
        for file in &current.files {
            if !self.filters.path_is_allowed(file) {
                tracing::debug!(path = %file.path, "path filtered out");
                continue;
            }
            let last_file = last_files.get(file.name.as_str()).copied().unwrap_or(&unseen);

            let unit = DiffUnit::between(last_file, file);
            tracing::debug!(path = %file.path, ?unit, "file compared");
            sink.unit(unit);

            if !self.filters.warn_is_allowed(file) {
                continue;
            }
            for annotation in self.file_annotations(last_file, file) {
                sink.annotate(annotation);
            }
        }
    }

    /// Warnings for one counted, warn-allowed file.
    #[must_use]
    pub fn file_annotations(&self, last: &File, current: &File) -> Vec<Annotation> {
        let path = self.config.relative_path(&current.path);
        let header = self.file_header(last, current);
        let last_functions = index::functions(last);
        let warnings: Vec<FunctionWarning<'_>> = current
            .functions
            .iter()
            .filter_map(|f| FunctionWarning::check(last_functions.get(f.name.as_str()).copied(), f))
            .collect();

        if self.config.line_annotations {
            let mut out = Vec::with_capacity(warnings.len() + 1);
            if let Some(header) = header {
                out.push(Annotation::warning(header).in_file(path));
            }
            for w in &warnings {
                out.push(
                    Annotation::warning(w.message())
                        .in_file(path)
                        .at_line(w.function().line_number),
                );
            }
            return out;
        }

        let mut message = header.unwrap_or_default();
        for w in &warnings {
            if !message.is_empty() {
                message.push('\n');
            }
            let _ = write!(message, "{} | {}", w.function().line_number, w.message());
        }
        if message.is_empty() {
            Vec::new()
        } else {
            vec![Annotation::warning(message).in_file(path)]
        }
    }

    fn file_header(&self, last: &File, current: &File) -> Option<String> {
        if current.covered_lines == 0 {
            return Some("File is not covered.".to_string());
        }
        if current.covered_lines >= last.covered_lines {
            return None;
        }
        let detail = if self.config.meter_loc {
            format!(
                "covered {}LOC, was {}LOC.",
                current.covered_lines, last.covered_lines
            )
        } else {
            format!(
                "covered {}%, was {}%.",
                lines_percent(current.covered_lines, current.executable_lines),
                lines_percent(last.covered_lines, last.executable_lines)
            )
        };
        Some(format!("File coverage is reduced: {detail}"))
    }
}
