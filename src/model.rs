//! In-memory representation of an `xccov` JSON coverage report. Loaders
//! produce a `CoverageReport` for the current run and one for the baseline;
//! both are read-only for the rest of the run.

use serde::{Deserialize, Serialize};

/// Convert a 0.0–1.0 ratio into whole percent, truncating toward zero.
#[must_use]
pub fn percent(ratio: f64) -> u32 {
    // `as` saturates: NaN and negatives become 0.
    (ratio * 100.0) as u32
}

/// Whole percent of `covered / total` in integer arithmetic, 0 when the total is zero.
#[must_use]
pub fn lines_percent(covered: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    u32::try_from(covered.saturating_mul(100) / total).unwrap_or(u32::MAX)
}

/// Root of a coverage tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageReport {
    pub covered_lines: u64,
    pub executable_lines: u64,
    /// Stored ratio; may be stale relative to the counters.
    pub line_coverage: f64,
    pub targets: Vec<Target>,
}

/// A build target (app, framework, test bundle) and its files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    pub name: String,
    pub build_product_path: String,
    pub covered_lines: u64,
    pub executable_lines: u64,
    pub line_coverage: f64,
    pub files: Vec<File>,
}

/// Coverage for a single source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct File {
    pub name: String,
    /// Absolute or project-relative path.
    pub path: String,
    pub covered_lines: u64,
    pub executable_lines: u64,
    pub line_coverage: f64,
    pub functions: Vec<Function>,
}

/// A function/method within a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Function {
    pub name: String,
    pub line_number: u32,
    pub covered_lines: u64,
    pub executable_lines: u64,
    pub line_coverage: f64,
    pub execution_count: u64,
}

impl Function {
    /// Stored line coverage in whole percent.
    #[must_use]
    pub fn percent(&self) -> u32 {
        percent(self.line_coverage)
    }
}

/// Per-file pair of baseline and current line counters.
///
/// Produced once per file that passes the path filter and summed by the
/// aggregator. Counters are passed through unvalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffUnit {
    pub last_executable_lines: u64,
    pub last_covered_lines: u64,
    pub current_executable_lines: u64,
    pub current_covered_lines: u64,
}

impl DiffUnit {
    /// Pair the counters of a baseline file with those of its current counterpart.
    #[must_use]
    pub fn between(last: &File, current: &File) -> Self {
        Self {
            last_executable_lines: last.executable_lines,
            last_covered_lines: last.covered_lines,
            current_executable_lines: current.executable_lines,
            current_covered_lines: current.covered_lines,
        }
    }

    /// Report-wide counters, used when masked files are included in totals.
    #[must_use]
    pub fn between_reports(last: &CoverageReport, current: &CoverageReport) -> Self {
        Self {
            last_executable_lines: last.executable_lines,
            last_covered_lines: last.covered_lines,
            current_executable_lines: current.executable_lines,
            current_covered_lines: current.covered_lines,
        }
    }

    /// Pointwise sum. Saturates instead of wrapping on absurd input.
    pub fn add(&mut self, other: &DiffUnit) {
        self.last_executable_lines = self
            .last_executable_lines
            .saturating_add(other.last_executable_lines);
        self.last_covered_lines = self.last_covered_lines.saturating_add(other.last_covered_lines);
        self.current_executable_lines = self
            .current_executable_lines
            .saturating_add(other.current_executable_lines);
        self.current_covered_lines = self
            .current_covered_lines
            .saturating_add(other.current_covered_lines);
    }

    #[must_use]
    pub fn last_percent(&self) -> u32 {
        lines_percent(self.last_covered_lines, self.last_executable_lines)
    }

    #[must_use]
    pub fn current_percent(&self) -> u32 {
        lines_percent(self.current_covered_lines, self.current_executable_lines)
    }
}
