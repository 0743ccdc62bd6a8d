//! Overall pass/fail decision from aggregated totals.

use std::fmt;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::model::{CoverageReport, DiffUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decreased,
    Increased,
    NotChanged,
}

impl Direction {
    #[must_use]
    pub fn between(last_percent: u32, current_percent: u32) -> Self {
        match last_percent.cmp(&current_percent) {
            std::cmp::Ordering::Greater => Direction::Decreased,
            std::cmp::Ordering::Less => Direction::Increased,
            std::cmp::Ordering::Equal => Direction::NotChanged,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Decreased => "decreased",
            Direction::Increased => "increased",
            Direction::NotChanged => "not changed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Passes, but the message is surfaced as a warning annotation.
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub direction: Direction,
    pub outcome: Outcome,
    pub last_percent: u32,
    pub current_percent: u32,
    /// Summary without any workflow-command prefix.
    pub message: String,
}

impl Verdict {
    /// Decide on the walk's aggregated totals. With `include_masked` the
    /// report-wide counters are used instead.
    #[must_use]
    pub fn decide(
        config: &Config,
        aggregated: &DiffUnit,
        last: &CoverageReport,
        current: &CoverageReport,
    ) -> Self {
        let totals = if config.include_masked {
            DiffUnit::between_reports(last, current)
        } else {
            *aggregated
        };
        let last_percent = totals.last_percent();
        let current_percent = totals.current_percent();
        let direction = Direction::between(last_percent, current_percent);

        let (current_msg, last_msg) = if config.meter_loc {
            (
                format!("currently covered {}LOC", totals.current_covered_lines),
                format!("last coverage was {}LOC", totals.last_covered_lines),
            )
        } else {
            (
                format!("currently covered {current_percent}%"),
                format!("last coverage was {last_percent}%"),
            )
        };
        let last_msg = if last.targets.is_empty() {
            "last coverage is unavailable".to_string()
        } else {
            last_msg
        };
        let message = format!(
            "Code coverage is {}: {current_msg}, {last_msg}.",
            direction.as_str()
        );

        let dropped_too_far = last_percent > current_percent.saturating_add(config.tolerance);
        let outcome = if dropped_too_far || (current_percent == 0 && !config.zero_warn_only) {
            Outcome::Fail
        } else if current_percent == 0 {
            Outcome::Warn
        } else {
            Outcome::Pass
        };

        Self {
            direction,
            outcome,
            last_percent,
            current_percent,
            message,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Fail
    }

    /// Process exit status for this verdict.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_failure() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Fail => write!(f, "{}", Annotation::error(self.message.as_str())),
            Outcome::Warn => write!(f, "{}", Annotation::warning(self.message.as_str())),
            Outcome::Pass => f.write_str(&self.message),
        }
    }
}
