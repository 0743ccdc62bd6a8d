//! One comparison run: walk, aggregate, decide.

use crate::aggregate::{Aggregator, Snapshot};
use crate::annotation::Annotation;
use crate::config::Config;
use crate::error::Result;
use crate::model::{CoverageReport, DiffUnit};
use crate::verdict::Verdict;
use crate::walker::{WalkSink, Walker};

/// Result of a comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub verdict: Verdict,
    /// Filtered totals as merged by the aggregator.
    pub totals: Snapshot,
}

struct Streaming<'e> {
    aggregator: Aggregator,
    emit: &'e mut dyn FnMut(Annotation),
}

impl WalkSink for Streaming<'_> {
    fn unit(&mut self, unit: DiffUnit) {
        self.aggregator.merge(unit);
    }

    fn annotate(&mut self, annotation: Annotation) {
        (self.emit)(annotation);
    }
}

/// Compare `current` against the `last` baseline. Annotations are handed to
/// `emit` as soon as each file is processed; the verdict comes last.
pub fn compare(
    config: &Config,
    last: &CoverageReport,
    current: &CoverageReport,
    emit: &mut dyn FnMut(Annotation),
) -> Result<Comparison> {
    let mut sink = Streaming {
        aggregator: Aggregator::spawn()?,
        emit,
    };
    Walker::new(config).walk(last, current, &mut sink);

    let totals = sink.aggregator.snapshot();
    sink.aggregator.finish();
    tracing::debug!(merged = totals.merged, total = ?totals.total, "walk complete");

    let verdict = Verdict::decide(config, &totals.total, last, current);
    Ok(Comparison { verdict, totals })
}

/// Like [`compare`], but collects the annotations.
pub fn compare_collect(
    config: &Config,
    last: &CoverageReport,
    current: &CoverageReport,
) -> Result<(Vec<Annotation>, Comparison)> {
    let mut annotations = Vec::new();
    let comparison = compare(config, last, current, &mut |a| annotations.push(a))?;
    Ok((annotations, comparison))
}
