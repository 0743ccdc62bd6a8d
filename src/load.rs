//! Reading `xccov` JSON reports from disk or stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Result, XcccrError};
use crate::model::CoverageReport;

/// Resolve `path` against `workdir` unless it is already absolute.
#[must_use]
pub fn resolve_path(workdir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    }
}

pub fn parse_report(content: &[u8]) -> Result<CoverageReport> {
    Ok(serde_json::from_slice(content)?)
}

pub fn read_report(path: &Path) -> Result<CoverageReport> {
    let content = std::fs::read(path)?;
    parse_report(&content)
}

/// Load the current report from `path`, or from `stdin` when the path is
/// absent or `-`. An interactive stdin has nothing piped into it and is
/// never read.
pub fn read_current(
    path: Option<&Path>,
    stdin: &mut dyn Read,
    interactive: bool,
) -> Result<CoverageReport> {
    match path {
        Some(p) if p != Path::new("-") => read_report(p),
        _ if interactive => Err(XcccrError::NoCurrentReport),
        _ => {
            let mut content = Vec::new();
            stdin.read_to_end(&mut content)?;
            if content.iter().all(u8::is_ascii_whitespace) {
                return Err(XcccrError::NoCurrentReport);
            }
            parse_report(&content)
        }
    }
}

/// Load the baseline. No path or a missing file yields an empty report.
pub fn read_last(path: Option<&Path>) -> Result<CoverageReport> {
    let Some(path) = path else {
        return Ok(CoverageReport::default());
    };
    match read_report(path) {
        Err(XcccrError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                path = %path.display(),
                "previous report not found, continuing with current report only"
            );
            Ok(CoverageReport::default())
        }
        other => other,
    }
}
