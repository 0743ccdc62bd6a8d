//! CI workflow-command lines (`::warning file=...::message`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

impl Level {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

/// A single annotation, printed as one workflow-command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub level: Level,
    /// Source file path relative to the project root.
    pub file: Option<String>,
    pub line: Option<u32>,
    /// May span several lines; escaped on output.
    pub message: String,
}

impl Annotation {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            file: None,
            line: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            ..Self::warning(message)
        }
    }

    #[must_use]
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.level.as_str())?;
        let mut sep = ' ';
        if let Some(ref file) = self.file {
            write!(f, "{sep}file={}", escape_property(file))?;
            sep = ',';
        }
        if let Some(line) = self.line {
            write!(f, "{sep}line={line}")?;
        }
        write!(f, "::{}", escape_data(&self.message))
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
