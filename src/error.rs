use thiserror::Error;

#[derive(Error, Debug)]
pub enum XcccrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Filter pattern (aka regexp) is invalid: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Tolerance must be an int in range 0 to 100, got {0}")]
    Tolerance(i64),

    #[error("No data passed to report coverage")]
    NoCurrentReport,
}

pub type Result<T> = std::result::Result<T, XcccrError>;
