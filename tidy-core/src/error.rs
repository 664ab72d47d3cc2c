use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, TidyError>;

/// Failures that are not plain non-conformance.
///
/// A file that breaks a rule is reported through `Ok(false)`. Everything here
/// means either the environment is broken (missing or unwritable files) or the
/// tool itself is misconfigured.
#[derive(Debug, thiserror::Error)]
pub enum TidyError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {index} is out of range for '{}' ({len} lines)", path.display())]
    LineOutOfRange {
        path: PathBuf,
        index: usize,
        len: usize,
    },

    #[error("Unknown rule ID: {0}")]
    UnknownRule(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TidyError {
    /// True for errors caused by the tool's own setup rather than the checked files.
    pub fn is_config(&self) -> bool {
        matches!(self, TidyError::UnknownRule(_) | TidyError::Config(_))
    }
}
