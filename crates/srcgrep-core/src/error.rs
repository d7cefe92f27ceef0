use std::path::PathBuf;

/// Errors that prevent a search from starting at all: no workers are ever
/// spawned when one of these occurs.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("root path does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("root path is not a directory: {0}")]
    RootNotADirectory(PathBuf),
    #[error("search term must not be empty")]
    EmptyTerm,
    #[error("thread count must be at least 1")]
    ZeroThreads,
    #[error("--html and --pipe cannot be used together")]
    ConflictingOutputFormats,
}

/// Top-level error returned by a search run.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to compile regex: {0}")]
    RegexCompile(#[from] regex::Error),
    #[error("failed to write search output: {0}")]
    SinkWrite(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
