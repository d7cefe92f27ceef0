use std::path::PathBuf;

use crate::error::ConfigError;

/// Immutable configuration for one search invocation.
///
/// Constructed once by the caller (typically a CLI front-end) and shared
/// read-only with every worker for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// The search needle. Never empty.
    pub term: String,
    /// Which of the three matcher strategies to apply.
    pub mode: SearchMode,
    /// How candidate files are discovered.
    pub source: Source,
    /// How match blocks are rendered.
    pub output: OutputFormat,
    /// Number of worker threads. Always >= 1.
    pub threads: usize,
    /// Whether ANSI color escapes may be emitted (subject to `output`).
    pub colors_enabled: bool,
}

/// Matching strategy selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    CaseSensitive,
    CaseInsensitive,
    Regex,
}

/// File discovery strategy selected for a run.
#[derive(Debug, Clone)]
pub enum Source {
    /// Recursive directory walk rooted at the given path.
    AllFiles(PathBuf),
    /// Paths reported by `git ls-files`, resolved against the given root.
    GitFiles(PathBuf),
}

impl Source {
    /// The root directory this source is anchored to, regardless of variant.
    pub fn root(&self) -> &std::path::Path {
        match self {
            Source::AllFiles(root) | Source::GitFiles(root) => root,
        }
    }
}

/// Output rendering selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Piped,
    Html,
}

/// Default thread count when the caller does not pin one: bounded so a huge
/// machine doesn't spawn hundreds of workers for a modest search tree.
pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(8)
}

impl SearchOptions {
    /// Validate invariants that the engine assumes hold for the rest of the
    /// run. Called once by the orchestrator before any worker is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.term.is_empty() {
            return Err(ConfigError::EmptyTerm);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        let root = self.source.root();
        if !root.exists() {
            return Err(ConfigError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ConfigError::RootNotADirectory(root.to_path_buf()));
        }
        Ok(())
    }
}
