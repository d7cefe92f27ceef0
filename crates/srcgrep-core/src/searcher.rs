//! Top-level orchestration: validate options, discover candidates, fan them
//! out across the worker pool, and report whether anything matched.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::discovery;
use crate::error::{Result, SearchError};
use crate::matcher::Matcher;
use crate::options::{SearchMode, SearchOptions};
use crate::pool::WorkerPool;
use crate::sink::Sink;
use crate::task;

/// Run one search to completion, writing formatted blocks to `writer`.
///
/// Returns the recovered writer alongside `true` if at least one file
/// matched, `false` if the search completed cleanly with no matches, or
/// `Err` if `options` failed validation or the regex pattern failed to
/// compile.
#[tracing::instrument(skip(options, writer), fields(term = %options.term, threads = options.threads))]
pub fn run<W: Write + Send + 'static>(options: &SearchOptions, writer: W) -> Result<(bool, W)> {
    options.validate().map_err(SearchError::Config)?;

    let matcher = build_matcher(options)?;

    info!(
        term = %options.term,
        threads = options.threads,
        "starting search"
    );

    let sink = Arc::new(Sink::new(writer));
    let matcher = Arc::new(matcher);
    let options = Arc::new(options.clone());
    let match_found = Arc::new(AtomicBool::new(false));

    {
        let pool = WorkerPool::new(options.threads);
        discovery::discover(&options.source, |path| {
            let matcher = Arc::clone(&matcher);
            let options = Arc::clone(&options);
            let sink = Arc::clone(&sink);
            let match_found = Arc::clone(&match_found);

            let submitted = pool.submit(move |buffer| {
                if let Some(block) = task::search_file(&path, buffer, &matcher, &options) {
                    match_found.store(true, Ordering::Relaxed);
                    let _ = sink.write_block(&block);
                }
            });
            // The pool never begins draining before this scope ends, so
            // submission cannot fail here; a `PoolClosed` would only
            // indicate a bug in how the pool's lifetime is managed.
            debug_assert!(submitted.is_ok());
        });
        // Dropping the pool here blocks until every submitted task has run.
    }

    sink.flush().map_err(SearchError::SinkWrite)?;
    info!(matched = match_found.load(Ordering::Relaxed), "search complete");

    let matched = match_found.load(Ordering::Relaxed);
    let sink = Arc::try_unwrap(sink).unwrap_or_else(|_| {
        unreachable!("all worker-held clones are dropped before the pool scope ends")
    });
    Ok((matched, sink.into_inner()))
}

fn build_matcher(options: &SearchOptions) -> std::result::Result<Matcher, SearchError> {
    match options.mode {
        SearchMode::CaseSensitive => Ok(Matcher::case_sensitive(options.term.as_bytes())),
        SearchMode::CaseInsensitive => Ok(Matcher::case_insensitive(options.term.as_bytes())),
        SearchMode::Regex => Matcher::regex(&options.term).map_err(SearchError::RegexCompile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::options::{OutputFormat, Source};
    use std::fs;

    fn base_options(root: std::path::PathBuf, term: &str) -> SearchOptions {
        SearchOptions {
            term: term.to_string(),
            mode: SearchMode::CaseSensitive,
            source: Source::AllFiles(root),
            output: OutputFormat::Piped,
            threads: 2,
            colors_enabled: false,
        }
    }

    #[test]
    fn search_with_matches_reports_true_and_writes_blocks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"needle here\n").unwrap();
        fs::write(dir.path().join("b.txt"), b"nothing here\n").unwrap();

        let options = base_options(dir.path().to_path_buf(), "needle");
        let (matched, out) = run(&options, Vec::new()).unwrap();
        assert!(matched);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a.txt"));
        assert!(!text.contains("b.txt"));
    }

    #[test]
    fn search_with_no_matches_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"nothing interesting\n").unwrap();

        let options = base_options(dir.path().to_path_buf(), "needle");
        let (matched, out) = run(&options, Vec::new()).unwrap();
        assert!(!matched);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_root_surfaces_config_error() {
        let options = base_options(std::path::PathBuf::from("/no/such/root"), "needle");
        let err = run(&options, Vec::new()).unwrap_err();
        assert!(matches!(err, SearchError::Config(ConfigError::RootNotFound(_))));
    }

    #[test]
    fn bad_regex_surfaces_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = base_options(dir.path().to_path_buf(), "(unclosed");
        options.mode = SearchMode::Regex;
        let err = run(&options, Vec::new()).unwrap_err();
        assert!(matches!(err, SearchError::RegexCompile(_)));
    }
}
