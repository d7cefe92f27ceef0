//! `srcgrep` — a recursive source-tree content search CLI.
//!
//! Thin front-end: parse argv, validate, build a `SearchOptions`, hand off
//! to `srcgrep_core::run`, and map the result to an exit code.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use srcgrep_core::{ConfigError, OutputFormat, SearchError, SearchMode, SearchOptions, Source};

#[derive(Parser, Debug)]
#[command(
    name = "srcgrep",
    version,
    about = "Recursively search a source tree for a term.",
    long_about = "Walks a directory tree (or a git-tracked file list) and prints every \
                  matching line, one formatted block per file."
)]
struct Cli {
    /// The search term (a literal string, or a regex pattern with --regex).
    term: String,

    /// Root directory to search.
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Search files tracked by `git ls-files` instead of walking the filesystem.
    #[arg(long)]
    git: bool,

    /// Case-insensitive matching.
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Treat the term as a regular expression.
    #[arg(short = 'e', long = "regex")]
    regex: bool,

    /// Render matches as an HTML fragment instead of plain text.
    #[arg(long)]
    html: bool,

    /// Render matches as stable `path:line:text` lines, for piping.
    #[arg(long)]
    pipe: bool,

    /// Number of worker threads (default: available parallelism, capped at 8).
    #[arg(long)]
    threads: Option<usize>,

    /// Disable ANSI color output even on a terminal.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("FSRC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let options = match build_options(cli) {
        Ok(options) => options,
        Err(e) => {
            error!(error = %e, "configuration error");
            eprintln!("srcgrep: {e}");
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout();
    match srcgrep_core::run(&options, stdout.lock()) {
        Ok((matched, mut out)) => {
            let _ = out.flush();
            if matched {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "search failed");
            eprintln!("srcgrep: {e}");
            ExitCode::from(2)
        }
    }
}

fn build_options(cli: Cli) -> Result<SearchOptions, SearchError> {
    if cli.html && cli.pipe {
        return Err(SearchError::Config(ConfigError::ConflictingOutputFormats));
    }

    let mode = match (cli.regex, cli.ignore_case) {
        (true, _) => SearchMode::Regex,
        (false, true) => SearchMode::CaseInsensitive,
        (false, false) => SearchMode::CaseSensitive,
    };

    let source = if cli.git {
        Source::GitFiles(cli.path)
    } else {
        Source::AllFiles(cli.path)
    };

    let output = if cli.html {
        OutputFormat::Html
    } else if cli.pipe {
        OutputFormat::Piped
    } else {
        OutputFormat::Pretty
    };

    let colors_enabled =
        !cli.no_color && output == OutputFormat::Pretty && io::stdout().is_terminal();

    let options = SearchOptions {
        term: cli.term,
        mode,
        source,
        output,
        threads: cli.threads.unwrap_or_else(srcgrep_core::default_thread_count),
        colors_enabled,
    };

    options.validate().map_err(SearchError::Config)?;
    Ok(options)
}
