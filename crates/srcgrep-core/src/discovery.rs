//! Candidate file discovery: either a recursive directory walk or the file
//! list reported by `git ls-files`.

use std::path::{Path, PathBuf};
use std::process::Command;

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::options::Source;

/// Stream every candidate path for `source`, calling `visit` once per file.
///
/// Discovery never fails the run: a broken `git` invocation or an
/// unreadable subtree yields fewer candidates, logged at `warn`, rather than
/// aborting the search.
pub fn discover(source: &Source, mut visit: impl FnMut(PathBuf)) {
    match source {
        Source::AllFiles(root) => discover_all_files(root, &mut visit),
        Source::GitFiles(root) => discover_git_files(root, &mut visit),
    }
}

/// Walk `root` recursively, yielding regular files only.
///
/// `ignore`'s gitignore-aware filtering is disabled entirely: `AllFiles`
/// means every file under the tree, dotfiles included. `.` and `..` are
/// never yielded by the underlying directory reader; `.git` is pruned
/// explicitly via an override, since turning off the standard filters would
/// otherwise walk straight into VCS metadata.
fn discover_all_files(root: &Path, visit: &mut impl FnMut(PathBuf)) {
    let mut overrides = OverrideBuilder::new(root);
    overrides
        .add("!.git")
        .expect("literal glob pattern is always valid");
    let overrides = overrides.build().expect("override set always builds");

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .overrides(overrides)
        .build();

    for entry in walker {
        match entry {
            Ok(entry) => {
                let is_file = entry
                    .file_type()
                    .map(|ft| ft.is_file())
                    .unwrap_or(false);
                if is_file {
                    visit(entry.into_path());
                }
            }
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
            }
        }
    }
}

/// List `git ls-files` output, resolved against `root`.
///
/// A non-zero exit or unparseable output yields an empty candidate set
/// rather than falling back to a full walk — `--git` means "what git
/// tracks", and silently widening that scope would be surprising. Per the
/// VCS listing contract, the subprocess's stdout is treated as a plain
/// `\n`-terminated line list with no quoting of special characters.
fn discover_git_files(root: &Path, visit: &mut impl FnMut(PathBuf)) {
    let output = Command::new("git").arg("-C").arg(root).arg("ls-files").output();

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            warn!(error = %e, "failed to invoke git, yielding no candidates");
            return;
        }
    };

    if !output.status.success() {
        warn!(
            status = %output.status,
            "git ls-files exited non-zero, yielding no candidates"
        );
        return;
    }

    for line in output.stdout.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let rel = match std::str::from_utf8(line) {
            Ok(s) => s,
            Err(_) => {
                debug!("skipping non-UTF-8 path from git ls-files");
                continue;
            }
        };
        visit(root.join(rel));
    }
}
