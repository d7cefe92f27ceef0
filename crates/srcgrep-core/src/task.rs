//! The per-file unit of work run by a pool worker: ingest, match, format.

use std::path::Path;

use crate::ingest::{self, Buffer};
use crate::matcher::Matcher;
use crate::options::{OutputFormat, SearchOptions};
use crate::printer::{self, MatchRecord};

/// Search one file and return its formatted block, or `None` if it produced
/// no matches (nothing is written to the sink for a clean file).
///
/// `buffer` is the worker's reusable scratch space; its contents are
/// overwritten by this call and only need to outlive it, not the returned
/// `String`, since `printer::format_block` resolves every `LineView` to text
/// before returning.
pub fn search_file(
    path: &Path,
    buffer: &mut Buffer,
    matcher: &Matcher,
    options: &SearchOptions,
) -> Option<String> {
    let view = ingest::read(path, buffer);
    if view.lines.is_empty() {
        return None;
    }

    let mut spans = Vec::new();
    let mut records = Vec::new();

    for (index, line) in view.lines.iter().enumerate() {
        let text = line.resolve(buffer.bytes());
        spans.clear();
        matcher.find_spans(text, &mut spans);
        if !spans.is_empty() {
            records.push(MatchRecord {
                line_number: (index + 1) as u64,
                line: *line,
                hit_spans: std::mem::take(&mut spans),
            });
        }
    }

    if records.is_empty() {
        return None;
    }

    Some(printer::format_block(
        path,
        buffer.bytes(),
        &records,
        options.output,
        options.colors_enabled,
    ))
}
