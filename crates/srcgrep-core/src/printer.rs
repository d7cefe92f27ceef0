//! Rendering of one file's matches into a single formatted block.
//!
//! A block is the unit the orchestrator writes to the sink atomically, so
//! formatting happens here entirely in-memory and returns one owned
//! `String` per file.

use std::fmt::Write as _;
use std::path::Path;

use srcgrep_lines::LineView;

use crate::options::OutputFormat;

/// One matched line within a file, still borrowing from the worker's buffer.
pub struct MatchRecord {
    pub line_number: u64,
    pub line: LineView,
    pub hit_spans: Vec<(usize, usize)>,
}

/// ANSI SGR escape codes, indexed by `Color` — a constant lookup table built
/// once rather than a runtime `Color -> String` map.
#[derive(Clone, Copy)]
enum Color {
    Blue,
    Red,
}

const ANSI_RESET: &str = "\x1b[0m";

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Color::Blue => "\x1b[34m",
            Color::Red => "\x1b[31m",
        }
    }
}

/// Render the complete block for one file's matches.
///
/// `buffer` is the worker's ingest buffer the `LineView`s in `matches`
/// borrow from; it must still be valid (not yet reused for the next file).
pub fn format_block(
    path: &Path,
    buffer: &[u8],
    matches: &[MatchRecord],
    output: OutputFormat,
    colors_enabled: bool,
) -> String {
    match output {
        OutputFormat::Pretty => format_pretty(path, buffer, matches, colors_enabled),
        OutputFormat::Piped => format_piped(path, buffer, matches),
        OutputFormat::Html => format_html(path, buffer, matches),
    }
}

fn format_pretty(path: &Path, buffer: &[u8], matches: &[MatchRecord], colors: bool) -> String {
    let mut out = String::new();

    if colors {
        let _ = writeln!(out, "{}{}{}", Color::Blue.ansi(), path.display(), ANSI_RESET);
    } else {
        let _ = writeln!(out, "{}", path.display());
    }

    for m in matches {
        let line_bytes = m.line.resolve(buffer);
        let _ = write!(out, "{}: ", m.line_number);
        write_highlighted(&mut out, line_bytes, &m.hit_spans, |s, span_bytes| {
            if colors {
                let _ = write!(
                    s,
                    "{}{}{}",
                    Color::Red.ansi(),
                    String::from_utf8_lossy(span_bytes),
                    ANSI_RESET
                );
            } else {
                s.push_str(&String::from_utf8_lossy(span_bytes));
            }
        });
        out.push('\n');
    }
    out.push('\n');
    out
}

fn format_piped(path: &Path, buffer: &[u8], matches: &[MatchRecord]) -> String {
    let mut out = String::new();
    for m in matches {
        let line_text = String::from_utf8_lossy(m.line.resolve(buffer));
        let _ = writeln!(out, "{}:{}:{}", path.display(), m.line_number, line_text);
    }
    out
}

fn format_html(path: &Path, buffer: &[u8], matches: &[MatchRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h3>{}</h3>", html_escape(&path.display().to_string()));

    for m in matches {
        let line_bytes = m.line.resolve(buffer);
        let _ = write!(out, "<pre>{}: ", m.line_number);
        write_highlighted(&mut out, line_bytes, &m.hit_spans, |s, span_bytes| {
            let _ = write!(
                s,
                "<span class=\"hit\">{}</span>",
                html_escape(&String::from_utf8_lossy(span_bytes))
            );
        });
        out.push_str("</pre>\n");
    }
    out
}

/// Walk `line` once, writing untouched spans verbatim and delegating
/// highlighted spans to `wrap_hit`. Spans are assumed sorted and
/// non-overlapping, per the matcher's contract.
///
/// Each segment is lossy-decoded independently rather than decoding the
/// whole line up front: hit spans are computed against raw byte offsets
/// (the matcher operates on bytes, not chars), and a global lossy decode
/// would shift those offsets the moment any invalid byte earlier in the
/// line gets replaced. Decoding segment-by-segment keeps every slice
/// boundary valid no matter where the matcher's spans landed.
fn write_highlighted(
    out: &mut String,
    line: &[u8],
    hit_spans: &[(usize, usize)],
    wrap_hit: impl Fn(&mut String, &[u8]),
) {
    let mut cursor = 0usize;
    for &(start, end) in hit_spans {
        if start > cursor {
            out.push_str(&String::from_utf8_lossy(&line[cursor..start]));
        }
        wrap_hit(out, &line[start..end]);
        cursor = end;
    }
    if cursor < line.len() {
        out.push_str(&String::from_utf8_lossy(&line[cursor..]));
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line_number: u64, start: usize, len: usize, spans: Vec<(usize, usize)>) -> MatchRecord {
        MatchRecord {
            line_number,
            line: LineView::new(start, len),
            hit_spans: spans,
        }
    }

    #[test]
    fn piped_format_matches_stable_contract() {
        let buffer = b"hello\nworld\n";
        let matches = vec![record(2, 6, 5, vec![(0, 5)])];
        let block = format_piped(Path::new("a.txt"), buffer, &matches);
        assert_eq!(block, "a.txt:2:world\n");
    }

    #[test]
    fn pretty_format_without_colors_has_no_escapes() {
        let buffer = b"hello world\n";
        let matches = vec![record(1, 0, 11, vec![(6, 11)])];
        let block = format_pretty(Path::new("a.txt"), buffer, &matches, false);
        assert!(!block.contains('\x1b'));
        assert!(block.contains("1: hello world"));
    }

    #[test]
    fn pretty_format_with_colors_wraps_hits_in_red() {
        let buffer = b"hello world\n";
        let matches = vec![record(1, 0, 11, vec![(6, 11)])];
        let block = format_pretty(Path::new("a.txt"), buffer, &matches, true);
        assert!(block.contains("\x1b[31mworld\x1b[0m"));
        assert!(block.contains("\x1b[34ma.txt\x1b[0m"));
    }

    #[test]
    fn html_format_wraps_hits_in_span_and_escapes() {
        let buffer = b"a < b\n";
        let matches = vec![record(1, 0, 5, vec![(2, 3)])];
        let block = format_html(Path::new("a.txt"), buffer, &matches);
        assert!(block.contains("<h3>a.txt</h3>"));
        assert!(block.contains("<span class=\"hit\">&lt;</span>"));
    }

    #[test]
    fn invalid_utf8_before_a_hit_does_not_panic_or_misalign() {
        // 0xFF is never valid UTF-8 on its own; it precedes the hit span,
        // so a naive whole-line lossy decode would shift the byte offsets
        // the hit span was computed against.
        let buffer = b"\xffab needle\n";
        let matches = vec![record(1, 0, 10, vec![(4, 10)])];
        let block = format_pretty(Path::new("a.txt"), buffer, &matches, false);
        assert!(block.contains("needle"));
    }

    #[test]
    fn blank_line_separates_pretty_blocks() {
        let buffer = b"x\n";
        let matches = vec![record(1, 0, 1, vec![(0, 1)])];
        let block = format_pretty(Path::new("a.txt"), buffer, &matches, false);
        assert!(block.ends_with("\n\n"));
    }
}
