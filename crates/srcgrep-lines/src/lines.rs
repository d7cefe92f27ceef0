use bstr::ByteSlice;

use crate::LineView;

/// Initial capacity hint for the line vector, tuned for typical source files.
const DEFAULT_LINES_CAPACITY: usize = 128;

/// Split `bytes` into a fresh vector of `LineView`s.
///
/// Empty input yields an empty vector. A trailing line with no terminator is
/// included. CR bytes immediately preceding a line feed are stripped from the
/// returned view.
pub fn split(bytes: &[u8]) -> Vec<LineView> {
    let mut out = Vec::with_capacity(DEFAULT_LINES_CAPACITY);
    split_into(bytes, &mut out);
    out
}

/// Like [`split`], but appends into a caller-provided vector instead of
/// allocating a fresh one. The vector is cleared first.
///
/// Reusing a vector across calls (e.g. one per worker) avoids an allocation
/// per file in steady state.
pub fn split_into(bytes: &[u8], out: &mut Vec<LineView>) {
    out.clear();
    if bytes.is_empty() {
        return;
    }

    let mut step = LineStep::new(0, bytes.len());
    while let Some((start, end)) = step.next(bytes) {
        out.push(LineView::new(start, end - start));
    }
}

/// An explicit cursor over line boundaries in a byte slice.
///
/// Mirrors the line-stepping approach used by line-oriented search engines:
/// find the next `\n` with a vectorized scan, and treat everything since the
/// previous boundary (minus a trailing `\r`) as one line. The final line, if
/// unterminated, is still yielded.
struct LineStep {
    pos: usize,
    end: usize,
}

impl LineStep {
    fn new(start: usize, end: usize) -> LineStep {
        LineStep { pos: start, end }
    }

    /// Returns the `(start, end)` byte range of the next line, with any
    /// trailing `\r\n` or `\n` excluded from the range.
    #[inline]
    fn next(&mut self, bytes: &[u8]) -> Option<(usize, usize)> {
        if self.pos >= self.end {
            return None;
        }

        let hay = &bytes[self.pos..self.end];
        match hay.find_byte(b'\n') {
            Some(rel_nl) => {
                let line_start = self.pos;
                let nl_pos = self.pos + rel_nl;
                let mut line_end = nl_pos;
                if line_end > line_start && bytes[line_end - 1] == b'\r' {
                    line_end -= 1;
                }
                self.pos = nl_pos + 1;
                Some((line_start, line_end))
            }
            None => {
                let line_start = self.pos;
                self.pos = self.end;
                Some((line_start, self.end))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        split(text.as_bytes())
            .into_iter()
            .map(|v| std::str::from_utf8(v.resolve(text.as_bytes())).unwrap())
            .collect()
    }

    #[test]
    fn empty_buffer_has_no_lines() {
        assert_eq!(lines(""), Vec::<&str>::new());
    }

    #[test]
    fn no_trailing_newline() {
        assert_eq!(lines("abc"), vec!["abc"]);
        assert_eq!(lines("abc\nxyz"), vec!["abc", "xyz"]);
    }

    #[test]
    fn trailing_newline() {
        assert_eq!(lines("abc\n"), vec!["abc"]);
        assert_eq!(lines("abc\nxyz\n"), vec!["abc", "xyz"]);
    }

    #[test]
    fn blank_lines_are_preserved() {
        assert_eq!(lines("abc\n\n"), vec!["abc", ""]);
        assert_eq!(lines("abc\n\n\n"), vec!["abc", "", ""]);
        assert_eq!(lines("\n"), vec![""]);
    }

    #[test]
    fn crlf_is_stripped() {
        assert_eq!(lines("alpha\r\nbeta\r\n"), vec!["alpha", "beta"]);
        // A lone CR not followed by LF is not a terminator and stays in the line.
        assert_eq!(lines("a\rb\n"), vec!["a\rb"]);
    }

    #[test]
    fn round_trip_without_cr() {
        // Property 1: joining split(b) with '\n' and appending a trailing
        // '\n' iff b ends with '\n' reproduces b, for any b with no '\r'.
        for text in ["", "a", "a\n", "a\nb", "a\nb\n", "\n\n\n", "a\n\nb"] {
            let bytes = text.as_bytes();
            let parts = lines(text);
            let mut rebuilt = parts.join("\n");
            if text.ends_with('\n') {
                rebuilt.push('\n');
            }
            assert_eq!(rebuilt.as_bytes(), bytes, "failed for {text:?}");
        }
    }
}
