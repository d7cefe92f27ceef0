//! Per-line matching strategies: case-sensitive, case-insensitive, regex.

use regex::bytes::Regex;

/// A compiled matcher, constructed once per run and shared read-only by
/// every worker.
pub enum Matcher {
    CaseSensitive(BmhNeedle),
    CaseInsensitive(BmhNeedle),
    Regex(Regex),
}

impl Matcher {
    pub fn case_sensitive(term: &[u8]) -> Matcher {
        Matcher::CaseSensitive(BmhNeedle::new(term.to_vec()))
    }

    pub fn case_insensitive(term: &[u8]) -> Matcher {
        let folded: Vec<u8> = term.iter().copied().map(fold_ascii_case).collect();
        Matcher::CaseInsensitive(BmhNeedle::new(folded))
    }

    pub fn regex(pattern: &str) -> Result<Matcher, regex::Error> {
        Ok(Matcher::Regex(Regex::new(pattern)?))
    }

    /// Append every non-overlapping match span found in `line` to `out`.
    ///
    /// Spans are ascending by `col_start`, non-overlapping, and bounded by
    /// `line.len()`. `out` is not cleared first — callers own that.
    pub fn find_spans(&self, line: &[u8], out: &mut Vec<(usize, usize)>) {
        match self {
            Matcher::CaseSensitive(needle) => needle.find_all(line, out),
            Matcher::CaseInsensitive(needle) => needle.find_all_folded(line, out),
            Matcher::Regex(re) => {
                for m in re.find_iter(line) {
                    // A zero-length match would never advance and would
                    // therefore loop forever if re-scanned; regex's find_iter
                    // already guarantees forward progress, but we still skip
                    // empty matches since they carry no useful span.
                    if m.start() < m.end() {
                        out.push((m.start(), m.end()));
                    }
                }
            }
        }
    }
}

#[inline]
fn fold_ascii_case(b: u8) -> u8 {
    if b.is_ascii_uppercase() { b | 0x20 } else { b }
}

/// A needle prepared for Boyer-Moore-Horspool scanning.
///
/// The needle stored here is already case-folded when used for
/// case-insensitive search; `find_all_folded` folds the haystack byte by
/// byte at compare time so the caller never needs to allocate a folded copy
/// of the line.
pub struct BmhNeedle {
    needle: Vec<u8>,
    /// Bad-character shift table: for each possible byte value, how far to
    /// advance the window when a mismatch occurs at the needle's last byte.
    shift: [usize; 256],
}

impl BmhNeedle {
    fn new(needle: Vec<u8>) -> BmhNeedle {
        let m = needle.len().max(1);
        let mut shift = [m; 256];
        if !needle.is_empty() {
            for (i, &b) in needle[..needle.len() - 1].iter().enumerate() {
                shift[b as usize] = needle.len() - 1 - i;
            }
        }
        BmhNeedle { needle, shift }
    }

    /// Find all non-overlapping exact matches of `self.needle` in `haystack`.
    fn find_all(&self, haystack: &[u8], out: &mut Vec<(usize, usize)>) {
        self.scan(haystack, out, |a, b| a == b);
    }

    /// Find all non-overlapping matches of `self.needle` (already folded) in
    /// `haystack`, folding haystack bytes at compare time.
    fn find_all_folded(&self, haystack: &[u8], out: &mut Vec<(usize, usize)>) {
        self.scan(haystack, out, |needle_byte, hay_byte| {
            needle_byte == fold_ascii_case(hay_byte)
        });
    }

    fn scan(
        &self,
        haystack: &[u8],
        out: &mut Vec<(usize, usize)>,
        eq: impl Fn(u8, u8) -> bool,
    ) {
        let n = self.needle.len();
        if n == 0 || haystack.len() < n {
            return;
        }

        let last = n - 1;
        let mut pos = 0usize;
        while pos + n <= haystack.len() {
            // Horspool compares from the needle's last byte backward, so a
            // mismatch on non-matching text is usually caught in one probe.
            let mut matched = true;
            let mut i = last;
            loop {
                if !eq(self.needle[i], haystack[pos + i]) {
                    matched = false;
                    break;
                }
                if i == 0 {
                    break;
                }
                i -= 1;
            }

            if matched {
                out.push((pos, pos + n));
                pos += n; // non-overlapping: resume scanning past this hit
            } else {
                // Shift by the bad-character table indexed on the haystack
                // byte aligned with the needle's last position. The table
                // guarantees a shift of at least 1, so this always advances.
                let bad = haystack[pos + last];
                pos += self.shift[bad as usize];
            }
        }
    }
}
