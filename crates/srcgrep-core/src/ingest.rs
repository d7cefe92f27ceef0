//! Per-file text ingestion: open, size-check, binary-reject, line-split.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use srcgrep_lines::LineView;
use tracing::{debug, warn};

/// Number of leading bytes inspected by the binary heuristic.
const BINARY_SNIFF_LEN: usize = 100;

/// Files larger than this are skipped outright rather than risking an
/// unbounded Buffer grow. 512 MiB comfortably covers any real source file.
const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// The ingest result for one file.
///
/// An empty `FileView` (`lines` is empty) represents every non-fatal failure
/// mode uniformly: missing file, I/O error, empty file, binary content, or a
/// file that exceeded `MAX_FILE_SIZE`. Callers treat all of these as "no
/// matches" without distinguishing the cause.
pub struct FileView {
    pub size: usize,
    pub lines: Vec<LineView>,
}

impl FileView {
    fn empty() -> FileView {
        FileView {
            size: 0,
            lines: Vec::new(),
        }
    }
}

/// A per-worker growable byte buffer, reused across every file that worker
/// ingests. Grows monotonically; never shrinks.
#[derive(Default)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    pub fn new() -> Buffer {
        Buffer { bytes: Vec::new() }
    }

    /// The bytes currently held, valid until the next `read` call reuses
    /// this buffer for a different file.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn fill_from(&mut self, file: &mut File, size: usize) -> std::io::Result<bool> {
        self.bytes.clear();
        self.bytes.resize(size, 0);
        let mut read_total = 0;
        while read_total < size {
            let n = file.read(&mut self.bytes[read_total..])?;
            if n == 0 {
                break;
            }
            read_total += n;
        }
        Ok(read_total == size)
    }
}

/// Ingest a single file using `buffer` as scratch space.
///
/// On any failure (open, stat, short read, binary content, oversized file)
/// this returns an empty `FileView` rather than propagating an error — see
/// the module-level error handling policy: per-file failures are local and
/// non-fatal to the run.
pub fn read(path: &Path, buffer: &mut Buffer) -> FileView {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to open file");
            return FileView::empty();
        }
    };

    let metadata = match file.metadata() {
        Ok(m) => m,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to stat file");
            return FileView::empty();
        }
    };

    let size = metadata.len();
    if size == 0 {
        return FileView::empty();
    }
    if size > MAX_FILE_SIZE {
        warn!(
            path = %path.display(),
            size,
            limit = MAX_FILE_SIZE,
            "skipping oversized file"
        );
        return FileView::empty();
    }

    let size = size as usize;
    match buffer.fill_from(&mut file, size) {
        Ok(true) => {}
        Ok(false) => {
            debug!(path = %path.display(), "short read, treating as unreadable");
            return FileView::empty();
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "read error");
            return FileView::empty();
        }
    }

    if looks_binary(&buffer.bytes) {
        debug!(path = %path.display(), "binary content detected, skipping");
        return FileView::empty();
    }

    let lines = srcgrep_lines::split(&buffer.bytes);
    FileView { size, lines }
}

/// The binary heuristic from the module docs: cheap, front-loaded, and
/// deliberately approximate. Text files essentially never trip it; binary
/// files essentially always do.
fn looks_binary(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];

    if window.starts_with(b"%PDF") || window.starts_with(b"%!PS") {
        return true;
    }

    memchr::memmem::find(window, b"\x00\x00").is_some()
}
