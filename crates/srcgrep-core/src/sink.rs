//! The shared output destination every worker writes formatted blocks to.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::error;

/// Serializes writes from every worker onto one underlying writer.
///
/// Each call to `write_block` writes its argument in one lock acquisition,
/// so blocks never interleave even though workers finish in whatever order
/// they happen to finish in. A write failure (e.g. a broken pipe) is
/// reported to stderr once; every write after that is silently discarded
/// rather than logging once per remaining file.
pub struct Sink<W: Write> {
    writer: Mutex<W>,
    failed: AtomicBool,
}

impl<W: Write> Sink<W> {
    pub fn new(writer: W) -> Sink<W> {
        Sink {
            writer: Mutex::new(writer),
            failed: AtomicBool::new(false),
        }
    }

    /// Write one complete block atomically with respect to other callers.
    pub fn write_block(&self, block: &str) -> std::io::Result<()> {
        let result = {
            let mut w = self.writer.lock().unwrap();
            w.write_all(block.as_bytes())
        };
        if let Err(e) = &result {
            if !self.failed.swap(true, Ordering::AcqRel) {
                error!(error = %e, "output sink write failed, discarding further writes");
            }
        }
        result
    }

    pub fn flush(&self) -> std::io::Result<()> {
        self.writer.lock().unwrap().flush()
    }

    /// Recover the underlying writer once every other handle has been
    /// dropped. Panics if another `Arc` clone is still alive, which would
    /// indicate a worker outlived the pool drain.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap()
    }
}
