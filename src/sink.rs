//! Fan-out output sink shared by every worker.
//!
//! Results always go to stdout; an optional file (truncate or append mode)
//! receives a simultaneous copy. `write_block` is the unit of atomicity:
//! one call per URL, guarded by a lock, so blocks from concurrent workers
//! never interleave.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Serialized multi-destination writer for scan output.
pub struct OutputSink {
    writers: Mutex<Vec<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub fn stdout_only() -> Self {
        Self::from_writers(vec![Box::new(std::io::stdout())])
    }

    /// Stdout plus a copy in `path`, truncated or appended per `append`.
    /// The file is opened once here and held for the life of the process;
    /// failure to open is fatal to the caller.
    pub fn with_file(path: &Path, append: bool) -> Result<Self> {
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)
        } else {
            File::create(path)
        }
        .with_context(|| format!("open output file {}", path.display()))?;

        Ok(Self::from_writers(vec![
            Box::new(std::io::stdout()),
            Box::new(file),
        ]))
    }

    pub fn from_writers(writers: Vec<Box<dyn Write + Send>>) -> Self {
        Self {
            writers: Mutex::new(writers),
        }
    }

    /// Write one result block to every destination in a single critical
    /// section. Write failures on a destination are logged, not propagated;
    /// a full disk must not kill the scan.
    pub fn write_block(&self, block: &str) {
        let mut writers = match self.writers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for writer in writers.iter_mut() {
            if let Err(e) = writer.write_all(block.as_bytes()).and_then(|_| writer.flush()) {
                debug!("sink write failed: {e}");
            }
        }
    }
}
