//! Side-channel progress file polled by the launcher.
//!
//! Each update appends `<permille>` on its own line and flushes, so a reader
//! tailing the file always sees the latest completed fraction.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::Result;

pub struct ProgressTracker {
    path: PathBuf,
    total: usize,
    count: usize,
    writer: Option<BufWriter<File>>,
}

impl ProgressTracker {
    /// The file is not created until the first [`update`](Self::update).
    pub fn new(path: PathBuf, total: usize) -> Self {
        Self {
            path,
            total,
            count: 0,
            writer: None,
        }
    }

    /// Record one more finished unit and return the new permille.
    pub fn update(&mut self) -> Result<u64> {
        if self.writer.is_none() {
            self.writer = Some(BufWriter::new(File::create(&self.path)?));
        }
        self.count += 1;
        let permille = if self.total == 0 {
            1000
        } else {
            (self.count as u64 * 1000) / self.total as u64
        };
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "<{permille}>")?;
            writer.flush()?;
        }
        Ok(permille)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
