//! File-backed report sink.
//!
//! The analysis report is an append-only text file. [`ReportWriter`] is the
//! concrete sink; [`GlobalReport`] exposes one process-wide instance behind
//! the [`TraceSink`] interface for callers that want a single shared report.

use crate::trace::TraceSink;
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Append-only line sink backed by a file.
#[derive(Debug)]
pub struct ReportWriter {
    file: File,
    path: String,
}

impl ReportWriter {
    /// Creates (or truncates) the report file.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file,
            path: path.display().to_string(),
        })
    }

    /// Discards everything written so far.
    pub fn clear(&mut self) -> std::io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl TraceSink for ReportWriter {
    fn write(&mut self, line: &str) {
        if let Err(e) = writeln!(self.file, "{line}") {
            warn!("report write to '{}' failed: {e}", self.path);
        }
    }
}

static GLOBAL: OnceLock<Mutex<ReportWriter>> = OnceLock::new();

/// Installs the process-wide report writer. Returns the writer back if one
/// was already installed.
pub fn install_global(writer: ReportWriter) -> Result<(), ReportWriter> {
    GLOBAL.set(Mutex::new(writer)).map_err(|m| match m.into_inner() {
        Ok(w) => w,
        Err(poisoned) => poisoned.into_inner(),
    })
}

/// The process-wide report sink. Lines written before [`install_global`] are
/// dropped.
#[derive(Debug, Default)]
pub struct GlobalReport;

impl TraceSink for GlobalReport {
    fn write(&mut self, line: &str) {
        if let Some(mutex) = GLOBAL.get() {
            match mutex.lock() {
                Ok(mut writer) => writer.write(line),
                Err(poisoned) => poisoned.into_inner().write(line),
            }
        }
    }
}
