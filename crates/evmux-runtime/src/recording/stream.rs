//! Append-only record streams.

use super::{Record, RecordingError};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const TEMP_SUFFIX: &str = ".tmp";

/// Returns `<path>.tmp`.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// One open recording log.
///
/// With `delete_on_abort` set, records go to `<path>.tmp` and only reach
/// `<path>` through [`finish`](Self::finish); [`discard`](Self::discard)
/// unlinks them. Without it, records go straight to `<path>` and survive
/// an abort.
#[derive(Debug)]
pub struct RecordStream {
    final_path: PathBuf,
    write_path: PathBuf,
    writer: BufWriter<File>,
    delete_on_abort: bool,
    written: usize,
}

impl RecordStream {
    /// Creates (truncating) the log.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Open`] if the file can not be created.
    pub fn open(path: impl Into<PathBuf>, delete_on_abort: bool) -> Result<Self, RecordingError> {
        let final_path = path.into();
        let write_path = if delete_on_abort {
            temp_path(&final_path)
        } else {
            final_path.clone()
        };
        let file = File::create(&write_path).map_err(|source| RecordingError::Open {
            path: write_path.clone(),
            source,
        })?;
        debug!(path = %write_path.display(), "recording opened");
        Ok(Self {
            final_path,
            write_path,
            writer: BufWriter::new(file),
            delete_on_abort,
            written: 0,
        })
    }

    /// The name the log will have once finished.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// The file currently being written.
    #[must_use]
    pub fn write_path(&self) -> &Path {
        &self.write_path
    }

    /// Number of records appended so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Appends one record as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Encode`] or [`RecordingError::Write`].
    pub fn append(&mut self, record: &Record) -> Result<(), RecordingError> {
        let line = serde_json::to_string(record).map_err(|source| RecordingError::Encode {
            path: self.write_path.clone(),
            source,
        })?;
        writeln!(self.writer, "{line}").map_err(|source| self.write_error(source))?;
        self.written += 1;
        Ok(())
    }

    /// Pushes buffered records to the OS.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Write`] on I/O failure.
    pub fn flush(&mut self) -> Result<(), RecordingError> {
        self.writer
            .flush()
            .map_err(|source| self.write_error(source))
    }

    /// Flushes, closes and (for temp logs) renames to the final name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Write`] or [`RecordingError::Rename`].
    pub fn finish(mut self) -> Result<PathBuf, RecordingError> {
        self.flush()?;
        let Self {
            final_path,
            write_path,
            writer,
            written,
            ..
        } = self;
        drop(writer);

        if write_path != final_path {
            fs::rename(&write_path, &final_path).map_err(|source| RecordingError::Rename {
                from: write_path.clone(),
                to: final_path.clone(),
                source,
            })?;
        }
        debug!(path = %final_path.display(), records = written, "recording finished");
        Ok(final_path)
    }

    /// Closes the log, unlinking it when it is a temp log.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Remove`] if unlinking fails, or
    /// [`RecordingError::Write`] when a kept log can not be flushed.
    pub fn discard(mut self) -> Result<(), RecordingError> {
        if !self.delete_on_abort {
            return self.finish().map(|_| ());
        }
        // unflushed records are being thrown away anyway
        let _ = self.writer.flush();
        let Self {
            write_path, writer, ..
        } = self;
        drop(writer);

        fs::remove_file(&write_path).map_err(|source| RecordingError::Remove {
            path: write_path.clone(),
            source,
        })?;
        debug!(path = %write_path.display(), "recording discarded");
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> RecordingError {
        RecordingError::Write {
            path: self.write_path.clone(),
            source,
        }
    }
}
