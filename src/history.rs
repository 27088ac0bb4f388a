//! Append-only CSV log of disease predictions.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::HistoryError;
use crate::models::HistoryRecord;

// ---

/// Flat history file. Appends are serialized so concurrent requests never
/// interleave partial rows.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the log is new or empty.
    pub fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        // ---
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        tracing::debug!(
            "Appended history row for farmer '{}' to {}",
            record.farmer,
            self.path.display()
        );
        Ok(())
    }

    /// Read every row. A log that does not exist yet reads as empty.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        // ---
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);
        let records = rdr
            .deserialize()
            .collect::<Result<Vec<HistoryRecord>, _>>()?;
        Ok(records)
    }
}
