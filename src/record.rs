use std::cell::Cell as StdCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_RECORD_FILE: &str = "snake_record.json";

/// Where the best length survives between runs. Neither call may fail the
/// game: a broken store reads as 0 and silently drops writes.
pub trait RecordStore {
    fn load_record(&self) -> usize;
    fn save_record(&self, value: usize);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default)]
    record: usize,
}

/// `{ "record": N }` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonRecordFile {
    path: PathBuf,
}

impl JsonRecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonRecordFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonRecordFile {
    fn load_record(&self) -> usize {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no record file yet");
            return 0;
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|text| serde_json::from_str::<RecordFile>(&text).map_err(anyhow::Error::from));

        match parsed {
            Ok(file) => file.record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "error loading record: {}", e);
                0
            }
        }
    }

    fn save_record(&self, value: usize) {
        let text = match serde_json::to_string_pretty(&RecordFile { record: value }) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("error encoding record: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, text) {
            tracing::warn!(path = %self.path.display(), "error saving record: {}", e);
        }
    }
}

/// Keeps the record for this process only.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    value: StdCell<usize>,
}

impl MemoryRecordStore {
    pub fn new(initial: usize) -> Self {
        MemoryRecordStore { value: StdCell::new(initial) }
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_record(&self) -> usize {
        self.value.get()
    }

    fn save_record(&self, value: usize) {
        self.value.set(value);
    }
}
