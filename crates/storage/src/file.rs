use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::{validate_slot, KeyValueStore, StorageError};

const SLOT_EXTENSION: &str = "json";

/// Directory-backed store: each slot is `<dir>/<slot>.json`.
///
/// Writes go through a temporary file in the same directory and are renamed
/// into place, so a reader never observes a half-written slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            slot: dir.display().to_string(),
            source,
        })?;

        tracing::debug!(target: "qwat-storage", dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.{SLOT_EXTENSION}"))
    }
}

fn io_error(slot: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        slot: slot.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, slot: &str) -> Result<Option<String>, StorageError> {
        validate_slot(slot)?;
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(slot)(err)),
        }
    }

    fn save(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        validate_slot(slot)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_error(slot))?;
        tmp.write_all(value.as_bytes()).map_err(io_error(slot))?;
        tmp.persist(self.slot_path(slot))
            .map_err(|err| io_error(slot)(err.error))?;

        tracing::debug!(target: "qwat-storage", slot, bytes = value.len(), "slot written");
        Ok(())
    }
}
