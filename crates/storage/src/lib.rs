//! Named-slot key-value storage.
//!
//! A slot holds one raw string. Encoding is the caller's concern, so the
//! backends here never see JSON or any other format.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid slot name '{0}': expected ASCII letters, digits, '_' or '-'")]
    InvalidSlot(String),

    #[error("storage I/O failed for slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },
}

/// Key-value string storage addressed by slot name.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `slot`. Returns `None` if nothing was written.
    fn load(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `slot`.
    fn save(&mut self, slot: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn load(&self, slot: &str) -> Result<Option<String>, StorageError> {
        (**self).load(slot)
    }

    fn save(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(slot, value)
    }
}

/// Reject slot names that could escape a storage directory.
pub(crate) fn validate_slot(slot: &str) -> Result<(), StorageError> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlot(slot.to_string()))
    }
}
