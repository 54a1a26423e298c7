use std::collections::BTreeMap;

use crate::{validate_slot, KeyValueStore, StorageError};

/// In-process store. Nothing survives the process; used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with `slot` already holding `value`.
    pub fn with_slot(slot: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.slots.insert(slot.into(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, slot: &str) -> Result<Option<String>, StorageError> {
        validate_slot(slot)?;
        Ok(self.slots.get(slot).cloned())
    }

    fn save(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        validate_slot(slot)?;
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}
