use std::collections::HashMap;

use crate::errors::CoreError;

/// Abstraction over the host's key-value persistence (browser local storage,
/// a directory of files, an in-memory map in tests).
///
/// Values are JSON text. Writes are synchronous: once `set` returns `Ok`,
/// the value is considered durable.
pub trait KeyValueStore {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Create or overwrite a slot.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// `HashMap`-backed store for tests and hosts that manage persistence
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, e.g. with data from a previous session.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set(key, value)
    }
}
