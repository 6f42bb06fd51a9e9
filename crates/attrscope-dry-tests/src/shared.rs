// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Clonable store handle for simulating external writers.

use attrscope_store::{AttrValue, AttributeStore, MemoryStore};
use std::sync::{Arc, Mutex, MutexGuard};

/// A [`MemoryStore`] behind a shared handle.
///
/// Clones share state. Hand one clone to the overlay and keep another: writes
/// through the kept clone are invisible to the overlay's undo log, exactly like
/// host code touching the backing store directly.
///
/// # Example
///
/// ```
/// use attrscope_dry_tests::SharedStore;
/// use attrscope_store::{AttrValue, AttributeStore};
///
/// let host = SharedStore::new();
/// let mut lent = host.clone();
/// lent.set("x", AttrValue::from("A"));
/// assert!(host.exists("x"));
/// ```
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    /// Create an empty shared store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared store with the given contents.
    pub fn with_store(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current contents.
    pub fn to_memory_store(&self) -> MemoryStore {
        self.lock().clone()
    }

    /// Number of names currently set.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no names are set.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl AttributeStore for SharedStore {
    fn get(&self, name: &str) -> Option<AttrValue> {
        self.lock().get(name)
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        self.lock().set(name, value);
    }

    fn remove(&mut self, name: &str) {
        self.lock().remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.lock().names()
    }

    fn exists(&self, name: &str) -> bool {
        self.lock().exists(name)
    }
}
