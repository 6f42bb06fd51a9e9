// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Store wrapper that counts operations.

use std::cell::Cell;

use attrscope_store::{AttrValue, AttributeStore, MemoryStore};

/// Wraps a store and counts calls, so tests can assert how much store traffic an
/// overlay operation causes (e.g. that exiting an untouched level causes none).
///
/// # Example
///
/// ```
/// use attrscope_dry_tests::RecordingStore;
/// use attrscope_store::{AttrValue, AttributeStore, MemoryStore};
///
/// let mut store = RecordingStore::new(MemoryStore::new());
/// store.set("x", AttrValue::from("A"));
/// let _ = store.get("x");
/// assert_eq!(store.set_count(), 1);
/// assert_eq!(store.read_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingStore<S = MemoryStore> {
    inner: S,
    read_count: Cell<usize>,
    set_count: usize,
    remove_count: usize,
}

impl<S: AttributeStore> RecordingStore<S> {
    /// Wrap `inner` with all counters at zero.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            read_count: Cell::new(0),
            set_count: 0,
            remove_count: 0,
        }
    }

    /// Number of `get`/`exists`/`names` calls.
    pub fn read_count(&self) -> usize {
        self.read_count.get()
    }

    /// Number of `set` calls.
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Number of `remove` calls.
    pub fn remove_count(&self) -> usize {
        self.remove_count
    }

    /// Total mutating calls (`set` + `remove`).
    pub fn writes(&self) -> usize {
        self.set_count + self.remove_count
    }

    /// Reset all counters.
    pub fn reset_counts(&mut self) {
        self.read_count.set(0);
        self.set_count = 0;
        self.remove_count = 0;
    }

    /// Borrow the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn count_read(&self) {
        self.read_count.set(self.read_count.get() + 1);
    }
}

impl<S: AttributeStore> AttributeStore for RecordingStore<S> {
    fn get(&self, name: &str) -> Option<AttrValue> {
        self.count_read();
        self.inner.get(name)
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        self.set_count += 1;
        self.inner.set(name, value);
    }

    fn remove(&mut self, name: &str) {
        self.remove_count += 1;
        self.inner.remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.count_read();
        self.inner.names()
    }

    fn exists(&self, name: &str) -> bool {
        self.count_read();
        self.inner.exists(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_kind_of_call() {
        let mut store = RecordingStore::new(MemoryStore::new());
        store.set("a", AttrValue::from(1_i64));
        store.set("b", AttrValue::from(2_i64));
        store.remove("a");
        store.remove("missing");
        let _ = store.exists("b");
        let _ = store.names();
        assert_eq!(store.set_count(), 2);
        assert_eq!(store.remove_count(), 2);
        assert_eq!(store.writes(), 4);
        assert_eq!(store.read_count(), 2);
    }

    #[test]
    fn slot_counts_as_one_read() {
        let store = RecordingStore::new(MemoryStore::new());
        let _ = store.slot("x");
        assert_eq!(store.read_count(), 1);
    }

    #[test]
    fn reset_zeroes_counters_but_keeps_data() {
        let mut store = RecordingStore::new(MemoryStore::new());
        store.set("a", AttrValue::from(true));
        store.reset_counts();
        assert_eq!(store.writes(), 0);
        assert!(store.inner().exists("a"));
    }
}
