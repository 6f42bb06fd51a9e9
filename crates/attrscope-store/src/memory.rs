// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory attribute store.

use std::collections::BTreeMap;

use crate::{AttrValue, AttributeStore};

/// In-memory attribute store.
///
/// Stores handles in a `BTreeMap<String, AttrValue>`, so
/// [`names`](AttributeStore::names) is sorted and every diagnostic built on top of
/// the store is deterministic.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    attrs: BTreeMap<String, AttrValue>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names currently set.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if no names are set.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_owned(), value);
    }

    fn remove(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.attrs.keys().cloned().collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }
}
