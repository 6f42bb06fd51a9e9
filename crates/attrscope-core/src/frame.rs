// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-level undo log and shadowed values.

use attrscope_store::{AttrValue, Slot};

/// One undo record: the value `name` had before this level first wrote it, and
/// the value this level last wrote.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) old: Slot,
    pub(crate) new: Slot,
}

/// State owned by one claimed level.
///
/// Slots are retained after release so a later level can reuse the allocation;
/// `level == None` marks a vacant slot.
#[derive(Debug, Clone, Default)]
pub(crate) struct Frame {
    level: Option<usize>,
    entries: Vec<Entry>,
    pub(crate) selection_target: Option<Option<AttrValue>>,
    pub(crate) text_inlining: Option<bool>,
}

impl Frame {
    pub(crate) fn vacant() -> Self {
        Self::default()
    }

    pub(crate) fn level(&self) -> Option<usize> {
        self.level
    }

    pub(crate) fn claim(&mut self, level: usize) {
        debug_assert!(self.level.is_none(), "claiming an occupied slot");
        self.level = Some(level);
    }

    /// Vacate the slot, keeping the entry allocation.
    pub(crate) fn release(&mut self) {
        self.level = None;
        self.entries.clear();
        self.selection_target = None;
        self.text_inlining = None;
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Record a write of `new` to `name`.
    ///
    /// The first write at this level captures `old` from the store; later writes
    /// only replace `new`, so `old` stays the pre-level value.
    pub(crate) fn record(
        &mut self,
        name: &str,
        new: Slot,
        old: impl FnOnce() -> Slot,
        growth: usize,
    ) {
        // Recently written names are the likeliest repeats.
        if let Some(entry) = self.entries.iter_mut().rev().find(|e| e.name == name) {
            entry.new = new;
            return;
        }
        if self.entries.len() == self.entries.capacity() {
            self.entries.reserve_exact(growth);
        }
        self.entries.push(Entry {
            name: name.to_owned(),
            old: old(),
            new,
        });
    }
}
