// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sparse stack of frames, one per level that has been touched.
//!
//! # Layout
//!
//! `slots[0]` is the root frame and is always claimed for level 0. Claimed slots
//! occupy `slots[..=top]` with strictly increasing levels, so levels that were
//! entered but never written to own no slot. Slots above `top` are vacant and kept
//! for reuse.

use tracing::trace;

use crate::config::OverlayConfig;
use crate::frame::Frame;

#[derive(Debug, Clone)]
pub(crate) struct LevelStack {
    slots: Vec<Frame>,
    top: usize,
    level: usize,
    level_growth: usize,
    entry_growth: usize,
}

impl LevelStack {
    /// Zero growth increments are clamped to 1.
    pub(crate) fn new(config: &OverlayConfig) -> Self {
        let level_growth = config.level_growth.max(1);
        let mut slots = Vec::with_capacity(level_growth);
        let mut root = Frame::vacant();
        root.claim(0);
        root.text_inlining = config.root_text_inlining;
        slots.push(root);
        Self {
            slots,
            top: 0,
            level: 0,
            level_growth,
            entry_growth: config.entry_growth.max(1),
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn entry_growth(&self) -> usize {
        self.entry_growth
    }

    pub(crate) fn enter(&mut self) {
        self.level += 1;
    }

    /// Drop one level. The caller must have released the level's frame first.
    pub(crate) fn leave(&mut self) {
        debug_assert!(self.level > 0);
        debug_assert!(self.slots[self.top].level() != Some(self.level));
        self.level -= 1;
    }

    /// The frame claimed for the current level, if any write touched it.
    pub(crate) fn current(&self) -> Option<&Frame> {
        let frame = &self.slots[self.top];
        (frame.level() == Some(self.level)).then_some(frame)
    }

    /// The frame for the current level, claiming a slot on first use.
    pub(crate) fn current_mut(&mut self) -> &mut Frame {
        if self.slots[self.top].level() != Some(self.level) {
            self.top += 1;
            if self.top == self.slots.len() {
                if self.slots.len() == self.slots.capacity() {
                    self.slots.reserve_exact(self.level_growth);
                    trace!(capacity = self.slots.capacity(), "grew level stack");
                }
                self.slots.push(Frame::vacant());
            }
            self.slots[self.top].claim(self.level);
            trace!(level = self.level, slot = self.top, "claimed frame");
        }
        &mut self.slots[self.top]
    }

    /// Vacate the top slot if it belongs to the current level.
    pub(crate) fn release_current(&mut self) {
        if self.top > 0 && self.slots[self.top].level() == Some(self.level) {
            self.slots[self.top].release();
            self.top -= 1;
        }
    }

    /// Claimed frames from the deepest level down to the root.
    pub(crate) fn claimed_rev(&self) -> impl Iterator<Item = &Frame> {
        self.slots[..=self.top].iter().rev()
    }

    pub(crate) fn root(&self) -> &Frame {
        &self.slots[0]
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn claimed_levels(&self) -> Vec<usize> {
        self.slots[..=self.top]
            .iter()
            .filter_map(Frame::level)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> LevelStack {
        LevelStack::new(&OverlayConfig::default())
    }

    #[test]
    fn starts_with_only_the_root() {
        let s = stack();
        assert_eq!(s.level(), 0);
        assert_eq!(s.claimed_levels(), vec![0]);
        assert_eq!(s.root().text_inlining, Some(true));
        assert!(s.current().is_some());
    }

    #[test]
    fn entering_does_not_claim() {
        let mut s = stack();
        s.enter();
        s.enter();
        assert_eq!(s.level(), 2);
        assert!(s.current().is_none());
        assert_eq!(s.claimed_levels(), vec![0]);
    }

    #[test]
    fn untouched_levels_are_skipped() {
        let mut s = stack();
        s.enter();
        s.enter();
        s.current_mut();
        s.enter();
        s.enter();
        s.current_mut();
        assert_eq!(s.claimed_levels(), vec![0, 2, 4]);
    }

    #[test]
    fn release_then_reclaim_reuses_slot() {
        let mut s = stack();
        s.enter();
        s.current_mut();
        assert_eq!(s.slot_count(), 2);
        s.release_current();
        s.leave();
        s.enter();
        s.current_mut();
        assert_eq!(s.slot_count(), 2);
        assert_eq!(s.claimed_levels(), vec![0, 1]);
    }

    #[test]
    fn release_without_claim_is_noop() {
        let mut s = stack();
        s.enter();
        s.release_current();
        assert_eq!(s.claimed_levels(), vec![0]);
        s.leave();
        assert_eq!(s.level(), 0);
    }

    #[test]
    fn deep_nesting_grows_past_initial_capacity() {
        let mut s = stack();
        for _ in 0..20 {
            s.enter();
            s.current_mut();
        }
        let expected: Vec<usize> = (0..=20).collect();
        assert_eq!(s.claimed_levels(), expected);
        for _ in 0..20 {
            s.release_current();
            s.leave();
        }
        assert_eq!(s.claimed_levels(), vec![0]);
        assert_eq!(s.slot_count(), 21);
    }
}
