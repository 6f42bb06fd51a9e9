// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The scoped attribute overlay.
//!
//! Every read goes to the backing store and every write is applied to it
//! immediately; there are no level-local copies. Above level 0 each write is also
//! logged in the current level's frame so `exit()` can undo it.
//!
//! # Revert Rule
//!
//! On `exit()` the frame's entries are walked newest first. A name is restored
//! only if the store still holds exactly what this level last wrote there
//! (handle identity, see [`AttrValue::same`]), or, for a removal, only if the name
//! is still absent. Anything else was changed by a writer outside the overlay and
//! is left alone.

use attrscope_store::{AttrValue, AttributeStore, Slot};
use tracing::{debug, trace};

use crate::config::OverlayConfig;
use crate::error::ScopeError;
use crate::frame::{Entry, Frame};
use crate::level_stack::LevelStack;

/// Nested variable levels over a live [`AttributeStore`].
///
/// The overlay owns the store but does not hide it: the host may mutate it at any
/// time between calls through [`store_mut`](Self::store_mut) (or through a shared
/// store handle), and such writes survive `exit()`.
///
/// ```
/// use attrscope_core::ScopedAttributes;
/// use attrscope_store::{AttrValue, AttributeStore, MemoryStore};
///
/// let mut vars = ScopedAttributes::new(MemoryStore::new());
/// vars.enter();
/// vars.set("x", AttrValue::from("A"));
/// vars.enter();
/// vars.set("x", AttrValue::from("B"));
/// vars.exit().unwrap();
/// assert_eq!(vars.read("x"), Some(AttrValue::from("A")));
/// vars.exit().unwrap();
/// assert!(!vars.store().exists("x"));
/// ```
#[derive(Debug, Clone)]
pub struct ScopedAttributes<S> {
    store: S,
    stack: LevelStack,
}

impl<S: AttributeStore> ScopedAttributes<S> {
    /// Wrap `store` with the default [`OverlayConfig`].
    pub fn new(store: S) -> Self {
        Self::with_config(store, &OverlayConfig::default())
    }

    /// Wrap `store` with explicit settings.
    ///
    /// `config` is not validated here: a zero `level_growth` or `entry_growth`
    /// is treated as 1. Use [`OverlayConfig::validate`] (or load through
    /// [`OverlayConfig::from_json_slice`]) to reject such configs instead.
    pub fn with_config(store: S, config: &OverlayConfig) -> Self {
        Self {
            store,
            stack: LevelStack::new(config),
        }
    }

    /// Wrap `store` and apply `variables` as level-0 writes.
    pub fn with_variables<I, K, V>(store: S, config: &OverlayConfig, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        let mut overlay = Self::with_config(store, config);
        overlay.put_all(variables);
        overlay
    }

    /// Current value of `name` in the backing store.
    pub fn read(&self, name: &str) -> Option<AttrValue> {
        self.store.get(name)
    }

    /// Returns `true` if `name` exists in the backing store.
    pub fn contains(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    /// Every name in the backing store, in the store's enumeration order.
    pub fn names(&self) -> Vec<String> {
        self.store.names()
    }

    /// Write `value` to `name`; [`Slot::Absent`] removes it.
    ///
    /// The store is updated immediately at every level. Above level 0 the first
    /// write to a name at the current level records the store's prior value for
    /// `exit()`; later writes to the same name at that level only update what was
    /// written.
    pub fn write(&mut self, name: &str, value: Slot) {
        if self.stack.level() > 0 {
            let growth = self.stack.entry_growth();
            let store = &self.store;
            self.stack
                .current_mut()
                .record(name, value.clone(), || store.slot(name), growth);
        }
        match value {
            Slot::Absent => self.store.remove(name),
            Slot::Present(value) => self.store.set(name, value),
        }
    }

    /// Set `name` to `value`.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        self.write(name, Slot::Present(value));
    }

    /// Set every pair, in iteration order.
    pub fn put_all<I, K, V>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        for (name, value) in variables {
            self.set(name.as_ref(), value.into());
        }
    }

    /// Remove `name` if it exists. Removing a missing name records nothing.
    pub fn remove(&mut self, name: &str) {
        if self.store.exists(name) {
            self.write(name, Slot::Absent);
        }
    }

    /// Current nesting depth; 0 is the base level.
    pub fn level(&self) -> usize {
        self.stack.level()
    }

    /// Open a nested level. Nothing is allocated until the level is written to.
    pub fn enter(&mut self) {
        self.stack.enter();
        trace!(level = self.stack.level(), "entered level");
    }

    /// Close the current level, reverting the names it wrote.
    ///
    /// # Errors
    ///
    /// [`ScopeError::BelowBaseLevel`] at level 0; nothing is changed.
    pub fn exit(&mut self) -> Result<(), ScopeError> {
        let level = self.stack.level();
        if level == 0 {
            return Err(ScopeError::BelowBaseLevel);
        }
        if let Some(frame) = self.stack.current() {
            for entry in frame.entries().iter().rev() {
                revert(&mut self.store, entry, level);
            }
            self.stack.release_current();
        }
        self.stack.leave();
        trace!(level = self.stack.level(), "exited level");
        Ok(())
    }

    /// Set the selection target for the current level. `None` is an explicit
    /// "no target" that still shadows outer levels.
    pub fn set_selection_target(&mut self, target: Option<AttrValue>) {
        self.stack.current_mut().selection_target = Some(target);
    }

    /// Returns `true` if any level up to the current one set a selection target.
    pub fn has_selection_target(&self) -> bool {
        self.stack
            .claimed_rev()
            .any(|frame| frame.selection_target.is_some())
    }

    /// The innermost selection target, or `None` when unset or explicitly `None`.
    pub fn selection_target(&self) -> Option<AttrValue> {
        self.stack
            .claimed_rev()
            .find_map(|frame| frame.selection_target.as_ref())
            .and_then(Clone::clone)
    }

    /// Set the text-inlining flag for the current level.
    pub fn set_text_inlining_active(&mut self, active: bool) {
        self.stack.current_mut().text_inlining = Some(active);
    }

    /// The innermost text-inlining flag; `false` if no level set one.
    pub fn is_text_inlining_active(&self) -> bool {
        self.stack
            .claimed_rev()
            .find_map(|frame| frame.text_inlining)
            .unwrap_or(false)
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the backing store. Writes made here bypass the undo log and
    /// are treated as external by `exit()`.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the backing store.
    pub fn into_inner(self) -> S {
        self.store
    }

    pub(crate) fn frames_rev(&self) -> impl Iterator<Item = &Frame> {
        self.stack.claimed_rev()
    }

    pub(crate) fn root_frame(&self) -> &Frame {
        self.stack.root()
    }
}

/// Apply the revert rule for one undo entry.
fn revert<S: AttributeStore>(store: &mut S, entry: &Entry, level: usize) {
    let name = entry.name.as_str();
    match &entry.new {
        Slot::Absent => {
            if store.exists(name) {
                debug!(name, level, "name re-added outside the overlay; keeping it");
                return;
            }
            if let Some(old) = entry.old.value() {
                store.set(name, old.clone());
            }
        }
        Slot::Present(_) => {
            if !store.slot(name).same(&entry.new) {
                debug!(name, level, "name changed outside the overlay; keeping it");
                return;
            }
            match &entry.old {
                Slot::Absent => store.remove(name),
                Slot::Present(old) => store.set(name, old.clone()),
            }
        }
    }
}
