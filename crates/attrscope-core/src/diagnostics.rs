// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable views of an overlay. Read-only; nothing here touches the store.

use std::fmt::{self, Write};

use attrscope_store::{AttrValue, AttributeStore, Slot};

use crate::frame::Frame;
use crate::overlay::ScopedAttributes;

/// Insertion-ordered name → slot pairs; the lists here are a handful long.
#[derive(Default)]
struct OrderedSlots(Vec<(String, Slot)>);

impl OrderedSlots {
    fn get(&self, name: &str) -> Option<&Slot> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    fn insert(&mut self, name: &str, slot: Slot) {
        if let Some((_, existing)) = self.0.iter_mut().find(|(n, _)| n == name) {
            *existing = slot;
        } else {
            self.0.push((name.to_owned(), slot));
        }
    }

    fn take(&mut self, name: &str) -> Option<Slot> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrderedSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, slot)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={slot}")?;
        }
        f.write_str("}")
    }
}

fn write_target(f: &mut impl Write, target: Option<&AttrValue>) -> fmt::Result {
    match target {
        Some(value) => write!(f, "<{value}>"),
        None => f.write_str("<null>"),
    }
}

fn write_shadowed(f: &mut impl Write, frame: &Frame) -> fmt::Result {
    if let Some(target) = &frame.selection_target {
        write_target(f, target.as_ref())?;
    }
    if let Some(active) = frame.text_inlining {
        write!(f, "[{active}]")?;
    }
    Ok(())
}

/// Per-level rendering, see [`ScopedAttributes::representation_by_level`].
struct ByLevel<'a, S>(&'a ScopedAttributes<S>);

impl<S: AttributeStore> fmt::Display for ByLevel<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overlay = self.0;
        let store = overlay.store();
        let mut displaced = OrderedSlots::default();

        f.write_str("{")?;
        for frame in overlay.frames_rev() {
            let Some(level) = frame.level().filter(|&l| l > 0) else {
                continue;
            };
            let mut level_vars = OrderedSlots::default();
            for entry in frame.entries() {
                if entry.new.same(&entry.old) {
                    continue;
                }
                let attributable = match displaced.get(&entry.name) {
                    Some(deeper_old) => entry.new.same(deeper_old),
                    None => store.slot(&entry.name).same(&entry.new),
                };
                if !attributable {
                    continue;
                }
                level_vars.insert(&entry.name, entry.new.clone());
                displaced.insert(&entry.name, entry.old.clone());
            }
            let shadowed = frame.selection_target.is_some() || frame.text_inlining.is_some();
            if level_vars.is_empty() && !shadowed {
                continue;
            }
            write!(f, "{level}:")?;
            if !level_vars.is_empty() {
                write!(f, "{level_vars}")?;
            }
            write_shadowed(f, frame)?;
            f.write_str(",")?;
        }

        let mut base = OrderedSlots::default();
        for name in store.names() {
            match displaced.take(&name) {
                Some(Slot::Present(old)) => base.insert(&name, Slot::Present(old)),
                Some(Slot::Absent) => {}
                None => base.insert(&name, store.slot(&name)),
            }
        }
        for (name, old) in displaced.0 {
            if old.is_present() && base.get(&name).is_none() {
                base.insert(&name, old);
            }
        }
        write!(f, "0:{base}")?;
        write_shadowed(f, overlay.root_frame())?;
        write!(f, "}}[{}]", overlay.level())
    }
}

impl<S: AttributeStore> ScopedAttributes<S> {
    /// Per-level view of the variables, deepest level first.
    ///
    /// Each level lists the names it wrote that are still attributable to it: the
    /// store (or the level above it) still holds exactly what it wrote. Level 0
    /// shows what the store would contain once every open level has been exited.
    /// The current level closes the string.
    ///
    /// ```
    /// use attrscope_core::ScopedAttributes;
    /// use attrscope_store::{AttrValue, MemoryStore};
    ///
    /// let mut vars = ScopedAttributes::new(MemoryStore::new());
    /// vars.set("y", AttrValue::from(1_i64));
    /// vars.enter();
    /// vars.set("x", AttrValue::from("A"));
    /// assert_eq!(vars.representation_by_level(), "{1:{x=A},0:{y=1}[true]}[1]");
    /// ```
    pub fn representation_by_level(&self) -> String {
        ByLevel(self).to_string()
    }
}

/// Flat view: the store contents, the visible selection target and the effective
/// text-inlining flag, e.g. `{a=1, x=B}<target>[true]`.
impl<S: AttributeStore> fmt::Display for ScopedAttributes<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attrs = OrderedSlots::default();
        for name in self.store().names() {
            attrs.insert(&name, self.store().slot(&name));
        }
        write!(f, "{attrs}")?;
        if self.has_selection_target() {
            write_target(f, self.selection_target().as_ref())?;
        }
        write!(f, "[{}]", self.is_text_inlining_active())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use attrscope_store::MemoryStore;

    fn v(s: &str) -> AttrValue {
        AttrValue::from(s)
    }

    fn overlay() -> ScopedAttributes<MemoryStore> {
        ScopedAttributes::new(MemoryStore::new())
    }

    #[test]
    fn empty_overlay() {
        let o = overlay();
        assert_eq!(o.representation_by_level(), "{0:{}[true]}[0]");
        assert_eq!(o.to_string(), "{}[true]");
    }

    #[test]
    fn nested_levels_show_their_own_writes() {
        let mut o = overlay();
        o.enter();
        o.set("x", v("A"));
        o.enter();
        o.set("x", v("B"));
        o.set("y", v("C"));
        assert_eq!(
            o.representation_by_level(),
            "{2:{x=B, y=C},1:{x=A},0:{}[true]}[2]"
        );
        assert_eq!(o.to_string(), "{x=B, y=C}[true]");
    }

    #[test]
    fn external_overwrite_is_attributed_to_base() {
        let mut o = overlay();
        o.set("x", v("orig"));
        o.enter();
        o.set("x", v("mine"));
        o.store_mut().set("x", v("theirs"));
        assert_eq!(o.representation_by_level(), "{0:{x=theirs}[true]}[1]");
    }

    #[test]
    fn removal_shows_as_removed_marker() {
        let mut o = overlay();
        o.set("x", v("orig"));
        o.enter();
        o.remove("x");
        assert_eq!(
            o.representation_by_level(),
            "{1:{x=(*removed*)},0:{x=orig}[true]}[1]"
        );
        assert_eq!(o.to_string(), "{}[true]");
    }

    #[test]
    fn shadowed_values_are_listed_per_level() {
        let mut o = overlay();
        o.enter();
        o.set_selection_target(Some(v("obj")));
        o.enter();
        o.set_text_inlining_active(false);
        o.set_selection_target(None);
        assert_eq!(
            o.representation_by_level(),
            "{2:<null>[false],1:<obj>,0:{}[true]}[2]"
        );
        assert_eq!(o.to_string(), "{}<null>[false]");
    }

    struct Refuse;

    impl Write for Refuse {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn writer_errors_propagate() {
        let mut o = overlay();
        o.enter();
        o.set("x", v("A"));
        assert!(write!(Refuse, "{}", ByLevel(&o)).is_err());
        assert!(write!(Refuse, "{o}").is_err());
    }

    #[test]
    fn rendering_does_not_mutate() {
        let mut o = overlay();
        o.enter();
        o.set("x", v("A"));
        let before = o.to_string();
        let _ = o.representation_by_level();
        let _ = o.representation_by_level();
        assert_eq!(o.to_string(), before);
        assert_eq!(o.level(), 1);
        o.exit().unwrap();
        assert!(!o.contains("x"));
    }
}
