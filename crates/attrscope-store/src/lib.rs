// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Backing attribute store contract for attrscope.
//!
//! `attrscope-store` provides the [`AttributeStore`] trait that the scoped overlay
//! in `attrscope-core` reads from and writes through, the [`AttrValue`] handle the
//! store holds, and [`MemoryStore`], a sorted in-memory implementation.
//!
//! # Identity Policy
//!
//! Values are held behind [`AttrValue`] handles. Cloning a handle keeps its
//! identity; building a handle from a fresh `serde_json::Value` creates a new one.
//! The overlay decides whether a name still holds "its" write by comparing handle
//! identity ([`AttrValue::same`]), never by structural equality: two writers that
//! store equal JSON are still two different writes.
//!
//! # Absence Semantics
//!
//! [`AttributeStore::get`] returns `None` for unknown names; this is not an error.
//! Removing a name makes it behave as if it had never been set. [`Slot`] is the
//! tagged form of "maybe a value" the overlay records in its undo log.
#![forbid(unsafe_code)]

mod memory;
pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Identity-carrying handle to an immutable attribute value.
///
/// Thin newtype over `Arc<serde_json::Value>`. `Clone` is cheap and keeps the
/// identity; [`AttrValue::same`] compares identity. `PartialEq` compares the
/// JSON structurally and exists for assertions and lookups, not for conflict
/// detection.
#[derive(Clone)]
pub struct AttrValue(Arc<Value>);

impl AttrValue {
    /// Wrap `value` in a new handle with its own identity.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Returns `true` if both handles point at the same allocation.
    pub fn same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrValue({})", self.0)
    }
}

/// Strings render bare, everything else as compact JSON.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_json() {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::new(Value::String(value.to_owned()))
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::new(Value::String(value))
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::new(Value::from(value))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::new(Value::Bool(value))
    }
}

/// Either a value or the marker for "this name does not exist".
///
/// Used as a write instruction (`Absent` removes the name) and as an undo record
/// (`Absent` means the name did not exist before the write).
#[derive(Clone, Debug, Default)]
pub enum Slot {
    /// The name does not exist / should be removed.
    #[default]
    Absent,
    /// The name holds this value.
    Present(AttrValue),
}

impl Slot {
    /// Returns `true` for [`Slot::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for [`Slot::Present`].
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the value, if present.
    pub fn value(&self) -> Option<&AttrValue> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }

    /// Tag plus handle identity: both absent, or both present with the same handle.
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Present(a), Self::Present(b)) => AttrValue::same(a, b),
            _ => false,
        }
    }
}

impl From<Option<AttrValue>> for Slot {
    fn from(value: Option<AttrValue>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<AttrValue> for Slot {
    fn from(value: AttrValue) -> Self {
        Self::Present(value)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("(*removed*)"),
            Self::Present(value) => write!(f, "{value}"),
        }
    }
}

/// Mutable, enumerable name → value store the overlay delegates to.
///
/// The trait is synchronous and object-safe. Implementations are assumed local
/// and infallible.
///
/// # Absence Semantics
///
/// [`get`](AttributeStore::get) returns `None` for missing names and
/// [`remove`](AttributeStore::remove) is idempotent.
pub trait AttributeStore {
    /// Current value for `name`, or `None` if the name does not exist.
    fn get(&self, name: &str) -> Option<AttrValue>;

    /// Set `name` to `value`, replacing any previous value.
    fn set(&mut self, name: &str, value: AttrValue);

    /// Remove `name`. No-op if it does not exist.
    fn remove(&mut self, name: &str);

    /// Every name currently set. Order is implementation-defined.
    fn names(&self) -> Vec<String>;

    /// Returns `true` if `name` exists.
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Current value for `name` as a [`Slot`].
    fn slot(&self, name: &str) -> Slot {
        self.get(name).into()
    }
}

impl<S: AttributeStore + ?Sized> AttributeStore for &mut S {
    fn get(&self, name: &str) -> Option<AttrValue> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        (**self).set(name, value);
    }

    fn remove(&mut self, name: &str) {
        (**self).remove(name);
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn slot(&self, name: &str) -> Slot {
        (**self).slot(name)
    }
}

impl<S: AttributeStore + ?Sized> AttributeStore for Box<S> {
    fn get(&self, name: &str) -> Option<AttrValue> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        (**self).set(name, value);
    }

    fn remove(&mut self, name: &str) {
        (**self).remove(name);
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn slot(&self, name: &str) -> Slot {
        (**self).slot(name)
    }
}
