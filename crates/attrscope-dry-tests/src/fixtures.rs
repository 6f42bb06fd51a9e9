// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Value and snapshot helpers.

use std::collections::BTreeMap;

use attrscope_store::{AttrValue, AttributeStore, MemoryStore};
use serde_json::Value;

/// A fresh string value handle.
pub fn value(s: &str) -> AttrValue {
    AttrValue::from(s)
}

/// A fresh handle around arbitrary JSON.
pub fn json_value(v: Value) -> AttrValue {
    AttrValue::new(v)
}

/// A [`MemoryStore`] holding the given string pairs.
pub fn store_with(pairs: &[(&str, &str)]) -> MemoryStore {
    pairs.iter().map(|&(k, v)| (k, v)).collect()
}

/// Name → JSON copy of a store's contents, for structural before/after checks.
///
/// ```
/// use attrscope_dry_tests::{snapshot, store_with};
///
/// let snap = snapshot(&store_with(&[("x", "A")]));
/// assert_eq!(snap.get("x"), Some(&serde_json::json!("A")));
/// ```
pub fn snapshot<S: AttributeStore + ?Sized>(store: &S) -> BTreeMap<String, Value> {
    store
        .names()
        .into_iter()
        .filter_map(|name| {
            let value = store.get(&name)?;
            Some((name, value.as_json().clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_contents() {
        let store = store_with(&[("a", "1"), ("b", "2")]);
        let snap = snapshot(&store);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["b"], Value::from("2"));
    }

    #[test]
    fn value_helpers_create_fresh_handles() {
        assert!(!AttrValue::same(&value("x"), &value("x")));
        assert_eq!(json_value(Value::Null).to_string(), "null");
    }
}
