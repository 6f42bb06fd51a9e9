// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reserved namespace names layered over a [`ScopedAttributes`].
//!
//! `param`, `session` and `application` are not variables: they resolve to
//! read-only views of other attribute sets (request parameters, the session if
//! there is one, the application scope). Everything else goes to the overlay.
//! The reserved names can never be written or removed and are never listed by
//! [`NamespacedAttributes::names`].

use std::fmt;

use attrscope_store::{AttrValue, AttributeStore, Slot};
use tracing::debug;

use crate::error::{NamespaceError, ScopeError};
use crate::overlay::ScopedAttributes;

/// Reserved name for the request-parameter view.
pub const PARAM_NAMESPACE: &str = "param";
/// Reserved name for the session view.
pub const SESSION_NAMESPACE: &str = "session";
/// Reserved name for the application view.
pub const APPLICATION_NAMESPACE: &str = "application";

/// Returns `true` for `param`, `session` and `application`.
pub fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        PARAM_NAMESPACE | SESSION_NAMESPACE | APPLICATION_NAMESPACE
    )
}

/// Read-only pass-through view of an attribute set. No levels, no writes.
///
/// Implemented for every [`AttributeStore`].
pub trait ReadOnlyAttributes {
    /// Value of `name`, if present.
    fn lookup(&self, name: &str) -> Option<AttrValue>;
    /// Returns `true` if `name` is present.
    fn has(&self, name: &str) -> bool;
    /// Every name in the view.
    fn attribute_names(&self) -> Vec<String>;
}

impl<S: AttributeStore> ReadOnlyAttributes for S {
    fn lookup(&self, name: &str) -> Option<AttrValue> {
        self.get(name)
    }

    fn has(&self, name: &str) -> bool {
        self.exists(name)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.names()
    }
}

/// What a name resolves to.
pub enum Resolved<'a> {
    /// An ordinary variable.
    Value(AttrValue),
    /// One of the reserved namespace views.
    Namespace(&'a dyn ReadOnlyAttributes),
}

impl Resolved<'_> {
    /// The variable value, if this is not a namespace.
    pub fn into_value(self) -> Option<AttrValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Namespace(_) => None,
        }
    }

    /// The namespace view, if this is one.
    pub fn as_namespace(&self) -> Option<&dyn ReadOnlyAttributes> {
        match self {
            Self::Value(_) => None,
            Self::Namespace(view) => Some(*view),
        }
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Namespace(view) => f
                .debug_tuple("Namespace")
                .field(&view.attribute_names())
                .finish(),
        }
    }
}

/// A [`ScopedAttributes`] plus the reserved namespace views.
pub struct NamespacedAttributes<S> {
    attributes: ScopedAttributes<S>,
    params: Box<dyn ReadOnlyAttributes>,
    session: Option<Box<dyn ReadOnlyAttributes>>,
    application: Box<dyn ReadOnlyAttributes>,
}

impl<S: AttributeStore> NamespacedAttributes<S> {
    /// Combine an overlay with the parameter and application views. There is no
    /// session until [`with_session`](Self::with_session) provides one.
    pub fn new(
        attributes: ScopedAttributes<S>,
        params: impl ReadOnlyAttributes + 'static,
        application: impl ReadOnlyAttributes + 'static,
    ) -> Self {
        Self {
            attributes,
            params: Box::new(params),
            session: None,
            application: Box::new(application),
        }
    }

    /// Attach a session view.
    pub fn with_session(mut self, session: impl ReadOnlyAttributes + 'static) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    /// Returns `true` if a session view is attached.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Resolve `name`: a namespace view for reserved names, otherwise the
    /// overlay's value. `session` resolves to `None` without a session.
    pub fn get(&self, name: &str) -> Option<Resolved<'_>> {
        match name {
            PARAM_NAMESPACE => Some(Resolved::Namespace(&*self.params)),
            APPLICATION_NAMESPACE => Some(Resolved::Namespace(&*self.application)),
            SESSION_NAMESPACE => self
                .session
                .as_deref()
                .map(|view| Resolved::Namespace(view)),
            _ => self.attributes.read(name).map(Resolved::Value),
        }
    }

    /// `param` and `application` always exist, `session` only with a session;
    /// other names are looked up in the overlay.
    pub fn contains(&self, name: &str) -> bool {
        match name {
            PARAM_NAMESPACE | APPLICATION_NAMESPACE => true,
            SESSION_NAMESPACE => self.session.is_some(),
            _ => self.attributes.contains(name),
        }
    }

    /// Variable names from the overlay. Reserved names are never included.
    pub fn names(&self) -> Vec<String> {
        self.attributes.names()
    }

    /// Write through the overlay.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::ReservedName`] if `name` is reserved.
    pub fn write(&mut self, name: &str, value: Slot) -> Result<(), NamespaceError> {
        check_writable(name)?;
        self.attributes.write(name, value);
        Ok(())
    }

    /// Set `name` to `value` through the overlay.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::ReservedName`] if `name` is reserved.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<(), NamespaceError> {
        self.write(name, Slot::Present(value))
    }

    /// Set every pair in order, checking each name.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::ReservedName`] for the first reserved name. Pairs before
    /// it stay applied.
    pub fn put_all<I, K, V>(&mut self, variables: I) -> Result<(), NamespaceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        for (name, value) in variables {
            self.set(name.as_ref(), value.into())?;
        }
        Ok(())
    }

    /// Remove `name` through the overlay.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::ReservedName`] if `name` is reserved.
    pub fn remove(&mut self, name: &str) -> Result<(), NamespaceError> {
        check_writable(name)?;
        self.attributes.remove(name);
        Ok(())
    }

    /// See [`ScopedAttributes::level`].
    pub fn level(&self) -> usize {
        self.attributes.level()
    }

    /// See [`ScopedAttributes::enter`].
    pub fn enter(&mut self) {
        self.attributes.enter();
    }

    /// See [`ScopedAttributes::exit`].
    pub fn exit(&mut self) -> Result<(), ScopeError> {
        self.attributes.exit()
    }

    /// See [`ScopedAttributes::has_selection_target`].
    pub fn has_selection_target(&self) -> bool {
        self.attributes.has_selection_target()
    }

    /// See [`ScopedAttributes::selection_target`].
    pub fn selection_target(&self) -> Option<AttrValue> {
        self.attributes.selection_target()
    }

    /// See [`ScopedAttributes::set_selection_target`].
    pub fn set_selection_target(&mut self, target: Option<AttrValue>) {
        self.attributes.set_selection_target(target);
    }

    /// See [`ScopedAttributes::is_text_inlining_active`].
    pub fn is_text_inlining_active(&self) -> bool {
        self.attributes.is_text_inlining_active()
    }

    /// See [`ScopedAttributes::set_text_inlining_active`].
    pub fn set_text_inlining_active(&mut self, active: bool) {
        self.attributes.set_text_inlining_active(active);
    }

    /// See [`ScopedAttributes::representation_by_level`]. The namespace views
    /// are not included.
    pub fn representation_by_level(&self) -> String {
        self.attributes.representation_by_level()
    }

    /// Borrow the wrapped overlay.
    pub fn attributes(&self) -> &ScopedAttributes<S> {
        &self.attributes
    }
}

impl<S: AttributeStore> fmt::Display for NamespacedAttributes<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.attributes, f)
    }
}

fn check_writable(name: &str) -> Result<(), NamespaceError> {
    if is_reserved(name) {
        debug!(name, "rejected write to reserved namespace");
        return Err(NamespaceError::ReservedName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use attrscope_store::MemoryStore;

    fn v(s: &str) -> AttrValue {
        AttrValue::from(s)
    }

    fn namespaced() -> NamespacedAttributes<MemoryStore> {
        let params: MemoryStore = [("q", "search")].into_iter().collect();
        let app: MemoryStore = [("version", "3")].into_iter().collect();
        NamespacedAttributes::new(ScopedAttributes::new(MemoryStore::new()), params, app)
    }

    #[test]
    fn reserved_names_resolve_to_views() {
        let ns = namespaced();
        let params = ns.get(PARAM_NAMESPACE).unwrap();
        let view = params.as_namespace().unwrap();
        assert_eq!(view.lookup("q"), Some(v("search")));
        let app = ns.get(APPLICATION_NAMESPACE).unwrap();
        assert!(app.as_namespace().unwrap().has("version"));
        assert!(ns.get(SESSION_NAMESPACE).is_none());
    }

    #[test]
    fn session_exists_only_when_attached() {
        let ns = namespaced();
        assert!(!ns.contains(SESSION_NAMESPACE));
        assert!(ns.contains(PARAM_NAMESPACE));
        assert!(ns.contains(APPLICATION_NAMESPACE));

        let session: MemoryStore = [("user", "ada")].into_iter().collect();
        let ns = ns.with_session(session);
        assert!(ns.has_session());
        assert!(ns.contains(SESSION_NAMESPACE));
        let resolved = ns.get(SESSION_NAMESPACE).unwrap();
        assert_eq!(
            resolved.as_namespace().unwrap().attribute_names(),
            vec!["user"]
        );
    }

    #[test]
    fn reserved_names_cannot_be_written() {
        let mut ns = namespaced();
        for name in [PARAM_NAMESPACE, SESSION_NAMESPACE, APPLICATION_NAMESPACE] {
            assert_eq!(
                ns.set(name, v("x")),
                Err(NamespaceError::ReservedName {
                    name: name.to_owned()
                })
            );
            assert!(ns.remove(name).is_err());
        }
        assert!(ns.names().is_empty());
    }

    #[test]
    fn put_all_stops_at_first_reserved_name() {
        let mut ns = namespaced();
        let result = ns.put_all([("a", "1"), ("param", "2"), ("b", "3")]);
        assert!(result.is_err());
        assert!(ns.contains("a"));
        assert!(!ns.contains("b"));
    }

    #[test]
    fn names_exclude_reserved() {
        let mut ns = namespaced();
        ns.set("x", v("1")).unwrap();
        assert_eq!(ns.names(), vec!["x"]);
    }

    #[test]
    fn levels_delegate_to_overlay() {
        let mut ns = namespaced();
        ns.enter();
        ns.set("x", v("A")).unwrap();
        ns.set_selection_target(Some(v("t")));
        ns.set_text_inlining_active(false);
        assert_eq!(ns.level(), 1);
        assert_eq!(ns.attributes().level(), 1);
        assert_eq!(ns.get("x").unwrap().into_value(), Some(v("A")));
        assert_eq!(ns.to_string(), "{x=A}<t>[false]");
        ns.exit().unwrap();
        assert!(!ns.contains("x"));
        assert!(!ns.has_selection_target());
        assert!(ns.is_text_inlining_active());
        assert_eq!(ns.exit(), Err(ScopeError::BelowBaseLevel));
    }

    #[test]
    fn remove_through_wrapper_is_reverted() {
        let mut ns = namespaced();
        ns.set("x", v("orig")).unwrap();
        ns.enter();
        ns.remove("x").unwrap();
        assert!(!ns.contains("x"));
        ns.exit().unwrap();
        assert_eq!(ns.get("x").unwrap().into_value(), Some(v("orig")));
    }
}
