// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scoped attribute overlay for template and expression evaluators.
//!
//! [`ScopedAttributes`] layers nested variable levels over a live
//! [`AttributeStore`](attrscope_store::AttributeStore). The evaluator calls
//! [`enter`](ScopedAttributes::enter) and [`exit`](ScopedAttributes::exit) around
//! each nested construct. Writes in between go straight to the store and are logged
//! in a lazily created per-level frame. `exit` reverts exactly the names its level
//! wrote, and only where the store still holds that level's write.
//!
//! [`NamespacedAttributes`] adds the reserved `param`, `session` and `application`
//! names on top.
//!
//! # Store Ownership
//!
//! The store stays the single source of truth: the overlay keeps no copies of
//! values, only undo records. Host code may write to the store directly between
//! overlay calls; those writes win over the overlay's undo records.
//!
//! # Threading
//!
//! One overlay belongs to one evaluation. Nothing here locks or suspends.
#![forbid(unsafe_code)]

mod config;
mod diagnostics;
mod error;
mod frame;
mod level_stack;
mod namespaced;
mod overlay;

pub use config::{ConfigError, OverlayConfig, DEFAULT_ENTRY_GROWTH, DEFAULT_LEVEL_GROWTH};
pub use error::{NamespaceError, ScopeError};
pub use namespaced::{
    is_reserved, NamespacedAttributes, ReadOnlyAttributes, Resolved, APPLICATION_NAMESPACE,
    PARAM_NAMESPACE, SESSION_NAMESPACE,
};
pub use overlay::ScopedAttributes;
