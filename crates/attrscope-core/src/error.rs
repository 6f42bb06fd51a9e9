// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for level transitions and the reserved-namespace wrapper.

use thiserror::Error;

/// Errors raised by level transitions on [`crate::ScopedAttributes`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `exit()` was called at level 0. Callers must pair every `exit()` with
    /// an earlier `enter()`.
    #[error("[SCOPE_BELOW_BASE] cannot decrease below base level")]
    BelowBaseLevel,
}

/// Errors raised by [`crate::NamespacedAttributes`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// A write or removal targeted one of the reserved namespace names.
    #[error("[NS_RESERVED] cannot modify variable '{name}': such name is a reserved word")]
    ReservedName {
        /// The rejected name.
        name: String,
    },
}
