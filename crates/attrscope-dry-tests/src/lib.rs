// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for attrscope crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`shared`] - Clonable store handle for simulating writers outside the overlay
//! - [`recording`] - Store wrapper that counts operations
//! - [`fixtures`] - Value and snapshot helpers

pub mod fixtures;
pub mod recording;
pub mod shared;

pub use fixtures::{json_value, snapshot, store_with, value};
pub use recording::RecordingStore;
pub use shared::SharedStore;
