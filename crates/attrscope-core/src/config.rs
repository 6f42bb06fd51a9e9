// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Overlay tuning knobs, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of frame slots added when the level stack is full.
pub const DEFAULT_LEVEL_GROWTH: usize = 3;
/// Default number of undo entries added when a frame is full.
pub const DEFAULT_ENTRY_GROWTH: usize = 5;

/// Construction-time settings for [`crate::ScopedAttributes`].
///
/// Growth increments are fixed steps, not doubling: nesting is usually a handful
/// of levels with a handful of names each. Missing JSON fields take their defaults.
///
/// ```
/// use attrscope_core::OverlayConfig;
///
/// let cfg = OverlayConfig::from_json_slice(br#"{"entry_growth": 8}"#).unwrap();
/// assert_eq!(cfg.entry_growth, 8);
/// assert_eq!(cfg.level_growth, 3);
/// assert_eq!(cfg.root_text_inlining, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Frame slots reserved each time the level stack runs out of capacity.
    pub level_growth: usize,
    /// Undo entries reserved each time a frame runs out of capacity.
    pub entry_growth: usize,
    /// Text-inlining flag seeded at level 0. `None` leaves the root unset, so the
    /// flag reads `false` until some level sets it.
    pub root_text_inlining: Option<bool>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            level_growth: DEFAULT_LEVEL_GROWTH,
            entry_growth: DEFAULT_ENTRY_GROWTH,
            root_text_inlining: Some(true),
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a JSON config blob.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed input or unknown fields,
    /// [`ConfigError::InvalidGrowth`] for a zero growth increment.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] if serialization fails.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Reject zero growth increments.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidGrowth`] naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_growth == 0 {
            return Err(ConfigError::InvalidGrowth {
                field: "level_growth",
            });
        }
        if self.entry_growth == 0 {
            return Err(ConfigError::InvalidGrowth {
                field: "entry_growth",
            });
        }
        Ok(())
    }
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The blob was not valid JSON for [`OverlayConfig`].
    #[error("[CONFIG_JSON] {0}")]
    Json(#[from] serde_json::Error),
    /// A growth increment was zero.
    #[error("[CONFIG_GROWTH] {field} must be non-zero")]
    InvalidGrowth {
        /// Name of the offending field.
        field: &'static str,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = OverlayConfig::default();
        assert_eq!(cfg.level_growth, DEFAULT_LEVEL_GROWTH);
        assert_eq!(cfg.entry_growth, DEFAULT_ENTRY_GROWTH);
        assert_eq!(cfg.root_text_inlining, Some(true));
    }

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = OverlayConfig::from_json_slice(b"{}").unwrap();
        assert_eq!(cfg, OverlayConfig::default());
    }

    #[test]
    fn null_root_inlining_leaves_root_unset() {
        let cfg = OverlayConfig::from_json_slice(br#"{"root_text_inlining": null}"#).unwrap();
        assert_eq!(cfg.root_text_inlining, None);
    }

    #[test]
    fn zero_growth_is_rejected() {
        let err = OverlayConfig::from_json_slice(br#"{"level_growth": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidGrowth {
                field: "level_growth"
            }
        ));
        let err = OverlayConfig::from_json_slice(br#"{"entry_growth": 0}"#).unwrap_err();
        assert!(err.to_string().starts_with("[CONFIG_GROWTH] entry_growth"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = OverlayConfig::from_json_slice(br#"{"levels": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn json_round_trip() {
        let cfg = OverlayConfig {
            level_growth: 7,
            entry_growth: 2,
            root_text_inlining: Some(false),
        };
        let bytes = cfg.to_json_vec().unwrap();
        assert_eq!(OverlayConfig::from_json_slice(&bytes).unwrap(), cfg);
    }
}
