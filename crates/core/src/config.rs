use serde::{Deserialize, Serialize};
use tabletop_protocol::ScrollBehavior;
use thiserror::Error;

/// Height of the sticky header plus category tab strip on the menu page.
pub const DEFAULT_HEADER_OFFSET: f64 = 120.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Fixed parameters of an active-category tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Pixels of sticky UI covering the top of the viewport. Scroll-to
    /// requests land this far above a category's top.
    pub header_offset: f64,
    /// Distance below the scroll offset where the detection line sits.
    pub detection_inset: f64,
    /// Animate programmatic scrolls.
    pub smooth_scroll: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
            detection_inset: 0.0,
            smooth_scroll: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("header_offset", self.header_offset)?;
        check("detection_inset", self.detection_inset)
    }

    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }
}

fn check(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
