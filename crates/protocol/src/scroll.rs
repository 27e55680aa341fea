use serde::{Deserialize, Serialize};

/// How the host should animate a programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// A request for the host viewport to scroll to an absolute page offset.
///
/// `top` is not clamped; hosts clamp to their own scrollable range the way
/// `window.scrollTo` does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    /// Resolve the requested offset against a scrollable range `[0, max]`.
    pub fn clamped_top(&self, max: f64) -> f64 {
        self.top.clamp(0.0, max.max(0.0))
    }
}
