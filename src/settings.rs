//! Skeleton Settings
//!
//! Tunables for hit-testing and pose blending.
//!
//! ```rust,ignore
//! use rigpose::{InterpolationMode, Skeleton, SkeletonSettings};
//!
//! let skeleton = Skeleton::with_settings(SkeletonSettings {
//!     interpolation: InterpolationMode::Lerp,
//!     ..Default::default()
//! });
//! ```

use crate::animation::InterpolationMode;

/// Default picking radius in screen units.
pub const DEFAULT_HOVER_RADIUS: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkeletonSettings {
    /// A joint can only be hovered when its projected position lies within
    /// this distance of the cursor. The boundary itself counts.
    pub hover_radius: f32,
    /// Curve used by transitions between key frames.
    pub interpolation: InterpolationMode,
}

impl Default for SkeletonSettings {
    fn default() -> Self {
        Self {
            hover_radius: DEFAULT_HOVER_RADIUS,
            interpolation: InterpolationMode::Slerp,
        }
    }
}
