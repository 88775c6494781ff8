use crate::math::Quaternion;

/// Curve used to blend two key frame orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Normalized component-wise blend. Cheaper, uneven angular speed.
    Lerp,
    /// Constant angular speed along the shorter arc.
    #[default]
    Slerp,
}

impl InterpolationMode {
    #[inline]
    #[must_use]
    pub fn interpolate(self, from: Quaternion, to: Quaternion, t: f32) -> Quaternion {
        match self {
            Self::Lerp => Quaternion::lerp(from, to, t),
            Self::Slerp => Quaternion::slerp(from, to, t),
        }
    }
}
