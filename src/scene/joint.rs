use glam::IVec2;

use crate::scene::transform::TransformId;

/// Stable index of a [`Joint`] inside its [`Skeleton`](crate::scene::Skeleton).
///
/// Assigned in load order; the root is always [`JointId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub(crate) u32);

impl JointId {
    pub const ROOT: Self = Self(0);

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the skeleton.
///
/// Holds the id of its transform in the skeleton's hierarchy plus transient
/// UI state: hover/pick flags, the last projected screen coordinate and the
/// `delta` marker that tells downstream consumers the pose changed.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub(crate) transform: TransformId,

    pub(crate) is_hovered: bool,
    pub(crate) is_picked: bool,
    pub(crate) screen_coord: IVec2,
    pub(crate) delta: bool,
}

impl Joint {
    #[must_use]
    pub(crate) fn new(name: impl Into<String>, transform: TransformId) -> Self {
        Self {
            name: name.into(),
            transform,
            is_hovered: false,
            is_picked: false,
            screen_coord: IVec2::ZERO,
            delta: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> TransformId {
        self.transform
    }

    #[inline]
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.is_hovered
    }

    #[inline]
    #[must_use]
    pub fn is_picked(&self) -> bool {
        self.is_picked
    }

    /// Screen coordinate from the last projection (pixels, origin top-left).
    #[inline]
    #[must_use]
    pub fn screen_coord(&self) -> IVec2 {
        self.screen_coord
    }

    /// Overrides the cached screen coordinate, for hosts that project joints
    /// themselves.
    #[inline]
    pub fn set_screen_coord(&mut self, coord: IVec2) {
        self.screen_coord = coord;
    }

    #[inline]
    #[must_use]
    pub fn delta(&self) -> bool {
        self.delta
    }
}
