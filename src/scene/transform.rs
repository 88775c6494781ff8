use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::math::Quaternion;

/// Stable index of a [`Transform`] inside a [`Hierarchy`](crate::scene::Hierarchy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformId(pub(crate) u32);

impl TransformId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Transform 组件
///
/// Local position and rotation relative to the parent, the parent/child links
/// of the hierarchy, and the world pose cached by the transform system.
///
/// `local_position` and `local_rotation` are public; the transform system
/// notices edits by comparing against the values it last synchronized.
#[derive(Debug, Clone)]
pub struct Transform {
    // === Public 属性 ===
    pub local_position: Vec3,
    pub local_rotation: Quaternion,

    // === Hierarchy ===
    pub(crate) parent: Option<TransformId>,
    pub(crate) children: SmallVec<[TransformId; 4]>,

    // === 世界姿态缓存 (Internal) ===
    pub(crate) world_position: Vec3,
    pub(crate) world_rotation: Quaternion,

    // === 脏检查状态 (Private) ===
    last_position: Vec3,
    last_rotation: Quaternion,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self::from_local(Vec3::ZERO, Quaternion::IDENTITY)
    }

    #[must_use]
    pub fn from_local(local_position: Vec3, local_rotation: Quaternion) -> Self {
        Self {
            local_position,
            local_rotation,

            parent: None,
            children: SmallVec::new(),

            world_position: local_position,
            world_rotation: local_rotation,

            last_position: local_position,
            last_rotation: local_rotation,
            force_update: true,
        }
    }

    /// Compares the local values with the last synchronized copy and records
    /// them. Returns whether anything changed since the previous call.
    pub fn sync_local(&mut self) -> bool {
        let changed = self.local_position != self.last_position
            || self.local_rotation != self.last_rotation
            || self.force_update;

        if changed {
            self.last_position = self.local_position;
            self.last_rotation = self.local_rotation;
            self.force_update = false;
        }

        changed
    }

    /// Forces the next transform system pass to recompute this node.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    #[inline]
    pub fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    #[inline]
    pub fn set_local_rotation(&mut self, rotation: Quaternion) {
        self.local_rotation = rotation;
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TransformId] {
        &self.children
    }

    // ========================================================================
    // Cached world pose
    // ========================================================================

    /// World position as of the last transform system pass.
    #[inline]
    #[must_use]
    pub fn cached_world_position(&self) -> Vec3 {
        self.world_position
    }

    /// World rotation as of the last transform system pass.
    #[inline]
    #[must_use]
    pub fn cached_world_rotation(&self) -> Quaternion {
        self.world_rotation
    }

    /// World matrix built from the cached pose, for skinning uploads.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.world_position) * self.world_rotation.mat4()
    }

    pub(crate) fn set_world_pose(&mut self, position: Vec3, rotation: Quaternion) {
        self.world_position = position;
        self.world_rotation = rotation;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
