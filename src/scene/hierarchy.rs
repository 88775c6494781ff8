use glam::Vec3;
use smallvec::SmallVec;

use crate::errors::{Result, RigError};
use crate::math::Quaternion;
use crate::scene::transform::{Transform, TransformId};

/// Arena of [`Transform`]s linked into a forest by index.
///
/// # Hierarchy
///
/// Parent and child links are [`TransformId`] indices into the arena, never
/// references, so re-parenting is a pair of index updates and cycles are
/// rejected by [`Hierarchy::set_parent`] with an ancestor walk.
///
/// # World poses
///
/// Two ways to read a world pose:
/// - [`Hierarchy::world_pose`] and friends walk the parent chain on every call
///   and are always current.
/// - [`Transform::cached_world_position`] and friends read the values stored
///   by the last [`transform_system::update_hierarchy`](crate::scene::transform_system::update_hierarchy)
///   pass, which is what per-frame consumers should use.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    transforms: Vec<Transform>,
}

impl Hierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(capacity),
        }
    }

    /// Adds a transform as a new root and returns its id.
    ///
    /// Any parent/child links already present on `transform` are discarded;
    /// use [`Hierarchy::set_parent`] to attach it.
    pub fn insert(&mut self, mut transform: Transform) -> TransformId {
        transform.parent = None;
        transform.children.clear();

        let id = TransformId(self.transforms.len() as u32);
        self.transforms.push(transform);
        id
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.transforms.get_mut(id.index())
    }

    /// Id for a raw index, if it is in range.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<TransformId> {
        (index < self.transforms.len()).then(|| TransformId(index as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformId, &Transform)> {
        self.transforms
            .iter()
            .enumerate()
            .map(|(i, t)| (TransformId(i as u32), t))
    }

    pub fn roots(&self) -> impl Iterator<Item = TransformId> + '_ {
        self.iter()
            .filter(|(_, t)| t.parent.is_none())
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.get(id)?.parent
    }

    /// Live child list of `id`; empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: TransformId) -> &[TransformId] {
        match self.get(id) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    fn check(&self, id: TransformId) -> Result<()> {
        if id.index() < self.transforms.len() {
            Ok(())
        } else {
            Err(RigError::TransformNotFound(id.index()))
        }
    }

    // ========================================================================
    // Parenting
    // ========================================================================

    /// Links `child` under `parent`, or detaches it with `None`.
    ///
    /// The child's local position and rotation are kept as they are; its world
    /// pose changes with the new parent.
    pub fn set_parent(&mut self, child: TransformId, parent: Option<TransformId>) -> Result<()> {
        self.check(child)?;

        if let Some(parent) = parent {
            self.check(parent)?;
            // A leaf can only close a loop with itself
            let cycle = if self.transforms[child.index()].children.is_empty() {
                child == parent
            } else {
                self.is_ancestor_or_self(child, parent)
            };
            if cycle {
                return Err(RigError::HierarchyCycle {
                    child: child.index(),
                    parent: parent.index(),
                });
            }
        }

        if let Some(old_parent) = self.transforms[child.index()].parent.take() {
            self.transforms[old_parent.index()]
                .children
                .retain(|c| *c != child);
        }

        if let Some(parent) = parent {
            self.transforms[parent.index()].children.push(child);
        }

        let node = &mut self.transforms[child.index()];
        node.parent = parent;
        node.mark_dirty();
        Ok(())
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: TransformId, node: TransformId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ========================================================================
    // World pose derivation
    // ========================================================================

    /// World position and rotation composed from the parent chain.
    ///
    /// A root's world pose is its local pose. Otherwise
    /// `rotation = parent_rotation * local_rotation` and
    /// `position = parent_position + parent_rotation.rotate_point(local_position)`.
    /// The chain is walked iteratively, so depth is only bounded by memory.
    #[must_use]
    pub fn world_pose(&self, id: TransformId) -> Option<(Vec3, Quaternion)> {
        let mut chain: SmallVec<[&Transform; 16]> = SmallVec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            chain.push(node);
            current = node.parent;
        }

        let mut position = Vec3::ZERO;
        let mut rotation = Quaternion::IDENTITY;
        for node in chain.iter().rev() {
            position += rotation.rotate_point(node.local_position);
            rotation = (rotation * node.local_rotation).normalized();
        }
        Some((position, rotation))
    }

    #[must_use]
    pub fn world_position(&self, id: TransformId) -> Option<Vec3> {
        self.world_pose(id).map(|(position, _)| position)
    }

    #[must_use]
    pub fn world_rotation(&self, id: TransformId) -> Option<Quaternion> {
        self.world_pose(id).map(|(_, rotation)| rotation)
    }

    /// Stores the local position that places `id` at `position` in world space.
    pub fn set_world_position(&mut self, id: TransformId, position: Vec3) -> Result<()> {
        self.check(id)?;

        let local = match self.transforms[id.index()].parent {
            None => position,
            Some(parent) => {
                let (parent_position, parent_rotation) = self
                    .world_pose(parent)
                    .ok_or(RigError::TransformNotFound(parent.index()))?;
                parent_rotation
                    .conjugate()
                    .rotate_point(position - parent_position)
            }
        };

        self.transforms[id.index()].local_position = local;
        Ok(())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Pre-order depth-first walk over `id` and everything below it.
    #[must_use]
    pub fn descendants(&self, id: TransformId) -> Descendants<'_> {
        let mut stack = SmallVec::new();
        if self.get(id).is_some() {
            stack.push(id);
        }
        Descendants {
            hierarchy: self,
            stack,
        }
    }
}

/// Iterator returned by [`Hierarchy::descendants`].
pub struct Descendants<'a> {
    hierarchy: &'a Hierarchy,
    stack: SmallVec<[TransformId; 16]>,
}

impl Iterator for Descendants<'_> {
    type Item = TransformId;

    fn next(&mut self) -> Option<TransformId> {
        let id = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack
            .extend(self.hierarchy.children(id).iter().rev().copied());
        Some(id)
    }
}
