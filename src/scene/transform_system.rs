//! 变换系统 (Transform System)
//!
//! Per-frame propagation of world poses through a [`Hierarchy`]. Kept apart
//! from [`Skeleton`](crate::scene::Skeleton) so it only borrows the arena.
//!
//! Each node's shadow state is synchronized first; the world pose is only
//! recomputed when the node's own local values changed or an ancestor's world
//! pose was recomputed in the same pass.

use glam::Vec3;
use log::trace;

use crate::math::Quaternion;
use crate::scene::hierarchy::Hierarchy;
use crate::scene::transform::TransformId;

/// Updates the cached world pose of every node reachable from a root.
///
/// Uses an explicit stack instead of recursion so deep chains cannot overflow.
/// Returns the number of nodes whose world pose was recomputed.
pub fn update_hierarchy(hierarchy: &mut Hierarchy) -> usize {
    let roots: Vec<TransformId> = hierarchy.roots().collect();

    // (node, parent world position, parent world rotation, parent changed)
    let mut stack: Vec<(TransformId, Vec3, Quaternion, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Vec3::ZERO, Quaternion::IDENTITY, false));
    }

    let mut updated = 0;

    while let Some((id, parent_position, parent_rotation, parent_changed)) = stack.pop() {
        let Some(node) = hierarchy.get_mut(id) else {
            continue;
        };

        // 1. Local shadow state
        let local_changed = node.sync_local();
        let world_needs_update = local_changed || parent_changed;

        // 2. World pose
        if world_needs_update {
            let position = parent_position + parent_rotation.rotate_point(node.local_position);
            let rotation = (parent_rotation * node.local_rotation).normalized();
            node.set_world_pose(position, rotation);
            updated += 1;
        }

        // 3. Children, reversed to keep processing order
        let world_position = node.cached_world_position();
        let world_rotation = node.cached_world_rotation();
        for &child in node.children().iter().rev() {
            stack.push((child, world_position, world_rotation, world_needs_update));
        }
    }

    trace!("transform system recomputed {updated} of {} nodes", hierarchy.len());
    updated
}
