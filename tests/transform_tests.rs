//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Hierarchy parenting, cycle rejection and traversal order
//! - World pose composition through rotated parents and deep chains
//! - set_world_position under a rotated parent
//! - Cached (transform system) vs. on-demand world poses
//! - Dirty checking: only changed subtrees are recomputed

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rigpose::scene::transform_system::update_hierarchy;
use rigpose::{Hierarchy, Quaternion, RigError, Transform, TransformId};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() < eps
}

fn same_rotation(a: Quaternion, b: Quaternion) -> bool {
    (a.dot(b).abs() - 1.0).abs() < 1e-4
}

/// root (at (1,0,0), 90° about Z) -> a (local (2,0,0), 90° about X) -> b (local (0,3,0))
fn rotated_chain() -> (Hierarchy, TransformId, TransformId, TransformId) {
    let mut h = Hierarchy::new();
    let root = h.insert(Transform::from_local(
        Vec3::X,
        Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2),
    ));
    let a = h.insert(Transform::from_local(
        Vec3::new(2.0, 0.0, 0.0),
        Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2),
    ));
    let b = h.insert(Transform::from_local(
        Vec3::new(0.0, 3.0, 0.0),
        Quaternion::IDENTITY,
    ));
    h.set_parent(a, Some(root)).unwrap();
    h.set_parent(b, Some(a)).unwrap();
    (h, root, a, b)
}

// ============================================================================
// Parenting
// ============================================================================

#[test]
fn insert_creates_roots() {
    let mut h = Hierarchy::new();
    assert!(h.is_empty());

    let a = h.insert(Transform::new());
    let b = h.insert(Transform::new());
    assert_eq!(h.len(), 2);
    assert_eq!(h.roots().collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(h.id(1), Some(b));
    assert_eq!(h.id(2), None);
}

#[test]
fn set_parent_links_both_sides() {
    let (h, root, a, b) = rotated_chain();

    assert_eq!(h.parent(root), None);
    assert_eq!(h.parent(a), Some(root));
    assert_eq!(h.parent(b), Some(a));
    assert_eq!(h.children(root), &[a]);
    assert_eq!(h.children(a), &[b]);
    assert!(h.children(b).is_empty());
    assert_eq!(h.roots().count(), 1);
}

#[test]
fn reparent_keeps_local_offset() {
    let mut h = Hierarchy::new();
    let a = h.insert(Transform::from_local(Vec3::X, Quaternion::IDENTITY));
    let b = h.insert(Transform::from_local(Vec3::Y, Quaternion::IDENTITY));
    let c = h.insert(Transform::from_local(Vec3::Z, Quaternion::IDENTITY));

    h.set_parent(c, Some(a)).unwrap();
    assert!(vec3_approx(h.world_position(c).unwrap(), Vec3::new(1.0, 0.0, 1.0), EPSILON));

    h.set_parent(c, Some(b)).unwrap();
    assert!(h.children(a).is_empty());
    assert_eq!(h.children(b), &[c]);
    assert_eq!(h.get(c).unwrap().local_position, Vec3::Z);
    assert!(vec3_approx(h.world_position(c).unwrap(), Vec3::new(0.0, 1.0, 1.0), EPSILON));

    h.set_parent(c, None).unwrap();
    assert!(h.children(b).is_empty());
    assert_eq!(h.parent(c), None);
    assert!(vec3_approx(h.world_position(c).unwrap(), Vec3::Z, EPSILON));
}

#[test]
fn set_parent_rejects_cycles() {
    let (mut h, root, a, b) = rotated_chain();

    assert!(matches!(
        h.set_parent(root, Some(b)),
        Err(RigError::HierarchyCycle { child: 0, parent: 2 })
    ));
    assert!(matches!(
        h.set_parent(a, Some(a)),
        Err(RigError::HierarchyCycle { .. })
    ));

    // Rejected calls leave the links untouched
    assert_eq!(h.parent(root), None);
    assert_eq!(h.parent(a), Some(root));
    assert_eq!(h.children(b).len(), 0);
}

#[test]
fn set_parent_rejects_cycles_through_subtrees() {
    let mut h = Hierarchy::new();
    let a = h.insert(Transform::new());
    let b = h.insert(Transform::new());
    let c = h.insert(Transform::new());
    h.set_parent(b, Some(a)).unwrap();
    h.set_parent(c, Some(b)).unwrap();

    // `a` is not a leaf, so the whole chain below it is checked
    assert!(matches!(
        h.set_parent(a, Some(c)),
        Err(RigError::HierarchyCycle { child: 0, parent: 2 })
    ));
    // Leaves can be moved anywhere but onto themselves
    assert!(matches!(
        h.set_parent(c, Some(c)),
        Err(RigError::HierarchyCycle { .. })
    ));
    h.set_parent(c, Some(a)).unwrap();
    assert_eq!(h.children(a), &[b, c]);
}

#[test]
fn set_parent_rejects_unknown_ids() {
    let mut other = Hierarchy::new();
    other.insert(Transform::new());
    other.insert(Transform::new());
    let foreign = other.id(1).unwrap();

    let mut h = Hierarchy::new();
    let only = h.insert(Transform::new());

    assert!(matches!(
        h.set_parent(foreign, None),
        Err(RigError::TransformNotFound(1))
    ));
    assert!(matches!(
        h.set_parent(only, Some(foreign)),
        Err(RigError::TransformNotFound(1))
    ));
}

#[test]
fn descendants_are_pre_order() {
    let mut h = Hierarchy::new();
    let root = h.insert(Transform::new());
    let a = h.insert(Transform::new());
    let b = h.insert(Transform::new());
    let c = h.insert(Transform::new());
    h.set_parent(a, Some(root)).unwrap();
    h.set_parent(b, Some(root)).unwrap();
    h.set_parent(c, Some(a)).unwrap();

    let order: Vec<_> = h.descendants(root).collect();
    assert_eq!(order, vec![root, a, c, b]);

    let order: Vec<_> = h.descendants(a).collect();
    assert_eq!(order, vec![a, c]);

    assert!(h.is_ancestor_or_self(root, c));
    assert!(!h.is_ancestor_or_self(b, c));
}

// ============================================================================
// World Pose Derivation
// ============================================================================

#[test]
fn world_pose_composes_parent_rotation() {
    let (h, root, a, b) = rotated_chain();

    assert!(vec3_approx(h.world_position(root).unwrap(), Vec3::X, EPSILON));
    assert!(vec3_approx(h.world_position(a).unwrap(), Vec3::new(1.0, 2.0, 0.0), EPSILON));
    assert!(vec3_approx(h.world_position(b).unwrap(), Vec3::new(1.0, 2.0, 3.0), EPSILON));

    let expected = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2)
        * Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
    assert!(same_rotation(h.world_rotation(b).unwrap(), expected));
}

#[test]
fn world_pose_matches_manual_composition() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut h = Hierarchy::new();
    let mut parent = None;
    let mut expected_position = Vec3::ZERO;
    let mut expected_rotation = Quaternion::IDENTITY;

    for _ in 0..8 {
        let local_position = Vec3::new(
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
        );
        let axis = Vec3::new(rng.random_range(-1.0..1.0), 1.0, rng.random_range(-1.0..1.0));
        let local_rotation = Quaternion::from_axis_angle(axis, rng.random_range(-3.0..3.0));

        let id = h.insert(Transform::from_local(local_position, local_rotation));
        h.set_parent(id, parent).unwrap();

        expected_position += expected_rotation.rotate_point(local_position);
        expected_rotation = expected_rotation * local_rotation;

        let (position, rotation) = h.world_pose(id).unwrap();
        assert!(vec3_approx(position, expected_position, 1e-3), "{position} vs {expected_position}");
        assert!(same_rotation(rotation, expected_rotation));
        parent = Some(id);
    }
}

#[test]
fn world_pose_of_deep_chain() {
    const DEPTH: usize = 100_000;

    let mut h = Hierarchy::new();
    let mut parent = None;
    for _ in 0..DEPTH {
        let id = h.insert(Transform::from_local(Vec3::X, Quaternion::IDENTITY));
        h.set_parent(id, parent).unwrap();
        parent = Some(id);
    }
    let last = parent.unwrap();

    let expected = Vec3::new(DEPTH as f32, 0.0, 0.0);
    assert!(vec3_approx(h.world_position(last).unwrap(), expected, EPSILON));
    assert_eq!(h.descendants(h.id(0).unwrap()).count(), DEPTH);

    assert_eq!(update_hierarchy(&mut h), DEPTH);
    assert!(vec3_approx(h.get(last).unwrap().cached_world_position(), expected, EPSILON));
}

#[test]
fn set_world_position_under_rotated_parent() {
    let (mut h, root, a, _) = rotated_chain();

    h.set_world_position(a, Vec3::new(1.0, 5.0, 0.0)).unwrap();
    assert!(vec3_approx(h.get(a).unwrap().local_position, Vec3::new(5.0, 0.0, 0.0), EPSILON));
    assert!(vec3_approx(h.world_position(a).unwrap(), Vec3::new(1.0, 5.0, 0.0), EPSILON));

    // Roots take the position as-is
    h.set_world_position(root, Vec3::new(-4.0, 0.5, 2.0)).unwrap();
    assert_eq!(h.get(root).unwrap().local_position, Vec3::new(-4.0, 0.5, 2.0));
}

// ============================================================================
// Transform System
// ============================================================================

#[test]
fn cached_pose_matches_on_demand_pose() {
    let (mut h, root, a, b) = rotated_chain();
    update_hierarchy(&mut h);

    for id in [root, a, b] {
        let node = h.get(id).unwrap();
        let (position, rotation) = h.world_pose(id).unwrap();
        assert!(vec3_approx(node.cached_world_position(), position, 1e-4));
        assert!(same_rotation(node.cached_world_rotation(), rotation));

        let m = node.world_matrix();
        assert!(vec3_approx(m.transform_point3(Vec3::ZERO), position, 1e-4));
        assert!(vec3_approx(
            m.transform_vector3(Vec3::X),
            rotation.rotate_point(Vec3::X),
            1e-4
        ));
    }
}

#[test]
fn cache_is_stale_until_update() {
    let (mut h, _, a, b) = rotated_chain();
    update_hierarchy(&mut h);
    let before = h.get(b).unwrap().cached_world_position();

    h.get_mut(a).unwrap().local_rotation = Quaternion::IDENTITY;

    // On-demand pose sees the edit immediately, the cache does not
    assert!(vec3_approx(h.get(b).unwrap().cached_world_position(), before, EPSILON));
    assert!(vec3_approx(h.world_position(b).unwrap(), Vec3::new(1.0, 2.0, 0.0) + Vec3::new(-3.0, 0.0, 0.0), EPSILON));

    update_hierarchy(&mut h);
    assert!(vec3_approx(
        h.get(b).unwrap().cached_world_position(),
        h.world_position(b).unwrap(),
        EPSILON
    ));
}

#[test]
fn only_changed_subtrees_are_recomputed() {
    let (mut h, root, a, b) = rotated_chain();

    assert_eq!(update_hierarchy(&mut h), 3);
    assert_eq!(update_hierarchy(&mut h), 0);

    h.get_mut(a).unwrap().local_rotation = Quaternion::from_axis_angle(Vec3::Y, 0.3);
    assert_eq!(update_hierarchy(&mut h), 2);

    h.get_mut(b).unwrap().set_local_position(Vec3::new(0.0, 4.0, 0.0));
    assert_eq!(update_hierarchy(&mut h), 1);

    h.get_mut(root).unwrap().local_position = Vec3::ZERO;
    assert_eq!(update_hierarchy(&mut h), 3);

    // Writing the same value is not a change
    h.get_mut(root).unwrap().local_position = Vec3::ZERO;
    assert_eq!(update_hierarchy(&mut h), 0);
}

#[test]
fn reparenting_forces_recompute() {
    let (mut h, root, _, b) = rotated_chain();
    update_hierarchy(&mut h);

    h.set_parent(b, Some(root)).unwrap();
    assert_eq!(update_hierarchy(&mut h), 1);
    assert!(vec3_approx(
        h.get(b).unwrap().cached_world_position(),
        Vec3::new(-2.0, 0.0, 0.0),
        EPSILON
    ));
}
