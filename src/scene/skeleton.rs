use std::sync::Arc;

use glam::{IVec2, Mat4, Vec3};
use log::debug;

use crate::animation::{AnimationState, KeyFrame, Transition};
use crate::errors::{Result, RigError};
use crate::math::Quaternion;
use crate::scene::hierarchy::Hierarchy;
use crate::scene::joint::{Joint, JointId};
use crate::scene::transform::{Transform, TransformId};
use crate::scene::transform_system;
use crate::settings::SkeletonSettings;

/// Line from a parent joint to one of its children, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSegment {
    pub parent: JointId,
    pub child: JointId,
    pub start: Vec3,
    pub end: Vec3,
}

/// A tree of joints plus the pose blending and picking state built on it.
///
/// # Layout
///
/// Joints live in a flat `Vec` indexed by [`JointId`] in load order; joint 0
/// is the root. Joint `i` owns transform `i` of the internal [`Hierarchy`],
/// so the two index spaces coincide.
///
/// # Frame order
///
/// A host frame is expected to run:
/// 1. [`Skeleton::update_animation`] to write the blended local rotations
/// 2. [`Skeleton::update_world_transforms`] (or [`Skeleton::update_screen_coords`])
/// 3. readers: [`Skeleton::world_matrices`], [`Skeleton::bone_segments`],
///    [`Skeleton::check_hovering_status`]
/// 4. [`Skeleton::reset_deltas`] once consumers have seen the change
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    hierarchy: Hierarchy,
    joints: Vec<Joint>,
    has_joint_selected: bool,
    animation: AnimationState,
    settings: SkeletonSettings,
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: SkeletonSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SkeletonSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SkeletonSettings {
        &mut self.settings
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Appends a joint whose local offset from its parent is `position`.
    ///
    /// The first joint must be the root (`parent = None`); every later joint
    /// needs an existing parent. The position is stored before the parent link
    /// is made and is kept as-is, so the joint's world position is
    /// `parent_world + parent_rotation * position`. Loaders use this form.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        position: Vec3,
        parent: Option<JointId>,
    ) -> Result<JointId> {
        let name = name.into();
        let parent_transform = self.resolve_new_parent(&name, parent)?;

        let transform = self
            .hierarchy
            .insert(Transform::from_local(position, Quaternion::IDENTITY));
        self.hierarchy.set_parent(transform, parent_transform)?;

        Ok(self.push_joint(name, transform))
    }

    /// Appends a joint placed at `world_position` under the parent's current
    /// world pose. The stored local offset is derived from the parent.
    pub fn add_joint_at_world(
        &mut self,
        name: impl Into<String>,
        world_position: Vec3,
        parent: Option<JointId>,
    ) -> Result<JointId> {
        let name = name.into();
        let parent_transform = self.resolve_new_parent(&name, parent)?;

        let transform = self.hierarchy.insert(Transform::new());
        self.hierarchy.set_parent(transform, parent_transform)?;
        self.hierarchy.set_world_position(transform, world_position)?;

        Ok(self.push_joint(name, transform))
    }

    fn resolve_new_parent(
        &self,
        name: &str,
        parent: Option<JointId>,
    ) -> Result<Option<TransformId>> {
        match parent {
            Some(parent) => self
                .joint(parent)
                .map(|joint| Some(joint.transform))
                .ok_or(RigError::JointNotFound(parent.index())),
            None if !self.joints.is_empty() => Err(RigError::MultipleRoots {
                name: name.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn push_joint(&mut self, name: String, transform: TransformId) -> JointId {
        let id = JointId(self.joints.len() as u32);
        self.joints.push(Joint::new(name, transform));
        id
    }

    // ========================================================================
    // Joint access
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.index())
    }

    #[inline]
    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id.index())
    }

    /// Id for a raw index, if it is in range.
    #[must_use]
    pub fn joint_id(&self, index: usize) -> Option<JointId> {
        (index < self.joints.len()).then(|| JointId(index as u32))
    }

    #[must_use]
    pub fn find_joint(&self, name: &str) -> Option<JointId> {
        self.joints
            .iter()
            .position(|joint| joint.name == name)
            .map(|index| JointId(index as u32))
    }

    #[must_use]
    pub fn root(&self) -> Option<&Joint> {
        self.joints.first()
    }

    #[must_use]
    pub fn parent(&self, id: JointId) -> Option<JointId> {
        let transform = self.joint(id)?.transform;
        self.hierarchy
            .parent(transform)
            .map(|parent| JointId(parent.0))
    }

    pub fn children(&self, id: JointId) -> impl Iterator<Item = JointId> + '_ {
        let children: &[TransformId] = match self.joint(id) {
            Some(joint) => self.hierarchy.children(joint.transform),
            None => &[],
        };
        children.iter().map(|child| JointId(child.0))
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn transform(&self, id: JointId) -> Option<&Transform> {
        self.hierarchy.get(self.joint(id)?.transform)
    }

    /// Direct access to a joint's local values, e.g. for interactive dragging.
    pub fn transform_mut(&mut self, id: JointId) -> Option<&mut Transform> {
        let transform = self.joint(id)?.transform;
        self.hierarchy.get_mut(transform)
    }

    #[must_use]
    pub fn local_rotation(&self, id: JointId) -> Option<Quaternion> {
        self.transform(id).map(|t| t.local_rotation)
    }

    pub fn set_local_rotation(&mut self, id: JointId, rotation: Quaternion) -> Result<()> {
        let transform = self
            .transform_mut(id)
            .ok_or(RigError::JointNotFound(id.index()))?;
        transform.local_rotation = rotation;
        Ok(())
    }

    /// World position derived from the parent chain, independent of the cache.
    #[must_use]
    pub fn world_position(&self, id: JointId) -> Option<Vec3> {
        self.hierarchy.world_position(self.joint(id)?.transform)
    }

    /// World rotation derived from the parent chain, independent of the cache.
    #[must_use]
    pub fn world_rotation(&self, id: JointId) -> Option<Quaternion> {
        self.hierarchy.world_rotation(self.joint(id)?.transform)
    }

    // ========================================================================
    // Poses & animation
    // ========================================================================

    /// Applies `frame` directly, without blending.
    ///
    /// Orientation `i` goes to joint `i`. A frame shorter than the skeleton
    /// leaves the remaining joints untouched; a longer one is rejected without
    /// writing anything.
    pub fn set_pose(&mut self, frame: &KeyFrame) -> Result<()> {
        if frame.len() > self.joints.len() {
            return Err(RigError::KeyFrameSizeMismatch {
                context: "set_pose",
                expected: self.joints.len(),
                actual: frame.len(),
            });
        }

        for (joint, rotation) in self.joints.iter().zip(frame.iter()) {
            if let Some(node) = self.hierarchy.get_mut(joint.transform) {
                node.local_rotation = rotation;
            }
        }

        self.propagate_delta(JointId::ROOT, true);
        Ok(())
    }

    /// Starts blending from `from` to `to` over `duration` seconds, replacing
    /// any transition in progress.
    ///
    /// Both frames must hold exactly one orientation per joint.
    pub fn start_transition(
        &mut self,
        from: Arc<KeyFrame>,
        to: Arc<KeyFrame>,
        duration: f32,
    ) -> Result<()> {
        let expected = self.joints.len();
        for (context, frame) in [("transition source", &from), ("transition target", &to)] {
            if frame.len() != expected {
                return Err(RigError::KeyFrameSizeMismatch {
                    context,
                    expected,
                    actual: frame.len(),
                });
            }
        }

        let transition = Transition::new(from, to, duration)?;
        if !self.animation.is_idle() {
            debug!("replacing transition in progress");
        }
        debug!("starting {duration}s transition over {expected} joints");
        self.animation = AnimationState::Transitioning(transition);
        Ok(())
    }

    /// Advances the current transition by `delta` seconds and writes the
    /// blended rotation of every joint.
    ///
    /// Returns `false` and touches nothing when idle. On the step where the
    /// progress reaches 1 the skeleton goes back to idle; the pose written on
    /// that step is evaluated at the actual progress, which may be past 1, and
    /// is not snapped onto the target frame.
    pub fn update_animation(&mut self, delta: f32) -> bool {
        let mode = self.settings.interpolation;

        let AnimationState::Transitioning(transition) = &mut self.animation else {
            return false;
        };

        let t = transition.advance(delta);
        let blended = transition.from().iter().zip(transition.to().iter());
        for (joint, (from, to)) in self.joints.iter().zip(blended) {
            if let Some(node) = self.hierarchy.get_mut(joint.transform) {
                node.local_rotation = mode.interpolate(from, to, t);
            }
        }

        if t >= 1.0 {
            debug!("transition finished at t = {t}");
            self.animation = AnimationState::Idle;
        }

        self.propagate_delta(JointId::ROOT, true);
        true
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.animation.is_idle()
    }

    #[must_use]
    pub fn animation_state(&self) -> &AnimationState {
        &self.animation
    }

    /// Abandons the transition in progress, keeping the current pose.
    pub fn stop_animation(&mut self) {
        self.animation = AnimationState::Idle;
    }

    // ========================================================================
    // Delta flags
    // ========================================================================

    /// Sets the delta flag of `id` and of every joint below it.
    pub fn set_delta(&mut self, id: JointId, value: bool) -> Result<()> {
        if self.joint(id).is_none() {
            return Err(RigError::JointNotFound(id.index()));
        }
        self.propagate_delta(id, value);
        Ok(())
    }

    /// Clears the delta flag on the whole tree.
    pub fn reset_deltas(&mut self) {
        self.propagate_delta(JointId::ROOT, false);
    }

    fn propagate_delta(&mut self, id: JointId, value: bool) {
        let Some(joint) = self.joints.get(id.index()) else {
            return;
        };

        for transform in self.hierarchy.descendants(joint.transform) {
            if let Some(joint) = self.joints.get_mut(transform.index()) {
                joint.delta = value;
            }
        }
    }

    // ========================================================================
    // World pose outputs
    // ========================================================================

    /// Refreshes the cached world pose of every joint; see
    /// [`transform_system::update_hierarchy`].
    pub fn update_world_transforms(&mut self) -> usize {
        transform_system::update_hierarchy(&mut self.hierarchy)
    }

    /// Cached world matrix per joint, in joint order.
    #[must_use]
    pub fn world_matrices(&self) -> Vec<Mat4> {
        self.joints
            .iter()
            .filter_map(|joint| self.hierarchy.get(joint.transform))
            .map(Transform::world_matrix)
            .collect()
    }

    /// One segment per parent/child pair, from the cached world positions.
    #[must_use]
    pub fn bone_segments(&self) -> Vec<BoneSegment> {
        self.joints
            .iter()
            .enumerate()
            .filter_map(|(index, joint)| {
                let node = self.hierarchy.get(joint.transform)?;
                let parent = self.hierarchy.get(node.parent()?)?;
                Some(BoneSegment {
                    parent: JointId(node.parent()?.0),
                    child: JointId(index as u32),
                    start: parent.cached_world_position(),
                    end: node.cached_world_position(),
                })
            })
            .collect()
    }

    /// Refreshes the world cache, then stores `project(world_position)` as
    /// each joint's screen coordinate.
    pub fn update_screen_coords<F>(&mut self, mut project: F)
    where
        F: FnMut(Vec3) -> IVec2,
    {
        self.update_world_transforms();
        for joint in &mut self.joints {
            if let Some(node) = self.hierarchy.get(joint.transform) {
                joint.screen_coord = project(node.cached_world_position());
            }
        }
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Hovers the joint nearest to `(x, y)` among those within the hover
    /// radius, clearing every other hover flag. Returns the hovered joint.
    pub fn check_hovering_status(&mut self, x: i32, y: i32) -> Option<JointId> {
        let radius = f64::from(self.settings.hover_radius);
        let mut nearest: Option<(usize, f64)> = None;

        for (index, joint) in self.joints.iter_mut().enumerate() {
            joint.is_hovered = false;

            let dx = f64::from(x) - f64::from(joint.screen_coord.x);
            let dy = f64::from(y) - f64::from(joint.screen_coord.y);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius {
                continue;
            }
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }

        let (index, _) = nearest?;
        self.joints[index].is_hovered = true;
        Some(JointId(index as u32))
    }

    /// Turns hover flags into pick flags. With nothing hovered every pick is
    /// released.
    pub fn select_or_release_joint(&mut self) {
        let mut any_hovered = false;
        for joint in &mut self.joints {
            joint.is_picked = joint.is_hovered;
            any_hovered |= joint.is_hovered;
        }
        self.has_joint_selected = any_hovered;
    }

    /// Clears every pick flag.
    pub fn release(&mut self) {
        self.has_joint_selected = false;
        for joint in &mut self.joints {
            joint.is_picked = false;
        }
    }

    #[must_use]
    pub fn has_joint_selected(&self) -> bool {
        self.has_joint_selected
    }

    /// First picked joint, if any.
    #[must_use]
    pub fn selected_joint(&self) -> Option<JointId> {
        self.joints
            .iter()
            .position(Joint::is_picked)
            .map(|index| JointId(index as u32))
    }

    #[must_use]
    pub fn hovered_joint(&self) -> Option<JointId> {
        self.joints
            .iter()
            .position(Joint::is_hovered)
            .map(|index| JointId(index as u32))
    }
}
