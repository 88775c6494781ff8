//! Skeletal pose blending.
//!
//! A [`Skeleton`] is a tree of joints whose local rotations are driven by
//! [`KeyFrame`]s. Transitions blend two key frames over time with
//! [`Quaternion::slerp`]; the transform system then propagates local poses to
//! world space for renderers, skinning and screen-space picking.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rigpose::{KeyFrame, Quaternion, assets};
//!
//! let mut skeleton = assets::load_skeleton("arm.skel")?;
//! let rest = Arc::new(KeyFrame::capture(&skeleton));
//! let raised = Arc::new(assets::load_key_frame("arm_raised.pose")?);
//!
//! skeleton.start_transition(rest, raised, 0.5)?;
//! while skeleton.update_animation(1.0 / 60.0) {
//!     skeleton.update_world_transforms();
//!     let matrices = skeleton.world_matrices();
//!     // upload matrices...
//!     skeleton.reset_deltas();
//! }
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod math;
pub mod scene;
pub mod settings;

pub use animation::{AnimationState, InterpolationMode, KeyFrame, Transition};
pub use errors::{Result, RigError};
pub use math::Quaternion;
pub use scene::{BoneSegment, Hierarchy, Joint, JointId, Skeleton, Transform, TransformId};
pub use settings::SkeletonSettings;
