//! Key frame animation
//!
//! - [`KeyFrame`]: per-joint local rotations captured at one instant
//! - [`Transition`] / [`AnimationState`]: time-driven blend between two key frames
//! - [`InterpolationMode`]: lerp or slerp curve for the blend
//!
//! Applying a transition to joints is done by
//! [`Skeleton::update_animation`](crate::scene::Skeleton::update_animation).

pub mod interpolation;
pub mod keyframe;
pub mod transition;

pub use interpolation::InterpolationMode;
pub use keyframe::KeyFrame;
pub use transition::{AnimationState, Transition};
