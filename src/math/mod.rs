//! Rotation math
//!
//! [`Quaternion`] is the rotation type used by transforms, keyframes and the
//! pose blending code. Vectors and matrices come from glam.

pub mod quaternion;

pub use quaternion::{NORMALIZE_EPSILON, Quaternion, SLERP_EPSILON};
