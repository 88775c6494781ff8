//! 场景图系统模块
//!
//! Joint hierarchy and the skeleton built on it:
//! - Transform: local position/rotation plus cached world pose
//! - Hierarchy: index-based arena of transforms with parent/child links
//! - TransformSystem: per-frame world pose propagation
//! - Joint: skeleton node with hover/pick/delta state
//! - Skeleton: joint container, pose blending and hit testing

pub mod hierarchy;
pub mod joint;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

// 重新导出常用类型
pub use hierarchy::{Descendants, Hierarchy};
pub use joint::{Joint, JointId};
pub use skeleton::{BoneSegment, Skeleton};
pub use transform::{Transform, TransformId};
