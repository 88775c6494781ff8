//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers all failure modes including:
//! - Invalid joint or transform lookups
//! - Hierarchy violations (cycles, second roots)
//! - Keyframe / skeleton size mismatches and invalid transition durations
//! - Text parsing and file I/O errors
//!
//! Numeric degeneracy inside the quaternion algebra is never surfaced as an
//! error; slerp recovers locally through its lerp fallback.
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RigError>`.
//!
//! ```rust,ignore
//! use rigpose::errors::Result;
//!
//! fn load() -> Result<()> {
//!     let skeleton = rigpose::assets::load_skeleton("hand.skel")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for skeleton and animation operations.
#[derive(Error, Debug)]
pub enum RigError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// Joint index out of bounds.
    #[error("Joint not found: index {0}")]
    JointNotFound(usize),

    /// Transform index out of bounds.
    #[error("Transform not found: index {0}")]
    TransformNotFound(usize),

    /// Attaching `child` under `parent` would close a loop in the hierarchy.
    #[error("Parenting transform {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// The node being re-parented
        child: usize,
        /// The requested parent
        parent: usize,
    },

    /// A skeleton has exactly one root joint.
    #[error("Skeleton already has a root joint, joint '{name}' needs a parent")]
    MultipleRoots {
        /// Name of the rejected joint
        name: String,
    },

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Keyframe length does not match what the operation requires.
    #[error("Key frame size mismatch in {context}: expected {expected}, got {actual}")]
    KeyFrameSizeMismatch {
        /// Operation that rejected the frame
        context: &'static str,
        /// Required orientation count
        expected: usize,
        /// Orientation count that was supplied
        actual: usize,
    },

    /// Transition duration must be finite and strictly positive.
    #[error("Invalid transition duration: {0}")]
    InvalidDuration(f32),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// Malformed line in a skeleton or key frame description.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Quaternion text that is not four floats.
    #[error("Invalid quaternion: {0}")]
    InvalidQuaternion(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
