use std::sync::Arc;

use crate::animation::keyframe::KeyFrame;
use crate::errors::{Result, RigError};

/// Blend from one key frame to another over a fixed duration.
#[derive(Debug, Clone)]
pub struct Transition {
    from: Arc<KeyFrame>,
    to: Arc<KeyFrame>,
    time: f32,
    duration: f32,
}

impl Transition {
    /// Both frames must have the same length and `duration` must be finite
    /// and strictly positive.
    pub fn new(from: Arc<KeyFrame>, to: Arc<KeyFrame>, duration: f32) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(RigError::InvalidDuration(duration));
        }
        if from.len() != to.len() {
            return Err(RigError::KeyFrameSizeMismatch {
                context: "transition target",
                expected: from.len(),
                actual: to.len(),
            });
        }

        Ok(Self {
            from,
            to,
            time: 0.0,
            duration,
        })
    }

    #[must_use]
    pub fn from(&self) -> &Arc<KeyFrame> {
        &self.from
    }

    #[must_use]
    pub fn to(&self) -> &Arc<KeyFrame> {
        &self.to
    }

    /// Seconds elapsed since the transition started.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// `time / duration`. Reaches or passes 1 on the final step.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.time / self.duration
    }

    /// Accumulates `delta` seconds (never below zero) and returns the new progress.
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.time = (self.time + delta).max(0.0);
        self.progress()
    }
}

/// Animation state of a skeleton.
#[derive(Debug, Clone, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Transitioning(Transition),
}

impl AnimationState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Self::Idle => None,
            Self::Transitioning(transition) => Some(transition),
        }
    }
}
