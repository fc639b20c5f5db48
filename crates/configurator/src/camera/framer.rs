//! Hysteresis-based camera framing.
//!
//! The camera is re-framed only when the largest dimension drifts far enough
//! from the one it was last framed for. Small edits accumulate against that
//! baseline, so a series of small steps eventually triggers a re-frame.

use crate::bounds::BoundingExtent;

use super::{sanitize_aspect, CameraConfig, FramerError, FramerState, FramingPolicy};

/// Result of feeding a new extent to the framer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramingDecision {
    /// Change below threshold; the previous configuration stays in effect
    Keep(CameraConfig),
    /// New configuration; the viewport must be updated
    Reframe(CameraConfig),
}

impl FramingDecision {
    pub fn config(&self) -> CameraConfig {
        match self {
            FramingDecision::Keep(config) | FramingDecision::Reframe(config) => *config,
        }
    }

    pub fn is_reframe(&self) -> bool {
        matches!(self, FramingDecision::Reframe(_))
    }
}

/// Owns the framing baseline; the only mutable camera state in the pipeline
#[derive(Debug, Clone)]
pub struct CameraFramer {
    policy: FramingPolicy,
    current: Option<CameraConfig>,
}

impl CameraFramer {
    pub fn new(policy: FramingPolicy) -> Self {
        Self { policy, current: None }
    }

    pub fn policy(&self) -> &FramingPolicy {
        &self.policy
    }

    /// Current state, `None` before the first frame
    pub fn state(&self) -> Option<FramerState> {
        self.current.map(|config| FramerState {
            last_framed_max_dim: config.framed_max_dim,
            current_frustum_size: config.frustum_size,
        })
    }

    /// Configuration currently in effect
    pub fn current(&self) -> Option<CameraConfig> {
        self.current
    }

    /// Frame unconditionally (startup seeding, explicit fit)
    pub fn reframe(&mut self, extent: &BoundingExtent) -> CameraConfig {
        let config = self.policy.config_for(extent.max_dim());
        tracing::info!(
            max_dim = config.framed_max_dim,
            frustum = config.frustum_size,
            "Camera re-framed"
        );
        self.current = Some(config);
        config
    }

    /// Decide whether `extent` warrants a new frame.
    ///
    /// The baseline only moves on an actual re-frame.
    pub fn decide(&mut self, extent: &BoundingExtent) -> Result<FramingDecision, FramerError> {
        let current = match self.current {
            Some(config) if config.framed_max_dim > 0.0 => config,
            _ => return Err(FramerError::UninitializedFramer),
        };

        let new_dim = extent.max_dim();
        let last = current.framed_max_dim;
        let relative_change = (new_dim - last).abs() / last;

        if relative_change < self.policy.reframe_threshold {
            tracing::debug!(
                max_dim = new_dim,
                baseline = last,
                relative_change,
                "Camera kept"
            );
            return Ok(FramingDecision::Keep(current));
        }

        Ok(FramingDecision::Reframe(self.reframe(extent)))
    }

    /// Update the 3D viewport aspect; the next frame uses it
    pub fn set_aspect(&mut self, aspect: f64) {
        self.policy.aspect = sanitize_aspect(aspect);
    }
}
