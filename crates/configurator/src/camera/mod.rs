//! Camera framing for the 3D and top views.

mod framer;
mod top_view;

pub use framer::{CameraFramer, FramingDecision};
pub use top_view::{TopView, TopWorldPoint};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::settings::FramingSettings;

/// Constants the framer works with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingPolicy {
    pub padding_factor: f64,
    pub additive_padding: f64,
    pub reframe_threshold: f64,
    pub fov_degrees: f64,
    /// Width / height of the 3D viewport
    pub aspect: f64,
}

impl FramingPolicy {
    pub fn from_settings(settings: &FramingSettings, aspect: f64) -> Self {
        Self {
            padding_factor: settings.padding_factor,
            additive_padding: settings.additive_padding,
            reframe_threshold: settings.reframe_threshold,
            fov_degrees: settings.fov_degrees,
            aspect: sanitize_aspect(aspect),
        }
    }

    /// View size needed to show an object of `max_dim` with room for labels
    pub fn frustum_size(&self, max_dim: f64) -> f64 {
        max_dim * self.padding_factor + self.additive_padding
    }

    /// Orthographic view height for the top view: the footprint (`length` along
    /// x, `width` along z) plus label room must fit both ways at `top_aspect`
    pub fn top_frustum_size(&self, length: f64, width: f64, top_aspect: f64) -> f64 {
        let aspect = sanitize_aspect(top_aspect);
        let vertical = width + self.additive_padding;
        let horizontal = (length + self.additive_padding) / aspect;
        vertical.max(horizontal) * self.padding_factor
    }

    /// Eye distance at which `frustum_size` fits both vertically and horizontally
    pub fn fit_distance(&self, frustum_size: f64) -> f64 {
        let half_tan = (self.fov_degrees.to_radians() / 2.0).tan();
        let vertical = (frustum_size / 2.0) / half_tan;
        let horizontal = (frustum_size / 2.0) / (half_tan * self.aspect);
        vertical.max(horizontal)
    }

    /// Full camera placement for a frame of `max_dim`
    pub fn config_for(&self, max_dim: f64) -> CameraConfig {
        let frustum_size = self.frustum_size(max_dim);
        let distance = self.fit_distance(frustum_size);
        let eye = DVec3::ONE.normalize() * distance;
        CameraConfig {
            frustum_size,
            eye: eye.to_array(),
            target: DVec3::ZERO.to_array(),
            fov_degrees: self.fov_degrees,
            framed_max_dim: max_dim,
        }
    }
}

impl Default for FramingPolicy {
    fn default() -> Self {
        Self::from_settings(&FramingSettings::default(), 1.0)
    }
}

pub(crate) fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Camera placement handed to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Visible extent of the view volume
    pub frustum_size: f64,
    pub eye: [f64; 3],
    pub target: [f64; 3],
    pub fov_degrees: f64,
    /// Largest dimension this configuration was computed for
    pub framed_max_dim: f64,
}

impl CameraConfig {
    pub fn distance(&self) -> f64 {
        DVec3::from_array(self.eye).distance(DVec3::from_array(self.target))
    }
}

/// Framer state: the baseline for hysteresis and the current view size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramerState {
    pub last_framed_max_dim: f64,
    pub current_frustum_size: f64,
}

/// Framer errors
#[derive(Debug, Clone, PartialEq)]
pub enum FramerError {
    /// Asked to decide before any frame established a baseline
    UninitializedFramer,
}

impl std::fmt::Display for FramerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramerError::UninitializedFramer => {
                write!(f, "Camera framer has no baseline frame")
            }
        }
    }
}

impl std::error::Error for FramerError {}
