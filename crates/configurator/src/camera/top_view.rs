//! Orthographic top view, kept in sync with the 3D frustum size.

use serde::{Deserialize, Serialize};

use super::sanitize_aspect;

/// Orthographic bounds of the top view camera (world x horizontally, z vertically)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopView {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// World position under a top-view pixel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopWorldPoint {
    pub x: f64,
    pub z: f64,
    /// Whether the pixel lies inside the viewport
    pub inside: bool,
}

impl TopView {
    pub fn new(frustum_size: f64, aspect: f64) -> Self {
        let aspect = sanitize_aspect(aspect);
        let half_h = frustum_size / 2.0;
        let half_w = frustum_size * aspect / 2.0;
        Self {
            left: -half_w,
            right: half_w,
            top: half_h,
            bottom: -half_h,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Whether a footprint centered at the origin lies within the bounds
    pub fn contains_footprint(&self, length: f64, width: f64) -> bool {
        length / 2.0 <= self.right && width / 2.0 <= self.top
    }

    /// Map a pixel of a `width` x `height` viewport to world x / z.
    ///
    /// Screen up is world -z.
    pub fn screen_to_world(&self, px: f64, py: f64, width: f64, height: f64) -> TopWorldPoint {
        if !(width > 0.0 && height > 0.0) {
            return TopWorldPoint {
                x: 0.0,
                z: 0.0,
                inside: false,
            };
        }
        let ndc_x = px / width * 2.0 - 1.0;
        let ndc_y = -(py / height) * 2.0 + 1.0;
        TopWorldPoint {
            x: ndc_x * self.width() / 2.0,
            z: -ndc_y * self.height() / 2.0,
            inside: (0.0..=width).contains(&px) && (0.0..=height).contains(&py),
        }
    }
}
