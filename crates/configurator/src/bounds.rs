//! Overall extent of a solid, the only input the camera framer needs.

use serde::{Deserialize, Serialize};
use shared::DimensionSnapshot;

use crate::geometry::SolidDescription;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingExtent {
    /// Largest span in the horizontal (x, z) plane
    pub max_horizontal_span: f64,
    pub height: f64,
}

impl BoundingExtent {
    pub fn new(max_horizontal_span: f64, height: f64) -> Self {
        Self {
            max_horizontal_span,
            height,
        }
    }

    /// Largest overall dimension of the solid
    pub fn max_dim(&self) -> f64 {
        self.max_horizontal_span.max(self.height)
    }
}

/// Extent of a generated solid
pub fn extents_of(solid: &SolidDescription) -> BoundingExtent {
    match solid {
        SolidDescription::Box(b) => BoundingExtent::new(b.outer_length().max(b.outer_width()), b.outer_height()),
        SolidDescription::Cylinder(c) => BoundingExtent::new(c.outer_radius * 2.0, c.height),
    }
}

/// Outer spans [x, z] of the solid seen from above
pub fn footprint_of(solid: &SolidDescription) -> [f64; 2] {
    match solid {
        SolidDescription::Box(b) => [b.outer_length(), b.outer_width()],
        SolidDescription::Cylinder(c) => [c.outer_radius * 2.0; 2],
    }
}

/// Extent computed straight from dimensions, without building the solid
pub fn extents_of_snapshot(snapshot: &DimensionSnapshot) -> BoundingExtent {
    BoundingExtent::new(
        snapshot.outer_length().max(snapshot.outer_width()),
        snapshot.height,
    )
}
