//! Solid generation from committed dimensions.
//!
//! `GeometryFactory::build` is pure: the same snapshot (and layout) always
//! yields an equal `SolidDescription`, and every call returns a fresh value.

mod compartments;
mod outline;

pub use compartments::{Compartment, DividerWall};
pub use outline::{circle_outline, rounded_rect_outline, top_view_outline, OutlinePoint, TopViewOutline};

use serde::{Deserialize, Serialize};
use shared::{DimensionSnapshot, DividerLayout, ShapeFamily};

use crate::settings::GeometrySettings;

/// Rectangular box with walls, optional floor and compartments.
///
/// Axes: x = length, y = height, z = width; the solid is centered at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSolid {
    /// Outer half extents [x, y, z]
    pub outer_half_extents: [f64; 3],
    pub wall_thickness: f64,
    /// Cavity half extents [x, z]; always outer half extent minus wall
    pub cavity_half_extents: [f64; 2],
    /// 0 when the box has no floor
    pub floor_thickness: f64,
    pub cavity_depth: f64,
    /// Cavity corner radius after clamping to the smallest cell
    pub corner_radius: f64,
    /// Outer corner radius (cavity corner radius plus wall)
    pub outer_corner_radius: f64,
    pub compartments: Vec<Compartment>,
    pub dividers: Vec<DividerWall>,
    pub curve_segments: u32,
}

impl BoxSolid {
    pub fn outer_length(&self) -> f64 {
        self.outer_half_extents[0] * 2.0
    }

    pub fn outer_height(&self) -> f64 {
        self.outer_half_extents[1] * 2.0
    }

    pub fn outer_width(&self) -> f64 {
        self.outer_half_extents[2] * 2.0
    }
}

/// Cylindrical shell; the inner radius is the user's capacity input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderSolid {
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub height: f64,
    pub floor_thickness: f64,
    pub cavity_depth: f64,
    pub curve_segments: u32,
}

/// Generated solid, one variant per shape family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolidDescription {
    Box(BoxSolid),
    Cylinder(CylinderSolid),
}

impl SolidDescription {
    pub fn family(&self) -> ShapeFamily {
        match self {
            SolidDescription::Box(_) => ShapeFamily::Box,
            SolidDescription::Cylinder(_) => ShapeFamily::Cylinder,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            SolidDescription::Box(b) => b.outer_height(),
            SolidDescription::Cylinder(c) => c.height,
        }
    }
}

/// Builds solids with fixed tessellation and divider constants
#[derive(Debug, Clone, Default)]
pub struct GeometryFactory {
    settings: GeometrySettings,
}

impl GeometryFactory {
    pub fn new(settings: GeometrySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeometrySettings {
        &self.settings
    }

    /// Build the solid for a snapshot without internal dividers
    pub fn build(&self, snapshot: &DimensionSnapshot) -> SolidDescription {
        self.build_with_layout(snapshot, &DividerLayout::default())
    }

    /// Build the solid for a snapshot; the layout only affects the box family
    pub fn build_with_layout(&self, snapshot: &DimensionSnapshot, layout: &DividerLayout) -> SolidDescription {
        match snapshot.family {
            ShapeFamily::Box => SolidDescription::Box(self.build_box(snapshot, layout)),
            ShapeFamily::Cylinder => SolidDescription::Cylinder(self.build_cylinder(snapshot)),
        }
    }

    /// Usable range of divider positions for a snapshot (±limit)
    pub fn divider_limit(&self, snapshot: &DimensionSnapshot, axis: shared::DividerAxis) -> f64 {
        let [hx, hz] = snapshot.cavity_half_extents();
        let half = match axis {
            shared::DividerAxis::X => hx,
            shared::DividerAxis::Z => hz,
        };
        (half - self.settings.divider_edge_margin).max(0.0)
    }

    fn build_box(&self, s: &DimensionSnapshot, layout: &DividerLayout) -> BoxSolid {
        let wall = s.wall_thickness;
        let outer_half_extents = [s.length / 2.0, s.height / 2.0, s.width / 2.0];
        let cavity_half_extents = [outer_half_extents[0] - wall, outer_half_extents[2] - wall];
        let floor_thickness = s.floor_thickness();

        let corner_radius = compartments::safe_corner_radius(s.radius, layout, cavity_half_extents);
        let (compartments, dividers) =
            compartments::build(layout, cavity_half_extents, corner_radius, &self.settings);

        BoxSolid {
            outer_half_extents,
            wall_thickness: wall,
            cavity_half_extents,
            floor_thickness,
            cavity_depth: s.height - floor_thickness,
            corner_radius,
            outer_corner_radius: corner_radius + wall,
            compartments,
            dividers,
            curve_segments: self.settings.curve_segments,
        }
    }

    fn build_cylinder(&self, s: &DimensionSnapshot) -> CylinderSolid {
        let floor_thickness = s.floor_thickness();
        CylinderSolid {
            inner_radius: s.radius,
            outer_radius: s.radius + s.wall_thickness,
            height: s.height,
            floor_thickness,
            cavity_depth: s.height - floor_thickness,
            curve_segments: self.settings.curve_segments,
        }
    }
}
