//! 2D outlines in the top (x, z) plane.
//!
//! Sampled outlines feed the tessellator; `TopViewOutline` is the kurbo
//! rendition used by the top-view export.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{BezPath, Circle, Rect, RoundedRect, RoundedRectRadii, Shape};

use super::{BoxSolid, SolidDescription};

const PATH_TOLERANCE: f64 = 0.1;

/// Sampled outline vertex with its outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub pos: [f64; 2],
    pub normal: [f64; 2],
}

/// Sample a rounded rectangle, `segments` steps per corner arc.
///
/// Radii follow `Compartment::corner_radii` order. Every corner yields
/// `segments + 1` points (coincident when the radius is 0), so outlines with
/// the same `segments` always pair up point for point. Points run with
/// increasing angle from +x towards +z.
pub fn rounded_rect_outline(min: [f64; 2], max: [f64; 2], radii: [f64; 4], segments: u32) -> Vec<OutlinePoint> {
    let segments = segments.max(1);
    // (corner index, arc center, start angle)
    let corners = [
        (1, [max[0] - radii[1], min[1] + radii[1]], -FRAC_PI_2),
        (2, [max[0] - radii[2], max[1] - radii[2]], 0.0),
        (3, [min[0] + radii[3], max[1] - radii[3]], FRAC_PI_2),
        (0, [min[0] + radii[0], min[1] + radii[0]], PI),
    ];

    let mut points = Vec::with_capacity(4 * (segments as usize + 1));
    for (index, center, start) in corners {
        let r = radii[index];
        for k in 0..=segments {
            let angle = start + FRAC_PI_2 * k as f64 / segments as f64;
            let (s, c) = angle.sin_cos();
            points.push(OutlinePoint {
                pos: [center[0] + r * c, center[1] + r * s],
                normal: [c, s],
            });
        }
    }
    points
}

/// Sample a circle centered at the origin with `count` points
pub fn circle_outline(radius: f64, count: u32) -> Vec<OutlinePoint> {
    let count = count.max(3);
    (0..count)
        .map(|k| {
            let angle = TAU * k as f64 / count as f64;
            let (s, c) = angle.sin_cos();
            OutlinePoint {
                pos: [radius * c, radius * s],
                normal: [c, s],
            }
        })
        .collect()
}

/// Top view of a solid: the outer contour and the pockets cut into it
#[derive(Debug, Clone)]
pub struct TopViewOutline {
    pub outer: BezPath,
    pub holes: Vec<BezPath>,
    pub bounds: Rect,
}

impl TopViewOutline {
    /// Outer contour and holes as one path (even-odd fill)
    pub fn combined(&self) -> BezPath {
        let mut path = BezPath::new();
        for el in self.outer.elements() {
            path.push(*el);
        }
        for hole in &self.holes {
            for el in hole.elements() {
                path.push(*el);
            }
        }
        path
    }

    /// Standalone SVG document, one unit per millimeter
    pub fn to_svg(&self) -> String {
        let b = self.bounds.inflate(5.0, 5.0);
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.3} {:.3} {:.3} {:.3}"><path d="{}" fill="#c8c8c8" fill-rule="evenodd" stroke="#333333" stroke-width="0.5"/></svg>"##,
            b.x0,
            b.y0,
            b.width(),
            b.height(),
            self.combined().to_svg()
        )
    }
}

/// Build the top view; x maps to the horizontal axis and z to the vertical one
pub fn top_view_outline(solid: &SolidDescription) -> TopViewOutline {
    match solid {
        SolidDescription::Box(b) => box_top_view(b),
        SolidDescription::Cylinder(c) => {
            let outer = Circle::new((0.0, 0.0), c.outer_radius);
            let inner = Circle::new((0.0, 0.0), c.inner_radius);
            TopViewOutline {
                outer: outer.to_path(PATH_TOLERANCE),
                holes: vec![inner.to_path(PATH_TOLERANCE)],
                bounds: outer.bounding_box(),
            }
        }
    }
}

fn box_top_view(b: &BoxSolid) -> TopViewOutline {
    let [hx, _, hz] = b.outer_half_extents;
    let bounds = Rect::new(-hx, -hz, hx, hz);
    let outer = RoundedRect::from_rect(bounds, b.outer_corner_radius);

    let holes = b
        .compartments
        .iter()
        .map(|room| {
            let [r0, r1, r2, r3] = room.corner_radii;
            let rect = Rect::new(room.min[0], room.min[1], room.max[0], room.max[1]);
            RoundedRect::from_rect(rect, RoundedRectRadii::new(r0, r1, r2, r3)).to_path(PATH_TOLERANCE)
        })
        .collect();

    TopViewOutline {
        outer: outer.to_path(PATH_TOLERANCE),
        holes,
        bounds,
    }
}
