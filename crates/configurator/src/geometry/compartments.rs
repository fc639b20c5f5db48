//! Compartments (rooms) of a divided box cavity.
//!
//! Cells are the grid formed by the divider lines. A hidden divider segment
//! opens the passage between the two cells it separates; connected cells
//! form one compartment, cut as the bounding rectangle of its cells.

use serde::{Deserialize, Serialize};
use shared::{DividerAxis, DividerLayout, SegmentKey};

use crate::settings::GeometrySettings;

/// Rectangular pocket cut into the cavity (top view coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    /// [x, z] of the minimum corner
    pub min: [f64; 2],
    /// [x, z] of the maximum corner
    pub max: [f64; 2],
    /// Corner radii in order (min x, min z), (max x, min z), (max x, max z), (min x, max z)
    pub corner_radii: [f64; 4],
}

impl Compartment {
    pub fn size(&self) -> [f64; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// Visible piece of an internal divider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerWall {
    pub axis: DividerAxis,
    pub line: usize,
    pub segment: usize,
    /// [x, z] of the wall center
    pub center: [f64; 2],
    /// Extent along the wall
    pub length: f64,
    pub thickness: f64,
}

/// Cavity corner radius limited so that it fits the smallest cell.
/// Collapsed cells (dividers lying on the cavity wall) do not count.
pub(crate) fn safe_corner_radius(radius: f64, layout: &DividerLayout, cavity_half: [f64; 2]) -> f64 {
    let min_span = [DividerAxis::X, DividerAxis::Z]
        .iter()
        .zip(cavity_half)
        .flat_map(|(&axis, half)| {
            let edges = layout.cell_edges(axis, half);
            edges.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>()
        })
        .filter(|&span| span > 0.0)
        .fold(f64::INFINITY, f64::min);

    let max_safe = (min_span / 2.0 - 0.5).max(0.0);
    radius.min(max_safe).max(0.0)
}

/// Flood-fill the cell grid into compartments and collect visible divider walls
pub(crate) fn build(
    layout: &DividerLayout,
    cavity_half: [f64; 2],
    cavity_radius: f64,
    settings: &GeometrySettings,
) -> (Vec<Compartment>, Vec<DividerWall>) {
    let xs = layout.cell_edges(DividerAxis::X, cavity_half[0]);
    let zs = layout.cell_edges(DividerAxis::Z, cavity_half[1]);
    let nx = xs.len() - 1;
    let nz = zs.len() - 1;

    let open_x = |i: usize, j: usize| layout.is_hidden(&SegmentKey::new(DividerAxis::X, i, j));
    let open_z = |i: usize, j: usize| layout.is_hidden(&SegmentKey::new(DividerAxis::Z, j, i));

    let half_t = settings.divider_thickness / 2.0;
    let mut visited = vec![false; nx * nz];
    let mut compartments = Vec::new();

    for j0 in 0..nz {
        for i0 in 0..nx {
            if visited[j0 * nx + i0] {
                continue;
            }
            visited[j0 * nx + i0] = true;

            let (mut min_i, mut max_i, mut min_j, mut max_j) = (i0, i0, j0, j0);
            let mut stack = vec![(i0, j0)];
            while let Some((i, j)) = stack.pop() {
                min_i = min_i.min(i);
                max_i = max_i.max(i);
                min_j = min_j.min(j);
                max_j = max_j.max(j);

                let mut neighbours = Vec::with_capacity(4);
                if i + 1 < nx && open_x(i, j) {
                    neighbours.push((i + 1, j));
                }
                if i > 0 && open_x(i - 1, j) {
                    neighbours.push((i - 1, j));
                }
                if j + 1 < nz && open_z(i, j) {
                    neighbours.push((i, j + 1));
                }
                if j > 0 && open_z(i, j - 1) {
                    neighbours.push((i, j - 1));
                }
                for (ni, nj) in neighbours {
                    if !visited[nj * nx + ni] {
                        visited[nj * nx + ni] = true;
                        stack.push((ni, nj));
                    }
                }
            }

            let touches = [min_i == 0, min_j == 0, max_i + 1 == nx, max_j + 1 == nz];
            let inset = |touching: bool| if touching { 0.0 } else { half_t };

            let x0 = xs[min_i] + inset(touches[0]);
            let z0 = zs[min_j] + inset(touches[1]);
            let x1 = xs[max_i + 1] - inset(touches[2]);
            let z1 = zs[max_j + 1] - inset(touches[3]);
            if x1 - x0 <= 0.0 || z1 - z0 <= 0.0 {
                continue;
            }

            let limit = (x1 - x0).min(z1 - z0) / 2.0;
            let corner = |a: bool, b: bool| {
                let r = if a || b { cavity_radius } else { settings.divider_fillet };
                r.min(limit).max(0.0)
            };

            compartments.push(Compartment {
                min: [x0, z0],
                max: [x1, z1],
                corner_radii: [
                    corner(touches[0], touches[1]),
                    corner(touches[2], touches[1]),
                    corner(touches[2], touches[3]),
                    corner(touches[0], touches[3]),
                ],
            });
        }
    }

    (compartments, divider_walls(layout, &xs, &zs, settings.divider_thickness))
}

fn divider_walls(layout: &DividerLayout, xs: &[f64], zs: &[f64], thickness: f64) -> Vec<DividerWall> {
    let mut walls = Vec::new();

    for axis in [DividerAxis::X, DividerAxis::Z] {
        let (own, across) = match axis {
            DividerAxis::X => (xs, zs),
            DividerAxis::Z => (zs, xs),
        };
        for line in 0..layout.lines(axis).len() {
            let pos = own[line + 1];
            for (segment, span) in across.windows(2).enumerate() {
                if layout.is_hidden(&SegmentKey::new(axis, line, segment)) {
                    continue;
                }
                let length = span[1] - span[0];
                if length <= 0.0 {
                    continue;
                }
                let mid = (span[0] + span[1]) / 2.0;
                let center = match axis {
                    DividerAxis::X => [pos, mid],
                    DividerAxis::Z => [mid, pos],
                };
                walls.push(DividerWall {
                    axis,
                    line,
                    segment,
                    center,
                    length,
                    thickness,
                });
            }
        }
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: [f64; 2] = [50.0, 30.0];

    fn settings() -> GeometrySettings {
        GeometrySettings::default()
    }

    #[test]
    fn test_empty_layout_single_compartment() {
        let (rooms, walls) = build(&DividerLayout::default(), HALF, 8.0, &settings());
        assert_eq!(rooms.len(), 1);
        assert!(walls.is_empty());
        assert_eq!(rooms[0].min, [-50.0, -30.0]);
        assert_eq!(rooms[0].max, [50.0, 30.0]);
        assert_eq!(rooms[0].corner_radii, [8.0; 4]);
    }

    #[test]
    fn test_single_divider_splits_cavity() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 10.0, 48.0);
        let (rooms, walls) = build(&layout, HALF, 8.0, &settings());

        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].min, [-50.0, -30.0]);
        assert_eq!(rooms[0].max, [9.0, 30.0]);
        assert_eq!(rooms[1].min, [11.0, -30.0]);
        assert_eq!(rooms[1].max, [50.0, 30.0]);

        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].center, [10.0, 0.0]);
        assert_eq!(walls[0].length, 60.0);
    }

    #[test]
    fn test_inner_corners_use_divider_fillet() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, -20.0, 48.0);
        layout.add(DividerAxis::X, 20.0, 48.0);
        layout.add(DividerAxis::Z, -10.0, 28.0);
        layout.add(DividerAxis::Z, 10.0, 28.0);
        let (rooms, walls) = build(&layout, HALF, 8.0, &settings());

        assert_eq!(rooms.len(), 9);
        assert_eq!(walls.len(), 12);
        // center room touches no cavity wall
        let center = rooms.iter().find(|r| r.center() == [0.0, 0.0]).unwrap();
        assert_eq!(center.corner_radii, [4.0; 4]);
        // corner room: only the corner in the cavity corner and the two on cavity sides
        let first = &rooms[0];
        assert_eq!(first.corner_radii[0], 8.0);
        assert_eq!(first.corner_radii[1], 8.0);
        assert_eq!(first.corner_radii[2], 4.0);
        assert_eq!(first.corner_radii[3], 8.0);
    }

    #[test]
    fn test_hidden_segment_merges_cells() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 0.0, 48.0);
        layout.add(DividerAxis::Z, 0.0, 28.0);
        assert!(layout.hide_segment(SegmentKey::new(DividerAxis::X, 0, 0)));

        let (rooms, walls) = build(&layout, HALF, 8.0, &settings());
        assert_eq!(rooms.len(), 3);
        assert_eq!(walls.len(), 3);

        let merged = &rooms[0];
        assert_eq!(merged.min, [-50.0, -30.0]);
        assert_eq!(merged.max, [50.0, -1.0]);
    }

    #[test]
    fn test_corner_radius_limited_by_room_size() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 44.0, 48.0);
        let (rooms, _) = build(&layout, HALF, 8.0, &settings());
        // last room is 50 - 45 = 5 wide
        assert!(rooms[1].corner_radii.iter().all(|&r| r <= 2.5));
    }

    #[test]
    fn test_safe_corner_radius() {
        assert_eq!(safe_corner_radius(8.0, &DividerLayout::default(), HALF), 8.0);

        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 40.0, 48.0);
        // smallest cell 10 -> 10 / 2 - 0.5
        assert_eq!(safe_corner_radius(8.0, &layout, HALF), 4.5);
        assert_eq!(safe_corner_radius(-1.0, &layout, HALF), 0.0);
    }

    #[test]
    fn test_safe_corner_radius_ignores_collapsed_cells() {
        let mut layout = DividerLayout::default();
        // a divider clamped onto the cavity wall leaves a zero-width cell
        layout.x.push(50.0);
        assert_eq!(safe_corner_radius(8.0, &layout, HALF), 8.0);
    }
}
