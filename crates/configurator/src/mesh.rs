//! Triangle meshes for the viewport.

use glam::Vec3;
use serde::Serialize;

use crate::geometry::{
    circle_outline, rounded_rect_outline, BoxSolid, CylinderSolid, DividerWall, OutlinePoint, SolidDescription,
};

const BODY_COLOR: [f32; 3] = [0.78, 0.78, 0.80];
const CAVITY_COLOR: [f32; 3] = [0.62, 0.64, 0.68];
const DIVIDER_COLOR: [f32; 3] = [0.55, 0.70, 0.85];

/// Floats per vertex: position(3) + normal(3) + color(3)
pub const VERTEX_STRIDE: usize = 9;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3, color: [f32; 3]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices
            .extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, color[0], color[1], color[2]]);
        index
    }

    /// Quad a-b-c-d (counter-clockwise seen from the normal side); collapsed halves are skipped
    fn push_quad(&mut self, corners: [Vec3; 4], normals: [Vec3; 4], color: [f32; 3]) {
        let base = self.vertex_count() as u32;
        for (p, n) in corners.iter().zip(normals) {
            self.push_vertex(*p, n, color);
        }
        for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
            if !is_degenerate(corners[a], corners[b], corners[c]) {
                self.indices
                    .extend_from_slice(&[base + a as u32, base + b as u32, base + c as u32]);
            }
        }
    }
}

fn is_degenerate(a: Vec3, b: Vec3, c: Vec3) -> bool {
    (b - a).cross(c - a).length_squared() < 1e-10
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for vertex in data.vertices.chunks_exact(VERTEX_STRIDE) {
            let p = Vec3::new(vertex[0], vertex[1], vertex[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Tessellate a solid for display
pub fn tessellate(solid: &SolidDescription) -> MeshData {
    let mut mesh = MeshData::default();
    match solid {
        SolidDescription::Box(b) => tessellate_box(&mut mesh, b),
        SolidDescription::Cylinder(c) => tessellate_cylinder(&mut mesh, c),
    }
    mesh
}

fn tessellate_box(mesh: &mut MeshData, b: &BoxSolid) {
    let [hx, hy, hz] = b.outer_half_extents;
    let [cx, cz] = b.cavity_half_extents;
    let segments = b.curve_segments;
    let bottom = -hy as f32;
    let top = hy as f32;
    let floor_top = (-hy + b.floor_thickness) as f32;

    let outer = rounded_rect_outline([-hx, -hz], [hx, hz], [b.outer_corner_radius; 4], segments);
    let cavity = rounded_rect_outline([-cx, -cz], [cx, cz], [b.corner_radius; 4], segments);

    side_walls(mesh, &outer, bottom, top, false, BODY_COLOR);
    ring(mesh, &outer, &cavity, top, Vec3::Y, BODY_COLOR);
    if b.floor_thickness > 0.0 {
        fan(mesh, &outer, bottom, Vec3::NEG_Y, BODY_COLOR);
    } else {
        ring(mesh, &outer, &cavity, bottom, Vec3::NEG_Y, BODY_COLOR);
    }

    for room in &b.compartments {
        let pocket = rounded_rect_outline(room.min, room.max, room.corner_radii, segments);
        side_walls(mesh, &pocket, floor_top, top, true, CAVITY_COLOR);
        if b.floor_thickness > 0.0 {
            fan(mesh, &pocket, floor_top, Vec3::Y, CAVITY_COLOR);
        }
    }

    for wall in &b.dividers {
        divider(mesh, wall, floor_top, top);
    }
}

fn tessellate_cylinder(mesh: &mut MeshData, c: &CylinderSolid) {
    let count = c.curve_segments * 4;
    let bottom = (-c.height / 2.0) as f32;
    let top = (c.height / 2.0) as f32;
    let floor_top = (-c.height / 2.0 + c.floor_thickness) as f32;

    let outer = circle_outline(c.outer_radius, count);
    let inner = circle_outline(c.inner_radius, count);

    side_walls(mesh, &outer, bottom, top, false, BODY_COLOR);
    side_walls(mesh, &inner, floor_top, top, true, CAVITY_COLOR);
    ring(mesh, &outer, &inner, top, Vec3::Y, BODY_COLOR);
    if c.floor_thickness > 0.0 {
        fan(mesh, &outer, bottom, Vec3::NEG_Y, BODY_COLOR);
        fan(mesh, &inner, floor_top, Vec3::Y, CAVITY_COLOR);
    } else {
        ring(mesh, &outer, &inner, bottom, Vec3::NEG_Y, BODY_COLOR);
    }
}

fn at(p: &OutlinePoint, y: f32) -> Vec3 {
    Vec3::new(p.pos[0] as f32, y, p.pos[1] as f32)
}

fn flat_normal(p: &OutlinePoint, inward: bool) -> Vec3 {
    let n = Vec3::new(p.normal[0] as f32, 0.0, p.normal[1] as f32).normalize_or_zero();
    if inward {
        -n
    } else {
        n
    }
}

/// Vertical wall along a closed outline (points run from +x towards +z,
/// i.e. clockwise seen from above)
fn side_walls(mesh: &mut MeshData, outline: &[OutlinePoint], y0: f32, y1: f32, inward: bool, color: [f32; 3]) {
    let n = outline.len();
    for i in 0..n {
        let a = &outline[i];
        let b = &outline[(i + 1) % n];
        let (na, nb) = (flat_normal(a, inward), flat_normal(b, inward));
        let (corners, normals) = if inward {
            ([at(a, y0), at(b, y0), at(b, y1), at(a, y1)], [na, nb, nb, na])
        } else {
            ([at(a, y0), at(a, y1), at(b, y1), at(b, y0)], [na, na, nb, nb])
        };
        // Sharp corners repeat points; zero-length edges produce nothing
        mesh.push_quad(corners, normals, color);
    }
}

/// Horizontal band between two outlines with matching point counts
fn ring(mesh: &mut MeshData, outer: &[OutlinePoint], inner: &[OutlinePoint], y: f32, normal: Vec3, color: [f32; 3]) {
    let n = outer.len().min(inner.len());
    let up = normal.y > 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (o0, o1, i0, i1) = (at(&outer[i], y), at(&outer[j], y), at(&inner[i], y), at(&inner[j], y));
        let corners = if up { [o0, i0, i1, o1] } else { [o0, o1, i1, i0] };
        mesh.push_quad(corners, [normal; 4], color);
    }
}

/// Convex cap over an outline
fn fan(mesh: &mut MeshData, outline: &[OutlinePoint], y: f32, normal: Vec3, color: [f32; 3]) {
    let n = outline.len();
    if n < 3 {
        return;
    }
    let (sum_x, sum_z) = outline
        .iter()
        .fold((0.0, 0.0), |(x, z), p| (x + p.pos[0], z + p.pos[1]));
    let center = Vec3::new((sum_x / n as f64) as f32, y, (sum_z / n as f64) as f32);
    let up = normal.y > 0.0;

    let c = mesh.push_vertex(center, normal, color);
    let ring: Vec<(u32, Vec3)> = outline
        .iter()
        .map(|p| {
            let v = at(p, y);
            (mesh.push_vertex(v, normal, color), v)
        })
        .collect();

    for i in 0..n {
        let (ia, a) = ring[i];
        let (ib, b) = ring[(i + 1) % n];
        if is_degenerate(center, a, b) {
            continue;
        }
        if up {
            mesh.indices.extend_from_slice(&[c, ib, ia]);
        } else {
            mesh.indices.extend_from_slice(&[c, ia, ib]);
        }
    }
}

/// Divider wall as a closed block from the floor to the rim
fn divider(mesh: &mut MeshData, wall: &DividerWall, y0: f32, y1: f32) {
    let (half_x, half_z) = match wall.axis {
        shared::DividerAxis::X => (wall.thickness / 2.0, wall.length / 2.0),
        shared::DividerAxis::Z => (wall.length / 2.0, wall.thickness / 2.0),
    };
    let [cx, cz] = wall.center;
    let (x0, x1) = ((cx - half_x) as f32, (cx + half_x) as f32);
    let (z0, z1) = ((cz - half_z) as f32, (cz + half_z) as f32);

    let faces: [([Vec3; 4], Vec3); 6] = [
        ([Vec3::new(x0, y0, z1), Vec3::new(x1, y0, z1), Vec3::new(x1, y1, z1), Vec3::new(x0, y1, z1)], Vec3::Z),
        ([Vec3::new(x1, y0, z0), Vec3::new(x0, y0, z0), Vec3::new(x0, y1, z0), Vec3::new(x1, y1, z0)], Vec3::NEG_Z),
        ([Vec3::new(x1, y0, z1), Vec3::new(x1, y0, z0), Vec3::new(x1, y1, z0), Vec3::new(x1, y1, z1)], Vec3::X),
        ([Vec3::new(x0, y0, z0), Vec3::new(x0, y0, z1), Vec3::new(x0, y1, z1), Vec3::new(x0, y1, z0)], Vec3::NEG_X),
        ([Vec3::new(x0, y1, z1), Vec3::new(x1, y1, z1), Vec3::new(x1, y1, z0), Vec3::new(x0, y1, z0)], Vec3::Y),
        ([Vec3::new(x0, y0, z0), Vec3::new(x1, y0, z0), Vec3::new(x1, y0, z1), Vec3::new(x0, y0, z1)], Vec3::NEG_Y),
    ];
    for (quad, normal) in faces {
        mesh.push_quad(quad, [normal; 4], DIVIDER_COLOR);
    }
}
