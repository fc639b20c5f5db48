//! Mesh validation utilities.
//!
//! `MeshValidator` checks tessellated solids: correct stride, in-range
//! indices, unit normals, winding that agrees with the normals, and AABB
//! dimensions.

use glam::Vec3;

use crate::mesh::{Aabb, MeshData, VERTEX_STRIDE};

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Vertex buffer length is a multiple of the stride
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % VERTEX_STRIDE == 0
    }

    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh.vertices.iter().all(|v| v.is_finite())
    }

    /// All vertex normals have unit length (within epsilon)
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh
            .vertices
            .chunks_exact(VERTEX_STRIDE)
            .all(|v| (Vec3::new(v[3], v[4], v[5]).length() - 1.0).abs() <= epsilon)
    }

    fn position(&self, index: u32) -> Vec3 {
        let b = index as usize * VERTEX_STRIDE;
        Vec3::new(self.mesh.vertices[b], self.mesh.vertices[b + 1], self.mesh.vertices[b + 2])
    }

    fn normal(&self, index: u32) -> Vec3 {
        let b = index as usize * VERTEX_STRIDE;
        Vec3::new(self.mesh.vertices[b + 3], self.mesh.vertices[b + 4], self.mesh.vertices[b + 5])
    }

    /// Number of triangles with (near) zero area
    pub fn degenerate_triangle_count(&self) -> usize {
        self.mesh
            .indices
            .chunks_exact(3)
            .filter(|t| {
                let (a, b, c) = (self.position(t[0]), self.position(t[1]), self.position(t[2]));
                (b - a).cross(c - a).length_squared() < 1e-10
            })
            .count()
    }

    /// Every triangle faces the same way as its vertex normals
    pub fn winding_agrees_with_normals(&self) -> bool {
        self.mesh.indices.chunks_exact(3).all(|t| {
            let (a, b, c) = (self.position(t[0]), self.position(t[1]), self.position(t[2]));
            let face = (b - a).cross(c - a);
            let vertex = self.normal(t[0]) + self.normal(t[1]) + self.normal(t[2]);
            face.dot(vertex) > 0.0
        })
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Dimensions (x, y, z) of the bounding box
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    /// AABB dimensions are approximately equal to `expected`
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.mesh.indices.is_empty() {
            errors.push("Mesh has no triangles".to_string());
        }

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {}",
                self.mesh.vertices.len(),
                VERTEX_STRIDE
            ));
            return errors;
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
            return errors;
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
            return errors;
        }

        if !self.are_positions_finite() {
            errors.push("Vertex buffer contains non-finite values".to_string());
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        let degenerate = self.degenerate_triangle_count();
        if degenerate > 0 {
            errors.push(format!("{} degenerate triangles", degenerate));
        }

        if !self.winding_agrees_with_normals() {
            errors.push("Triangle winding disagrees with vertex normals".to_string());
        }

        errors
    }
}
