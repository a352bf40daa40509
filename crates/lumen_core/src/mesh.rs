//! Triangle mesh geometry.
//!
//! A `Mesh` is the indexed form a loader produces (positions, optional
//! normals, triangle indices). Renderers consume flat `Triangle` lists built
//! from it once at scene load; the mesh itself is never mutated per frame.

use std::f32::consts::TAU;

use lumen_math::{Lerp, Vec3};

use crate::error::{SceneError, SceneResult};

/// A mesh vertex: position plus surface normal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

impl Lerp for Vertex {
    fn lerp_unclamped(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp_unclamped(other.position, t),
            normal: self.normal.lerp_unclamped(other.normal, t),
        }
    }
}

/// Three vertices. The front face is the side `(v1 - v0) × (v2 - v0)` points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal `(v1 - v0) × (v2 - v0)`.
    pub fn face_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1.position - v0.position).cross(v2.position - v0.position)
    }
}

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - call `ensure_normals()` to fill them in)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Normals, when given, must match the vertex count.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> SceneResult<Self> {
        if let Some(normals) = &normals {
            if normals.len() != positions.len() {
                return Err(SceneError::NormalCountMismatch {
                    normals: normals.len(),
                    vertices: positions.len(),
                });
            }
        }

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Face normals are accumulated unnormalized, so larger faces weigh more.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has normals, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            log::debug!(
                "Computing smooth normals for mesh with {} vertices",
                self.positions.len()
            );
            self.compute_normals();
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds()
            .map(|(min, max)| (min + max) * 0.5)
            .unwrap_or(Vec3::ZERO)
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f32 {
        self.bounds()
            .map(|(min, max)| (max - min).length())
            .unwrap_or(0.0)
    }

    /// Move the mesh to the origin and scale it so its bounding diagonal is `size`.
    pub fn fit_to_size(&mut self, size: f32) {
        let center = self.center();
        let current = self.size();
        let scale = if current > 0.0 { size / current } else { 1.0 };

        for position in &mut self.positions {
            *position = (*position - center) * scale;
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Flatten into renderer triangles.
    ///
    /// Faces that reference missing vertices are skipped with a warning.
    /// Missing normals, or normal indices past the end of `normals`, fall
    /// back to the face normal.
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let mut short_normals = 0;

        for chunk in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];

            // Bounds check
            if i0 >= self.positions.len() || i1 >= self.positions.len() || i2 >= self.positions.len() {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            }

            let mut triangle = Triangle::new(
                Vertex::new(self.positions[i0], Vec3::ZERO),
                Vertex::new(self.positions[i1], Vec3::ZERO),
                Vertex::new(self.positions[i2], Vec3::ZERO),
            );

            let smooth = self.normals.as_ref().and_then(|normals| {
                Some([*normals.get(i0)?, *normals.get(i1)?, *normals.get(i2)?])
            });
            if smooth.is_none() && self.normals.is_some() {
                short_normals += 1;
            }
            let normals = smooth.unwrap_or([triangle.face_normal().normalize_or_zero(); 3]);

            for (vertex, normal) in triangle.vertices.iter_mut().zip(normals) {
                vertex.normal = normal;
            }
            triangles.push(triangle);
        }

        if short_normals > 0 {
            log::warn!(
                "{} triangles index past the normal buffer ({} normals); using face normals",
                short_normals,
                self.normals.as_ref().map_or(0, Vec::len)
            );
        }

        triangles
    }

    /// An axis-aligned cube centred on the origin with flat per-face normals.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, u, v) with u × v == normal so the winding faces outward.
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let base = positions.len() as u32;
            for corner in [normal - u - v, normal + u - v, normal + u + v, normal - u + v] {
                positions.push(corner * h);
                normals.push(normal);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            positions,
            normals: Some(normals),
            indices,
        }
    }

    /// A torus around the y axis with smooth normals.
    ///
    /// `major_radius` is the distance from the centre to the tube centre,
    /// `minor_radius` the tube radius.
    pub fn torus(major_radius: f32, minor_radius: f32, segments: u32, sides: u32) -> Self {
        let segments = segments.max(3);
        let sides = sides.max(3);

        let mut positions = Vec::with_capacity((segments * sides) as usize);
        let mut normals = Vec::with_capacity((segments * sides) as usize);

        for i in 0..segments {
            let u = TAU * i as f32 / segments as f32;
            let (sin_u, cos_u) = u.sin_cos();
            for j in 0..sides {
                let v = TAU * j as f32 / sides as f32;
                let (sin_v, cos_v) = v.sin_cos();
                let ring = major_radius + minor_radius * cos_v;
                positions.push(Vec3::new(ring * cos_u, minor_radius * sin_v, ring * sin_u));
                normals.push(Vec3::new(cos_v * cos_u, sin_v, cos_v * sin_u));
            }
        }

        let index = |i: u32, j: u32| (i % segments) * sides + (j % sides);
        let mut indices = Vec::with_capacity((segments * sides * 6) as usize);
        for i in 0..segments {
            for j in 0..sides {
                let p00 = index(i, j);
                let p10 = index(i + 1, j);
                let p01 = index(i, j + 1);
                let p11 = index(i + 1, j + 1);
                // ∂v × ∂u points out of the tube
                indices.extend_from_slice(&[p00, p01, p11, p00, p11, p10]);
            }
        }

        Self {
            positions,
            normals: Some(normals),
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::lerp;

    fn assert_outward(mesh: &Mesh) {
        for triangle in mesh.triangles() {
            let face = triangle.face_normal();
            for vertex in triangle.vertices {
                assert!(
                    face.dot(vertex.normal) > 0.0,
                    "face normal {:?} disagrees with vertex normal {:?}",
                    face,
                    vertex.normal
                );
            }
        }
    }

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_normal_count_mismatch() {
        let result = Mesh::new(vec![Vec3::ZERO; 3], vec![0, 1, 2], Some(vec![Vec3::Y]));
        assert_eq!(
            result.unwrap_err(),
            SceneError::NormalCountMismatch {
                normals: 1,
                vertices: 3
            }
        );
    }

    #[test]
    fn test_compute_normals() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2], None).unwrap();
        mesh.ensure_normals();

        // (1,0,0) × (0,1,0) = +Z
        for normal in mesh.normals.as_ref().unwrap() {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_bounds_and_fit() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(3.0, 4.0, 5.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2], None).unwrap();

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(mesh.center(), Vec3::new(1.0, 1.0, 1.0));

        mesh.fit_to_size(2.0);
        assert!(mesh.center().length() < 1e-5);
        assert!((mesh.size() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let mesh = Mesh::new(Vec::new(), Vec::new(), None).unwrap();
        assert!(mesh.bounds().is_none());
        assert_eq!(mesh.size(), 0.0);
        assert!(mesh.triangles().is_empty());
    }

    #[test]
    fn test_triangles_skip_invalid_indices() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        // Second face references vertex 9
        let mesh = Mesh::new(positions.clone(), vec![0, 1, 2, 1, 9, 2], None).unwrap();
        let triangles = mesh.triangles();

        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].vertices[0].position, positions[0]);
        assert_eq!(triangles[0].vertices[1].position, positions[1]);
        assert_eq!(triangles[0].vertices[2].position, positions[2]);
        assert_eq!(triangles[0].vertices[0].normal, Vec3::Z);
    }

    #[test]
    fn test_triangles_with_truncated_normals() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2, 1, 3, 2], Some(vec![Vec3::Y; 4])).unwrap();

        // Normals shrunk after validation
        mesh.normals = Some(vec![Vec3::Y; 3]);
        let triangles = mesh.triangles();

        assert_eq!(triangles.len(), 2);
        assert!(triangles[0].vertices.iter().all(|v| v.normal == Vec3::Y));
        assert!(triangles[1].vertices.iter().all(|v| v.normal == Vec3::Z));
    }

    #[test]
    fn test_cube_faces_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.bounds(), Some((Vec3::splat(-1.0), Vec3::splat(1.0))));
        assert_outward(&cube);
    }

    #[test]
    fn test_torus_faces_outward() {
        let torus = Mesh::torus(1.0, 0.3, 16, 8);
        assert_eq!(torus.vertex_count(), 128);
        assert_eq!(torus.triangle_count(), 256);
        assert_outward(&torus);
    }

    #[test]
    fn test_vertex_lerp() {
        let a = Vertex::new(Vec3::ZERO, Vec3::X);
        let b = Vertex::new(Vec3::new(2.0, 4.0, 6.0), Vec3::Y);
        let mid = lerp(a, b, 0.5);
        assert_eq!(mid.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mid.normal, Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(lerp(a, b, 2.0), b);
    }
}
