use lumen_math::{colors, Color};
use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, Triangle};

/// Phong surface parameters for rasterized models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhongMaterial {
    pub diffuse: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            diffuse: colors::ROYAL_BLUE,
            shininess: 4.0,
        }
    }
}

impl PhongMaterial {
    pub fn new(diffuse: Color, shininess: f32) -> Self {
        Self { diffuse, shininess }
    }
}

/// A triangle list drawn with one material.
#[derive(Debug, Clone)]
pub struct Model {
    pub triangles: Vec<Triangle>,
    pub material: PhongMaterial,
}

impl Model {
    pub fn new(triangles: Vec<Triangle>, material: PhongMaterial) -> Self {
        Self {
            triangles,
            material,
        }
    }

    /// Flatten a mesh, computing smooth normals first if it has none.
    pub fn from_mesh(mesh: &Mesh, material: PhongMaterial) -> Self {
        let triangles = if mesh.has_normals() {
            mesh.triangles()
        } else {
            let mut mesh = mesh.clone();
            mesh.ensure_normals();
            mesh.triangles()
        };

        log::debug!("Built model with {} triangles", triangles.len());
        Self::new(triangles, material)
    }
}
