//! Lumen Core - scene primitives shared by the renderers.
//!
//! This crate provides:
//!
//! - **Triangle meshes**: `Vertex`, `Triangle`, `Mesh`, and `Model` (mesh + Phong material)
//! - **Implicit spheres**: `Sphere`, `SphereMaterial`, `HitRecord`
//! - **Grid worlds**: `GridMap` of integer wall codes and the `Texture`s they select
//! - **Presets**: the reference scenes used by the frame driver and tests
//!
//! Nothing here reads files. Loaders live with the caller and hand over
//! triangles, positions or raw RGBA bytes.

pub mod error;
pub mod grid;
pub mod mesh;
pub mod model;
pub mod presets;
pub mod sphere;
pub mod texture;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use grid::GridMap;
pub use mesh::{Mesh, Triangle, Vertex};
pub use model::{Model, PhongMaterial};
pub use sphere::{closest_hit, HitRecord, Sphere, SphereMaterial, HIT_EPSILON};
pub use texture::Texture;
