//! File loaders and the PNG writer.
//!
//! The renderer crates never touch the disk; everything that reads or
//! writes a file lives here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use lumen_core::{GridMap, Mesh, Sphere, Texture};
use lumen_math::Vec3;
use lumen_renderer::PixelBuffer;

/// Load every object in an OBJ file into one mesh.
pub fn load_obj(path: &Path) -> Result<Mesh> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to read OBJ file {}", path.display()))?;

    if models.is_empty() {
        bail!("No models found in OBJ file {}", path.display());
    }

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        positions.extend(mesh.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        if mesh.normals.len() == mesh.positions.len() {
            normals.extend(mesh.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        } else {
            all_have_normals = false;
        }
        indices.extend(mesh.indices.iter().map(|i| base + i));

        log::debug!(
            "OBJ object '{}': {} vertices, {} triangles",
            model.name,
            vertex_count,
            mesh.indices.len() / 3
        );
    }

    let normals = if all_have_normals { Some(normals) } else { None };
    let mut mesh = Mesh::new(positions, indices, normals)?;
    mesh.ensure_normals();

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Decode an image file into a wall texture.
pub fn load_texture(path: &Path) -> Result<Texture> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open texture {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let texture = Texture::from_rgba8(width, height, image.as_raw())?;
    log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
    Ok(texture)
}

/// Read a grid map from JSON rows, e.g. `[[1, 1], [1, 0]]`.
pub fn load_map(path: &Path) -> Result<GridMap> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid map in {}", path.display()))
}

/// Read a sphere list from JSON.
pub fn load_spheres(path: &Path) -> Result<Vec<Sphere>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene {}", path.display()))?;
    let spheres: Vec<Sphere> =
        serde_json::from_str(&json).with_context(|| format!("Invalid scene in {}", path.display()))?;

    // Deserialization bypasses Sphere::new; run the same checks
    for sphere in &spheres {
        Sphere::new(sphere.center, sphere.radius, sphere.color, sphere.material)?;
    }
    Ok(spheres)
}

/// Write a buffer as an 8-bit RGBA PNG.
pub fn save_png(buffer: &PixelBuffer, path: &Path, gamma: bool) -> Result<()> {
    let pixels = buffer.to_rgba8(gamma);
    let bytes: &[u8] = bytemuck::cast_slice(&pixels);

    let Some(image) = image::RgbaImage::from_raw(buffer.width, buffer.height, bytes.to_vec()) else {
        bail!("Pixel data does not match {}x{}", buffer.width, buffer.height);
    };
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote {}x{} image to {}", buffer.width, buffer.height, path.display());
    Ok(())
}
