//! Reference scenes.
//!
//! These are the scenes the frame driver shows when no assets are given:
//! a spinning torus for the rasterizer, a small walled room for the
//! raycaster, and a Cornell-style box of spheres for the ray tracer.
//! Wall textures are generated procedurally so nothing touches the disk.

use lumen_math::{colors, Color, Vec3};

use crate::error::SceneResult;
use crate::grid::GridMap;
use crate::mesh::Mesh;
use crate::model::{Model, PhongMaterial};
use crate::sphere::{Sphere, SphereMaterial};
use crate::texture::Texture;

/// Edge length of the procedural wall textures.
pub const WALL_TEXTURE_SIZE: u32 = 64;

/// Light emitted by the ceiling of the sphere box.
pub const CEILING_EMISSION: Color = Color::new(1.6, 1.47, 1.29);

/// Radius offset of the wall spheres; walls sit `WALL_RADIUS - radius` from the origin.
const WALL_RADIUS: f32 = 1e4;

/// The 7x7 room the raycaster camera stands in. Code 1 is stone, 2 is brick.
///
/// Rows run along y: `rows[y][x]`. The brick alcove on the x = 1 column
/// opens toward +y.
pub fn room_map() -> SceneResult<GridMap> {
    GridMap::from_rows(vec![
        vec![1, 1, 1, 1, 1, 2, 2],
        vec![1, 0, 0, 0, 0, 2, 2],
        vec![2, 2, 0, 0, 0, 0, 1],
        vec![2, 0, 0, 0, 0, 0, 1],
        vec![2, 2, 0, 0, 0, 0, 1],
        vec![1, 1, 0, 0, 0, 2, 2],
        vec![1, 1, 1, 1, 1, 2, 2],
    ])
}

/// Wall textures in wall-code order: stone, then brick.
pub fn wall_textures() -> SceneResult<Vec<Texture>> {
    Ok(vec![stone_texture(WALL_TEXTURE_SIZE)?, brick_texture(WALL_TEXTURE_SIZE)?])
}

/// Grey blocks with a darker seam and per-texel speckle.
pub fn stone_texture(size: u32) -> SceneResult<Texture> {
    let block = (size / 4).max(1);
    Texture::from_fn(size, size, |x, y| {
        // Alternate rows shift by half a block
        let shift = if (y / block) % 2 == 0 { 0 } else { block / 2 };
        let seam = (x + shift) % block == 0 || y % block == 0;
        let base = if seam { 0.25 } else { 0.5 + 0.1 * hash_unit(x / block, y / block) };
        let value = base + 0.08 * (hash_unit(x, y) - 0.5);
        Color::splat(value)
    })
}

/// Running-bond red bricks with light mortar lines.
pub fn brick_texture(size: u32) -> SceneResult<Texture> {
    let brick_w = (size / 4).max(2);
    let brick_h = (size / 8).max(2);
    Texture::from_fn(size, size, |x, y| {
        let row = y / brick_h;
        let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
        let mortar = (x + shift) % brick_w == 0 || y % brick_h == 0;
        if mortar {
            return Color::splat(0.7);
        }

        let tone = 0.85 + 0.15 * hash_unit((x + shift) / brick_w, row);
        let grain = 0.06 * (hash_unit(x, y) - 0.5);
        Color::new(0.6 * tone + grain, 0.18 * tone + grain, 0.12 * tone + grain)
    })
}

/// Integer hash mapped to [0, 1). Stable across platforms.
fn hash_unit(x: u32, y: u32) -> f32 {
    let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 16;
    (h & 0x00ff_ffff) as f32 / 16_777_216.0
}

/// A torus model in the default material.
pub fn torus_model() -> Model {
    Model::from_mesh(&Mesh::torus(1.0, 0.4, 48, 24), PhongMaterial::default())
}

/// A unit cube model.
pub fn cube_model(material: PhongMaterial) -> Model {
    Model::from_mesh(&Mesh::cube(1.0), material)
}

/// The sphere box: six huge spheres as walls, a mirror ball and a glass ball.
///
/// The ceiling is the only emitter.
pub fn sphere_box() -> SceneResult<Vec<Sphere>> {
    let wall = |center: Vec3, inset: f32, color: Color| {
        Sphere::new(center * WALL_RADIUS, WALL_RADIUS - inset, color, SphereMaterial::Diffuse)
    };

    Ok(vec![
        wall(Vec3::NEG_X, 1.0, colors::CRIMSON)?,
        wall(Vec3::X, 1.0, colors::ROYAL_BLUE)?,
        wall(Vec3::Y, 1.0, colors::BLACK)?.with_emission(CEILING_EMISSION),
        wall(Vec3::NEG_Y, 1.0, colors::OFF_WHITE)?,
        wall(Vec3::Z, 2.0, colors::OFF_WHITE)?,
        wall(Vec3::NEG_Z, 3.0, colors::OFF_WHITE)?,
        Sphere::new(Vec3::new(0.5, -0.65, 0.25), 0.35, colors::WHITE, SphereMaterial::Refractive)?,
        Sphere::new(Vec3::new(-0.5, -0.7, 0.7), 0.3, colors::WHITE, SphereMaterial::Reflective)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::closest_hit;
    use lumen_math::Ray;

    #[test]
    fn test_room_is_enclosed() {
        let map = room_map().unwrap();
        assert_eq!(map.width(), 7);
        assert_eq!(map.height(), 7);
        for i in 0..7 {
            assert!(map.is_wall(i, 0));
            assert!(map.is_wall(i, 6));
            assert!(map.is_wall(0, i));
            assert!(map.is_wall(6, i));
        }
        assert!(!map.is_wall(3, 3));
    }

    #[test]
    fn test_room_axes() {
        let map = room_map().unwrap();
        // Brick along the x = 0 edge, stone along the y = 0 edge
        assert_eq!(map.cell(0, 2), Some(2));
        assert_eq!(map.cell(2, 0), Some(1));
        assert_eq!(map.cell(1, 3), Some(0));
        assert_eq!(map.cell(2, 1), Some(0));
        assert_eq!(map.cell(1, 2), Some(2));
    }

    #[test]
    fn test_one_texture_per_wall_code() {
        let map = room_map().unwrap();
        let textures = wall_textures().unwrap();
        assert_eq!(textures.len(), map.max_code() as usize);
        for texture in &textures {
            assert_eq!(texture.width(), WALL_TEXTURE_SIZE);
            assert_eq!(texture.height(), WALL_TEXTURE_SIZE);
        }
    }

    #[test]
    fn test_textures_are_deterministic() {
        assert_eq!(stone_texture(16).unwrap(), stone_texture(16).unwrap());
        assert_eq!(brick_texture(16).unwrap(), brick_texture(16).unwrap());
    }

    #[test]
    fn test_hash_unit_range() {
        for x in 0..32 {
            for y in 0..32 {
                let h = hash_unit(x, y);
                assert!((0.0..1.0).contains(&h));
            }
        }
    }

    #[test]
    fn test_sphere_box_layout() {
        let spheres = sphere_box().unwrap();
        assert_eq!(spheres.len(), 8);

        let emitters: Vec<_> = spheres.iter().filter(|s| s.emission != colors::BLACK).collect();
        assert_eq!(emitters.len(), 1);
        assert!(emitters[0].center.y > 0.0);

        // Looking up from the origin hits the ceiling one unit away
        let hit = closest_hit(&spheres, &Ray::new(Vec3::ZERO, Vec3::Y)).unwrap();
        assert!((hit.distance - 1.0).abs() < 0.01);
        assert_eq!(hit.object.emission, CEILING_EMISSION);
    }

    #[test]
    fn test_preset_models() {
        let torus = torus_model();
        assert_eq!(torus.triangles.len(), 48 * 24 * 2);
        assert_eq!(torus.material, PhongMaterial::default());

        let cube = cube_model(PhongMaterial::new(colors::GREEN, 8.0));
        assert_eq!(cube.triangles.len(), 12);
        assert_eq!(cube.material.diffuse, colors::GREEN);
    }
}
