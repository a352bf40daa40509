//! First-person grid raycaster.
//!
//! One ray per screen column is marched through the map with a DDA walk,
//! stepping to whichever grid line (x or y) is nearer until it enters a
//! wall cell. The perpendicular wall distance sets the column height and the
//! fractional hit coordinate picks the texture column.

use lumen_core::{GridMap, Texture};
use lumen_math::{IVec2, Vec2};

use crate::buffer::PixelBuffer;
use crate::config::RaycasterConfig;
use crate::error::{check_dimensions, RenderError, RenderResult};
use crate::{Renderer, RendererKind};

/// Walls closer than this are drawn as if at this distance.
pub const MIN_WALL_DISTANCE: f32 = 1e-4;

/// Brightness of walls hit on a y-side.
const SIDE_SHADE: f32 = 0.5;

/// Result of marching one ray into the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Distance to the wall perpendicular to the camera plane
    pub distance: f32,
    /// True when the ray crossed a horizontal (y) grid line last
    pub side_hit: bool,
    /// Map cell that stopped the ray
    pub cell: IVec2,
    pub wall_code: u32,
    /// Where along the wall face the ray landed, in [0, 1)
    pub wall_x: f32,
}

/// Wolfenstein-style raycaster over a static grid map.
pub struct Raycaster {
    config: RaycasterConfig,
    map: GridMap,
    textures: Vec<Texture>,
    angle: f32,
    missed_columns: usize,
}

impl Raycaster {
    /// Create a raycaster. Every wall code in `map` needs a texture at `code - 1`.
    pub fn new(map: GridMap, textures: Vec<Texture>, config: RaycasterConfig) -> RenderResult<Self> {
        let max_code = map.max_code();
        if max_code as usize > textures.len() {
            return Err(RenderError::MissingTexture {
                code: max_code,
                available: textures.len(),
            });
        }

        if map.cell(config.position.x.floor() as i32, config.position.y.floor() as i32).is_none() {
            log::warn!("Raycaster camera {} starts outside the map", config.position);
        }

        log::info!(
            "Raycaster created: {}x{} map, {} wall textures",
            map.width(),
            map.height(),
            textures.len()
        );

        Ok(Self {
            angle: config.angle,
            config,
            map,
            textures,
            missed_columns: 0,
        })
    }

    pub fn config(&self) -> &RaycasterConfig {
        &self.config
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Current camera angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Columns whose ray left the map in the last frame.
    pub fn missed_columns(&self) -> usize {
        self.missed_columns
    }

    /// View direction and camera plane at the current angle.
    pub fn camera_vectors(&self) -> (Vec2, Vec2) {
        let rotation = Vec2::from_angle(self.angle);
        (rotation.rotate(self.config.direction), rotation.rotate(self.config.plane))
    }

    /// Ray through screen column `column` of `width`.
    pub fn column_ray(&self, column: u32, width: u32) -> Vec2 {
        let (view, plane) = self.camera_vectors();
        let camera_x = 2.0 * column as f32 / width as f32 - 1.0;
        view + plane * camera_x
    }

    /// March `ray` from the camera until it enters a wall.
    ///
    /// Returns `None` if the ray leaves the map first.
    pub fn cast_ray(&self, ray: Vec2) -> Option<WallHit> {
        let origin = self.config.position;
        let mut cell = origin.floor().as_ivec2();

        let step = IVec2::new(
            if ray.x < 0.0 { -1 } else { 1 },
            if ray.y < 0.0 { -1 } else { 1 },
        );

        // Ray length between successive x (resp. y) grid lines
        let length = ray.length();
        let delta = Vec2::new(
            if ray.x == 0.0 { f32::INFINITY } else { (length / ray.x).abs() },
            if ray.y == 0.0 { f32::INFINITY } else { (length / ray.y).abs() },
        );

        // Ray length to the first x (resp. y) grid line
        let mut side = Vec2::new(
            first_crossing(origin.x, cell.x, ray.x, delta.x),
            first_crossing(origin.y, cell.y, ray.y, delta.y),
        );

        let mut side_hit = false;
        let wall_code = loop {
            match self.map.cell(cell.x, cell.y) {
                None => return None,
                Some(code) if code > 0 => break code,
                Some(_) => {}
            }

            if side.x < side.y {
                side.x += delta.x;
                cell.x += step.x;
                side_hit = false;
            } else {
                side.y += delta.y;
                cell.y += step.y;
                side_hit = true;
            }
        };

        let distance = if side_hit {
            (cell.y as f32 - origin.y + (1 - step.y) as f32 / 2.0) / ray.y
        } else {
            (cell.x as f32 - origin.x + (1 - step.x) as f32 / 2.0) / ray.x
        };
        // Also catches NaN from a camera inside a wall
        let distance = if distance > MIN_WALL_DISTANCE {
            distance
        } else {
            MIN_WALL_DISTANCE
        };

        let along = if side_hit {
            origin.x + distance * ray.x
        } else {
            origin.y + distance * ray.y
        };
        let wall_x = along - along.floor();

        Some(WallHit {
            distance,
            side_hit,
            cell,
            wall_code,
            wall_x: if wall_x.is_finite() { wall_x } else { 0.0 },
        })
    }

    fn draw_column(&self, column: u32, hit: Option<WallHit>, output: &mut PixelBuffer) -> RenderResult<()> {
        let height = output.height;
        let Some(hit) = hit else {
            for y in 0..height {
                let color = if y < height / 2 { self.config.ceiling } else { self.config.floor };
                output.set(column, y, color);
            }
            return Ok(());
        };

        let texture = self
            .textures
            .get(hit.wall_code as usize - 1)
            .ok_or(RenderError::MissingTexture {
                code: hit.wall_code,
                available: self.textures.len(),
            })?;
        let shade = if hit.side_hit { SIDE_SHADE } else { 1.0 };

        let line_height = (height as f32 / hit.distance) as i64;
        let half = height as i64 / 2;
        let start = half - line_height / 2;
        let end = half + line_height / 2;
        let wall_top = height as f32 / 2.0 - line_height as f32 / 2.0;

        for y in 0..height {
            let row = y as i64;
            let color = if row < start {
                self.config.ceiling
            } else if row >= end {
                self.config.floor
            } else {
                let v = (y as f32 - wall_top) / line_height as f32;
                texture.sample_nearest(hit.wall_x, v) * shade
            };
            output.set(column, y, color);
        }

        Ok(())
    }
}

/// Ray length from `origin` to the first grid line along one axis.
fn first_crossing(origin: f32, cell: i32, ray: f32, delta: f32) -> f32 {
    if ray == 0.0 {
        f32::INFINITY
    } else if ray < 0.0 {
        (origin - cell as f32) * delta
    } else {
        (cell as f32 + 1.0 - origin) * delta
    }
}

impl Renderer for Raycaster {
    fn render(&mut self, width: u32, height: u32) -> RenderResult<PixelBuffer> {
        check_dimensions(width, height)?;

        let mut output = PixelBuffer::new(width, height);
        let mut missed = 0;

        for column in 0..width {
            let hit = self.cast_ray(self.column_ray(column, width));
            if hit.is_none() {
                missed += 1;
            }
            self.draw_column(column, hit, &mut output)?;
        }

        if missed > 0 {
            log::warn!("{} of {} rays left the map without hitting a wall", missed, width);
        }
        log::debug!("Raycast {}x{} at angle {:.3}", width, height, self.angle);
        self.missed_columns = missed;

        Ok(output)
    }

    fn advance(&mut self) {
        self.angle += self.config.rotation_step;
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Raycaster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::presets;
    use lumen_math::colors;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// 4x3 room: stone border, one brick cell at (2, 1).
    fn corridor() -> GridMap {
        GridMap::from_rows(vec![vec![1, 1, 1, 1], vec![1, 0, 2, 1], vec![1, 1, 1, 1]]).unwrap()
    }

    fn solid_textures() -> Vec<Texture> {
        vec![Texture::solid_color(colors::CRIMSON), Texture::solid_color(colors::GREEN)]
    }

    fn raycaster_at(position: Vec2, angle: f32) -> Raycaster {
        let config = RaycasterConfig::default().with_position(position).with_angle(angle);
        Raycaster::new(corridor(), solid_textures(), config).unwrap()
    }

    #[test]
    fn test_wall_one_unit_ahead_x() {
        let raycaster = raycaster_at(Vec2::new(1.0, 1.5), 0.0);
        let hit = raycaster.cast_ray(Vec2::X).unwrap();

        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!(!hit.side_hit);
        assert_eq!(hit.cell, IVec2::new(2, 1));
        assert_eq!(hit.wall_code, 2);
        assert!((hit.wall_x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_wall_one_unit_ahead_y() {
        let raycaster = raycaster_at(Vec2::new(1.5, 1.0), 0.0);
        let hit = raycaster.cast_ray(Vec2::Y).unwrap();

        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!(hit.side_hit);
        assert_eq!(hit.cell, IVec2::new(1, 2));
        assert_eq!(hit.wall_code, 1);
    }

    #[test]
    fn test_negative_direction() {
        let raycaster = raycaster_at(Vec2::new(1.25, 1.5), 0.0);
        let hit = raycaster.cast_ray(Vec2::NEG_X).unwrap();

        // Face of cell 0 is at x = 1
        assert!((hit.distance - 0.25).abs() < 1e-5);
        assert_eq!(hit.cell, IVec2::new(0, 1));
    }

    #[test]
    fn test_ray_leaving_map() {
        let open = GridMap::from_rows(vec![vec![0, 0], vec![0, 0]]).unwrap();
        let config = RaycasterConfig::default().with_position(Vec2::new(0.5, 0.5));
        let mut raycaster = Raycaster::new(open, Vec::new(), config).unwrap();

        assert!(raycaster.cast_ray(Vec2::new(1.0, 0.3)).is_none());
        assert!(raycaster.cast_ray(Vec2::ZERO).is_none());

        let output = raycaster.render(8, 8).unwrap();
        assert_eq!(raycaster.missed_columns(), 8);
        assert_eq!(output.get(3, 0), Some(colors::GRAY));
    }

    #[test]
    fn test_camera_inside_wall() {
        let solid = GridMap::from_rows(vec![vec![1]]).unwrap();
        let config = RaycasterConfig::default().with_position(Vec2::new(0.5, 0.5));
        let raycaster = Raycaster::new(solid, solid_textures(), config).unwrap();

        let hit = raycaster.cast_ray(Vec2::X).unwrap();
        assert_eq!(hit.distance, MIN_WALL_DISTANCE);
        assert_eq!(hit.cell, IVec2::ZERO);
    }

    #[test]
    fn test_missing_texture() {
        let result = Raycaster::new(corridor(), vec![Texture::solid_color(colors::WHITE)], RaycasterConfig::default());
        assert!(matches!(
            result,
            Err(RenderError::MissingTexture { code: 2, available: 1 })
        ));
    }

    #[test]
    fn test_render_x_side_unshaded() {
        // Angle pi turns the default (-1, 0) view towards +x
        let mut raycaster = raycaster_at(Vec2::new(1.0, 1.5), PI);
        let output = raycaster.render(16, 16).unwrap();

        let centre = output.get(8, 8).unwrap();
        assert!((centre - colors::GREEN).length() < 1e-5);
        assert_eq!(raycaster.missed_columns(), 0);
    }

    #[test]
    fn test_render_y_side_shaded() {
        // Angle -pi/2 turns the view towards +y
        let mut raycaster = raycaster_at(Vec2::new(1.5, 1.0), -FRAC_PI_2);
        let output = raycaster.render(16, 16).unwrap();

        let centre = output.get(8, 8).unwrap();
        assert!((centre - colors::CRIMSON * 0.5).length() < 1e-5);
    }

    #[test]
    fn test_far_wall_leaves_ceiling_and_floor() {
        let hall = GridMap::from_rows(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1],
        ])
        .unwrap();
        let config = RaycasterConfig::default()
            .with_position(Vec2::new(1.5, 1.5))
            .with_angle(PI);
        let mut raycaster = Raycaster::new(hall, solid_textures(), config).unwrap();

        let hit = raycaster.cast_ray(raycaster.column_ray(8, 16)).unwrap();
        assert!((hit.distance - 3.5).abs() < 1e-4);

        let output = raycaster.render(16, 16).unwrap();
        assert_eq!(output.get(8, 0), Some(colors::GRAY));
        assert_eq!(output.get(8, 15), Some(colors::GRAY));
        assert!((output.get(8, 8).unwrap() - colors::CRIMSON).length() < 1e-5);
    }

    #[test]
    fn test_reference_room() {
        let map = presets::room_map().unwrap();
        let textures = presets::wall_textures().unwrap();
        let mut raycaster = Raycaster::new(map, textures, RaycasterConfig::default()).unwrap();

        let first = raycaster.render(64, 48).unwrap();
        assert_eq!(raycaster.missed_columns(), 0);
        assert_eq!(first.pixels.len(), 64 * 48);

        raycaster.advance();
        assert!((raycaster.angle() - 0.01).abs() < 1e-6);
        let second = raycaster.render(64, 48).unwrap();
        assert_ne!(first.pixels, second.pixels);
    }

    #[test]
    fn test_reference_room_alcove() {
        let config = RaycasterConfig::default().with_position(Vec2::new(1.5, 3.5));
        let raycaster =
            Raycaster::new(presets::room_map().unwrap(), presets::wall_textures().unwrap(), config).unwrap();

        let hit = raycaster.cast_ray(Vec2::Y).unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert_eq!(hit.cell, IVec2::new(1, 4));
        assert_eq!(hit.wall_code, 2);

        let hit = raycaster.cast_ray(Vec2::NEG_Y).unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert_eq!(hit.cell, IVec2::new(1, 2));
    }

    #[test]
    fn test_column_rays_span_plane() {
        let raycaster = raycaster_at(Vec2::new(1.5, 1.5), 0.0);
        assert_eq!(raycaster.column_ray(0, 10), Vec2::new(-1.0, -0.5));
        assert_eq!(raycaster.column_ray(5, 10), Vec2::new(-1.0, 0.0));

        let (view, plane) = raycaster.camera_vectors();
        assert!(view.dot(plane).abs() < 1e-6);
    }
}
