//! Scanline triangle rasterizer.
//!
//! Each frame runs the classic fixed-function pipeline on the CPU:
//!
//! 1. Build model, view, projection, inverse projection and normal matrices
//! 2. Cull back faces in world space, transform survivors to clip space
//! 3. Project to screen space and sort each triangle's vertices by y
//! 4. Fill the upper and lower halves row by row, interpolating position,
//!    depth and normal along the edges and then across the span
//! 5. Depth-test every pixel and Phong-shade the survivors in view space
//!
//! Screen space has its origin at the top-left with y growing downward.
//! Depth is the post-divide z in [0, 1]; smaller is nearer.

use lumen_core::{Model, PhongMaterial, Triangle, Vertex};
use lumen_math::{lerp, Matrix, Vec3};

use crate::buffer::{DepthBuffer, PixelBuffer};
use crate::config::RasterizerConfig;
use crate::error::{check_dimensions, RenderResult};
use crate::shading::{phong, PointLight};
use crate::{Renderer, RendererKind};

/// Map a post-divide (NDC) point to screen pixels.
///
/// x scales by the full width around the centre; y is flipped so +y is up
/// in NDC and down on screen. z passes through.
#[inline]
pub fn project(ndc: Vec3, width: f32, height: f32) -> Vec3 {
    Vec3::new(
        ndc.x * width + width / 2.0,
        height / 2.0 - ndc.y * height,
        ndc.z,
    )
}

/// Exact inverse of [`project`].
#[inline]
pub fn unproject(screen: Vec3, width: f32, height: f32) -> Vec3 {
    Vec3::new(
        (screen.x - width / 2.0) / width,
        (height / 2.0 - screen.y) / height,
        screen.z,
    )
}

/// Matrices and light derived once per frame.
struct FrameState {
    model: Matrix,
    view_projection: Matrix,
    inverse_projection: Matrix,
    normal_matrix: Matrix,
    light: PointLight,
    width: f32,
    height: f32,
}

impl FrameState {
    fn new(config: &RasterizerConfig, rotation: f32, width: u32, height: u32) -> RenderResult<Self> {
        let model = Matrix::rotate_y(-rotation)
            * Matrix::rotate_x(config.tilt)
            * Matrix::translate(config.offset);
        let view = Matrix::look_at(config.eye, config.target, config.up);
        let aspect = width as f32 / height as f32;
        let projection = Matrix::perspective(config.fov, aspect, config.z_near, config.z_far);

        let inverse_projection = projection.inverse()?;
        let normal_matrix = (model * view).inverse()?.transpose();

        Ok(Self {
            model,
            view_projection: view * projection,
            inverse_projection,
            normal_matrix,
            light: PointLight {
                position: view.transform_point(config.light_position),
                color: config.light_color,
            },
            width: width as f32,
            height: height as f32,
        })
    }
}

/// Per-frame counters, logged at debug level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RasterStats {
    pub drawn: usize,
    pub culled: usize,
    pub clipped: usize,
    pub degenerate: usize,
    pub fragments: usize,
}

/// Scanline rasterizer over a list of Phong-shaded models.
pub struct Rasterizer {
    config: RasterizerConfig,
    models: Vec<Model>,
    rotation: f32,
    depth: DepthBuffer,
    stats: RasterStats,
}

impl Rasterizer {
    pub fn new(models: Vec<Model>, config: RasterizerConfig) -> Self {
        let triangles: usize = models.iter().map(|m| m.triangles.len()).sum();
        log::info!(
            "Rasterizer created: {} models, {} triangles",
            models.len(),
            triangles
        );

        Self {
            config,
            models,
            rotation: 0.0,
            depth: DepthBuffer::new(0, 0),
            stats: RasterStats::default(),
        }
    }

    pub fn config(&self) -> &RasterizerConfig {
        &self.config
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Current spin about y in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Depth buffer from the last frame.
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Counters from the last frame.
    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    fn draw_triangle(
        &mut self,
        triangle: &Triangle,
        material: &PhongMaterial,
        frame: &FrameState,
        output: &mut PixelBuffer,
    ) {
        let world = triangle.vertices.map(|v| v.position * frame.model);

        // Back-face test against the true eye position
        let face_normal = (world[1] - world[0]).cross(world[2] - world[0]);
        if (world[0] - self.config.eye).dot(face_normal) >= 0.0 {
            self.stats.culled += 1;
            return;
        }

        let clip = world.map(|p| frame.view_projection.transform_homogeneous(p));
        if clip.iter().any(|c| c.w <= 0.0) {
            self.stats.clipped += 1;
            return;
        }

        let mut screen: [Vertex; 3] = [Vertex::default(); 3];
        for i in 0..3 {
            let ndc = clip[i].truncate() / clip[i].w;
            screen[i] = Vertex::new(
                project(ndc, frame.width, frame.height),
                triangle.vertices[i].normal,
            );
        }
        screen.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        let [top, mid, bottom] = screen;

        if top.position.y == bottom.position.y {
            self.stats.degenerate += 1;
            return;
        }
        self.stats.drawn += 1;

        let last_row = frame.height as i32 - 1;
        let row_of = |y: f32| y.floor() as i32;

        // Upper half: rows from the top vertex down to (not including) the middle
        for row in row_of(top.position.y).max(0)..row_of(mid.position.y).min(last_row + 1) {
            let y = row as f32;
            let a = edge_point(top, mid, y);
            let b = edge_point(top, bottom, y);
            self.draw_span(row, a, b, material, frame, output);
        }

        // Lower half: middle row through the bottom vertex
        for row in row_of(mid.position.y).max(0)..=row_of(bottom.position.y).min(last_row) {
            let y = row as f32;
            let a = edge_point(mid, bottom, y);
            let b = edge_point(top, bottom, y);
            self.draw_span(row, a, b, material, frame, output);
        }
    }

    fn draw_span(
        &mut self,
        row: i32,
        a: Vertex,
        b: Vertex,
        material: &PhongMaterial,
        frame: &FrameState,
        output: &mut PixelBuffer,
    ) {
        let (left, right) = if a.position.x <= b.position.x { (a, b) } else { (b, a) };
        let span = right.position.x - left.position.x;

        let first = (left.position.x.floor() as i32).max(0);
        let last = (right.position.x.floor() as i32).min(frame.width as i32);

        for column in first..last {
            let t = if span > 0.0 {
                (column as f32 - left.position.x) / span
            } else {
                0.0
            };
            let fragment = lerp(left, right, t);
            let depth = fragment.position.z;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            let (x, y) = (column as u32, row as u32);
            if !self.depth.test_and_set(x, y, depth) {
                continue;
            }
            self.stats.fragments += 1;

            let ndc = unproject(fragment.position, frame.width, frame.height);
            let view_position = ndc * frame.inverse_projection;
            let view_normal = frame
                .normal_matrix
                .transform_vector(fragment.normal)
                .normalize_or_zero();

            let color = phong(view_position, view_normal, material, &frame.light, self.config.ambient);
            output.set(x, y, color);
        }
    }
}

/// Point on edge `from -> to` at screen row `y`.
///
/// A horizontal edge yields `from`.
fn edge_point(from: Vertex, to: Vertex, y: f32) -> Vertex {
    let dy = to.position.y - from.position.y;
    let t = if dy != 0.0 { (y - from.position.y) / dy } else { 0.0 };
    lerp(from, to, t)
}

impl Renderer for Rasterizer {
    fn render(&mut self, width: u32, height: u32) -> RenderResult<PixelBuffer> {
        check_dimensions(width, height)?;

        let frame = FrameState::new(&self.config, self.rotation, width, height)?;
        self.depth.reset(width, height);
        self.stats = RasterStats::default();

        let mut output = PixelBuffer::filled(width, height, self.config.background);

        // Taken out so draw_triangle can borrow self mutably
        let models = std::mem::take(&mut self.models);
        for model in &models {
            for triangle in &model.triangles {
                self.draw_triangle(triangle, &model.material, &frame, &mut output);
            }
        }
        self.models = models;

        log::debug!(
            "Rasterized {}x{}: {} drawn, {} culled, {} clipped, {} degenerate, {} fragments",
            width,
            height,
            self.stats.drawn,
            self.stats.culled,
            self.stats.clipped,
            self.stats.degenerate,
            self.stats.fragments
        );

        Ok(output)
    }

    fn advance(&mut self) {
        self.rotation += self.config.rotation_step;
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Rasterizer
    }
}
