//! Progressive path tracer over implicit spheres.
//!
//! Every `render` call traces one jittered path per pixel and folds the
//! frame into a running average, so a static scene converges over
//! successive frames. Changing the scene, the camera or the output size
//! discards the history.

use lumen_core::{closest_hit, Sphere, SphereMaterial};
use lumen_math::{colors, Color, Ray, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::accumulator::Accumulator;
use crate::buffer::PixelBuffer;
use crate::camera::PinholeCamera;
use crate::config::RaytracerConfig;
use crate::error::{check_dimensions, RenderError, RenderResult};
use crate::scatter::{random_f32, reflect, sample_diffuse, sample_refractive};
use crate::{Renderer, RendererKind};

/// Largest accepted `max_depth`. `trace_ray` recurses once per bounce.
pub const MAX_TRACE_DEPTH: u32 = 64;

/// Compute the color seen by a ray.
///
/// Paths stop at `max_depth` bounces and contribute black from there.
/// Each hit returns `trace(next) * color + emission`.
pub fn trace_ray(
    spheres: &[Sphere],
    ray: &Ray,
    depth: u32,
    config: &RaytracerConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth >= config.max_depth {
        return colors::BLACK;
    }

    let Some(hit) = closest_hit(spheres, ray) else {
        return config.background;
    };
    let sphere = hit.object;

    // A black surface passes nothing on from further bounces
    if sphere.color == colors::BLACK {
        return sphere.emission;
    }

    let normal = if hit.front_face { hit.normal } else { -hit.normal };
    let direction = match sphere.material {
        SphereMaterial::Diffuse => sample_diffuse(normal, rng),
        SphereMaterial::Reflective => reflect(ray.direction, normal),
        SphereMaterial::Refractive => sample_refractive(ray.direction, normal, hit.front_face, rng),
    };

    let next = Ray::new(hit.position, direction);
    trace_ray(spheres, &next, depth + 1, config, rng) * sphere.color + sphere.emission
}

/// Sphere-scene path tracer with progressive accumulation.
pub struct Raytracer {
    config: RaytracerConfig,
    spheres: Vec<Sphere>,
    camera: PinholeCamera,
    rng: StdRng,
    accumulator: Accumulator,
}

impl Raytracer {
    pub fn new(spheres: Vec<Sphere>, config: RaytracerConfig) -> RenderResult<Self> {
        if config.max_depth > MAX_TRACE_DEPTH {
            return Err(RenderError::DepthTooLarge {
                max_depth: config.max_depth,
                limit: MAX_TRACE_DEPTH,
            });
        }

        let camera = PinholeCamera::new(config.eye, config.target, config.up, config.fov)?;
        log::info!(
            "Raytracer created: {} spheres, max depth {}, seed {}",
            spheres.len(),
            config.max_depth,
            config.seed
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            spheres,
            camera,
            accumulator: Accumulator::new(0, 0),
        })
    }

    pub fn config(&self) -> &RaytracerConfig {
        &self.config
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Mutable access to the scene. Discards accumulated samples.
    pub fn spheres_mut(&mut self) -> &mut Vec<Sphere> {
        self.reset_accumulation();
        &mut self.spheres
    }

    pub fn camera(&self) -> &PinholeCamera {
        &self.camera
    }

    /// Move the camera. Discards accumulated samples.
    pub fn set_camera(&mut self, eye: Vec3, target: Vec3) -> RenderResult<()> {
        self.camera = PinholeCamera::new(eye, target, self.config.up, self.config.fov)?;
        self.config.eye = eye;
        self.config.target = target;
        self.reset_accumulation();
        Ok(())
    }

    /// Frames folded into the current image.
    pub fn sample_count(&self) -> u32 {
        self.accumulator.samples()
    }

    pub fn reset_accumulation(&mut self) {
        if self.accumulator.samples() > 0 {
            log::debug!("Resetting accumulation after {} samples", self.accumulator.samples());
        }
        self.accumulator.reset();
    }

    fn trace_frame(&mut self, width: u32, height: u32) -> PixelBuffer {
        let mut frame = PixelBuffer::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let offset = if self.config.jitter {
                    Vec2::new(random_f32(&mut self.rng) - 0.5, random_f32(&mut self.rng) - 0.5)
                } else {
                    Vec2::ZERO
                };
                let ray = self.camera.ray(x, y, width, height, offset);
                let color = trace_ray(&self.spheres, &ray, 0, &self.config, &mut self.rng);
                frame.set(x, y, color);
            }
        }

        frame
    }
}

impl Renderer for Raytracer {
    fn render(&mut self, width: u32, height: u32) -> RenderResult<PixelBuffer> {
        check_dimensions(width, height)?;

        if self.accumulator.resize(width, height) {
            log::debug!("Accumulation buffer resized to {}x{}", width, height);
        }

        let frame = self.trace_frame(width, height);
        self.accumulator.add_frame(&frame);

        log::debug!(
            "Traced {}x{} frame, {} samples per pixel",
            width,
            height,
            self.accumulator.samples()
        );

        Ok(self.accumulator.to_buffer())
    }

    /// The scene is static between edits, so a tick only adds samples.
    fn advance(&mut self) {}

    fn kind(&self) -> RendererKind {
        RendererKind::Raytracer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderSettings;
    use lumen_core::presets;

    fn lamp(center: Vec3, radius: f32, emission: Color) -> Sphere {
        Sphere::new(center, radius, colors::BLACK, SphereMaterial::Diffuse)
            .unwrap()
            .with_emission(emission)
    }

    fn variance_across_seeds(frames: u32) -> f32 {
        let seeds = [1, 2, 3, 4, 5, 6, 7, 8];
        let images: Vec<PixelBuffer> = seeds
            .iter()
            .map(|seed| {
                let config = RaytracerConfig::default().with_seed(*seed);
                let mut tracer = Raytracer::new(presets::sphere_box().unwrap(), config).unwrap();
                let mut image = PixelBuffer::new(1, 1);
                for _ in 0..frames {
                    image = tracer.render(8, 8).unwrap();
                }
                image
            })
            .collect();

        let pixels = images[0].pixels.len();
        let mut total = 0.0;
        for i in 0..pixels {
            let mean: f32 = images.iter().map(|img| img.pixels[i].x).sum::<f32>() / seeds.len() as f32;
            let var: f32 = images
                .iter()
                .map(|img| (img.pixels[i].x - mean).powi(2))
                .sum::<f32>()
                / seeds.len() as f32;
            total += var;
        }
        total / pixels as f32
    }

    #[test]
    fn test_miss_returns_background() {
        let config = RaytracerConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let mut tracer = Raytracer::new(Vec::new(), config).unwrap();
        let image = tracer.render(4, 3).unwrap();
        assert!(image.pixels.iter().all(|p| *p == Color::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_emitter_seen_directly() {
        // Camera inside a glowing shell: every path ends on the first hit
        let shell = lamp(Vec3::ZERO, 10.0, Color::new(1.0, 0.5, 0.25));
        let mut tracer = Raytracer::new(vec![shell], RaytracerConfig::default()).unwrap();

        let mut image = tracer.render(6, 4).unwrap();
        for _ in 0..5 {
            image = tracer.render(6, 4).unwrap();
        }

        assert_eq!(tracer.sample_count(), 6);
        assert!(image.pixels.iter().all(|p| *p == Color::new(1.0, 0.5, 0.25)));
    }

    #[test]
    fn test_depth_limit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let spheres = [lamp(Vec3::new(0.0, 0.0, 5.0), 1.0, Color::ONE)];
        let mut rng = StdRng::seed_from_u64(0);

        let config = RaytracerConfig::default();
        assert_eq!(trace_ray(&spheres, &ray, 0, &config, &mut rng), Color::ONE);
        assert_eq!(trace_ray(&spheres, &ray, config.max_depth, &config, &mut rng), colors::BLACK);

        let none = RaytracerConfig::default().with_max_depth(0);
        assert_eq!(trace_ray(&spheres, &ray, 0, &none, &mut rng), colors::BLACK);
    }

    #[test]
    fn test_oversized_depth_rejected() {
        let settings = RenderSettings::from_json(r#"{"raytracer":{"max_depth":4000000000}}"#).unwrap();
        let shell = Sphere::new(Vec3::ZERO, 10.0, Color::ONE, SphereMaterial::Reflective).unwrap();
        assert!(matches!(
            Raytracer::new(vec![shell], settings.raytracer),
            Err(RenderError::DepthTooLarge { max_depth: 4_000_000_000, limit: MAX_TRACE_DEPTH })
        ));

        // A closed mirror at the limit terminates and returns black
        let config = RaytracerConfig::default().with_max_depth(MAX_TRACE_DEPTH);
        let mut tracer = Raytracer::new(vec![shell], config).unwrap();
        let image = tracer.render(1, 1).unwrap();
        assert_eq!(image.pixels[0], colors::BLACK);
    }

    #[test]
    fn test_mirror_bounce() {
        // Mirror ahead, lamp behind the camera
        let mirror = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Color::splat(0.5), SphereMaterial::Reflective).unwrap();
        let behind = lamp(Vec3::new(0.0, 0.0, -20.0), 5.0, Color::ONE);
        let mut rng = StdRng::seed_from_u64(0);

        let color = trace_ray(
            &[mirror, behind],
            &Ray::new(Vec3::ZERO, Vec3::Z),
            0,
            &RaytracerConfig::default(),
            &mut rng,
        );
        assert!((color - Color::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = Raytracer::new(presets::sphere_box().unwrap(), RaytracerConfig::default()).unwrap();
        let mut b = Raytracer::new(presets::sphere_box().unwrap(), RaytracerConfig::default()).unwrap();

        for _ in 0..3 {
            assert_eq!(a.render(12, 9).unwrap(), b.render(12, 9).unwrap());
        }
    }

    #[test]
    fn test_accumulation_resets() {
        let mut tracer = Raytracer::new(presets::sphere_box().unwrap(), RaytracerConfig::default()).unwrap();

        tracer.render(4, 4).unwrap();
        tracer.render(4, 4).unwrap();
        assert_eq!(tracer.sample_count(), 2);

        tracer.render(5, 4).unwrap();
        assert_eq!(tracer.sample_count(), 1);

        tracer.spheres_mut()[6].radius = 0.3;
        assert_eq!(tracer.sample_count(), 0);

        tracer.render(5, 4).unwrap();
        tracer.set_camera(Vec3::new(0.0, 0.0, -2.5), Vec3::ZERO).unwrap();
        assert_eq!(tracer.sample_count(), 0);
        assert!((tracer.camera().eye().z + 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_variance_shrinks_with_samples() {
        let single = variance_across_seeds(1);
        let many = variance_across_seeds(16);
        assert!(single > 0.0);
        assert!(many < single * 0.5, "variance {} -> {}", single, many);
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut tracer = Raytracer::new(Vec::new(), RaytracerConfig::default()).unwrap();
        assert!(matches!(
            tracer.render(3, 0),
            Err(RenderError::InvalidDimensions { width: 3, height: 0 })
        ));
    }
}
