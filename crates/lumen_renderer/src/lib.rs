//! Lumen Renderer - three CPU rendering techniques behind one trait.
//!
//! - [`Rasterizer`]: scanline triangle fill with a z-buffer and Phong shading
//! - [`Raycaster`]: per-column DDA march through a grid map with textured walls
//! - [`Raytracer`]: progressive Monte Carlo path tracing over spheres
//!
//! Each renderer owns its buffers and state. A frame driver calls
//! [`Renderer::render`] once per tick, then [`Renderer::advance`].

mod accumulator;
mod buffer;
mod camera;
mod config;
mod error;
mod rasterizer;
mod raycaster;
mod raytracer;
mod scatter;
mod shading;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use accumulator::Accumulator;
pub use buffer::{DepthBuffer, PixelBuffer};
pub use camera::PinholeCamera;
pub use config::{RasterizerConfig, RaycasterConfig, RaytracerConfig, RenderSettings};
pub use error::{RenderError, RenderResult};
pub use rasterizer::{project, unproject, RasterStats, Rasterizer};
pub use raycaster::{Raycaster, WallHit, MIN_WALL_DISTANCE};
pub use raytracer::{trace_ray, Raytracer, MAX_TRACE_DEPTH};
pub use scatter::{cosine_hemisphere, fresnel, refract, sample_diffuse, sample_refractive, Fresnel};
pub use shading::{phong, reflect, PointLight};

/// Common interface of the three renderers.
pub trait Renderer {
    /// Produce one frame at the given size.
    fn render(&mut self, width: u32, height: u32) -> RenderResult<PixelBuffer>;

    /// Step time-varying state by one frame-driver tick.
    fn advance(&mut self);

    fn kind(&self) -> RendererKind;
}

/// Which rendering technique a renderer implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Rasterizer,
    Raycaster,
    Raytracer,
}

impl RendererKind {
    pub const ALL: [RendererKind; 3] = [Self::Rasterizer, Self::Raycaster, Self::Raytracer];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rasterizer => "rasterizer",
            Self::Raycaster => "raycaster",
            Self::Raytracer => "raytracer",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown renderer '{s}', expected rasterizer, raycaster or raytracer"))
    }
}

/// A renderer chosen at runtime.
pub enum AnyRenderer {
    Rasterizer(Rasterizer),
    Raycaster(Raycaster),
    Raytracer(Raytracer),
}

impl AnyRenderer {
    fn inner(&mut self) -> &mut dyn Renderer {
        match self {
            Self::Rasterizer(r) => r,
            Self::Raycaster(r) => r,
            Self::Raytracer(r) => r,
        }
    }
}

impl Renderer for AnyRenderer {
    fn render(&mut self, width: u32, height: u32) -> RenderResult<PixelBuffer> {
        self.inner().render(width, height)
    }

    fn advance(&mut self) {
        self.inner().advance()
    }

    fn kind(&self) -> RendererKind {
        match self {
            Self::Rasterizer(_) => RendererKind::Rasterizer,
            Self::Raycaster(_) => RendererKind::Raycaster,
            Self::Raytracer(_) => RendererKind::Raytracer,
        }
    }
}

impl From<Rasterizer> for AnyRenderer {
    fn from(renderer: Rasterizer) -> Self {
        Self::Rasterizer(renderer)
    }
}

impl From<Raycaster> for AnyRenderer {
    fn from(renderer: Raycaster) -> Self {
        Self::Raycaster(renderer)
    }
}

impl From<Raytracer> for AnyRenderer {
    fn from(renderer: Raytracer) -> Self {
        Self::Raytracer(renderer)
    }
}

/// Build a renderer of `kind` over the reference scenes.
pub fn preset_renderer(kind: RendererKind, settings: &RenderSettings) -> RenderResult<AnyRenderer> {
    use lumen_core::presets;

    Ok(match kind {
        RendererKind::Rasterizer => {
            Rasterizer::new(vec![presets::torus_model()], settings.rasterizer.clone()).into()
        }
        RendererKind::Raycaster => Raycaster::new(
            presets::room_map()?,
            presets::wall_textures()?,
            settings.raycaster.clone(),
        )?
        .into(),
        RendererKind::Raytracer => {
            Raytracer::new(presets::sphere_box()?, settings.raytracer.clone())?.into()
        }
    })
}
