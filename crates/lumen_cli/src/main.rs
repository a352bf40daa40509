//! Lumen frame driver.
//!
//! Builds one renderer, calls `render` then `advance` once per tick, and
//! writes the last frame to a PNG.
//!
//! ```text
//! lumen raytracer --frames 64 --gamma --output box.png
//! lumen rasterizer --mesh teapot.obj --frames 30
//! lumen rasterizer --cube
//! lumen raycaster --texture stone.png --texture brick.png
//! ```

mod assets;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumen_core::{presets, Model, PhongMaterial};
use lumen_renderer::{
    AnyRenderer, Rasterizer, Raycaster, Raytracer, RenderSettings, Renderer, RendererKind,
};

/// Bounding diagonal loaded meshes are scaled to.
const MESH_FIT_SIZE: f32 = 3.0;

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Render a scene with a CPU rasterizer, raycaster or ray tracer")]
struct Cli {
    #[command(subcommand)]
    technique: Technique,

    /// Output width in pixels
    #[arg(long, global = true, default_value_t = 320)]
    width: u32,

    /// Output height in pixels
    #[arg(long, global = true, default_value_t = 240)]
    height: u32,

    /// Ticks to run; the last frame is written
    #[arg(long, global = true, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    frames: u32,

    /// PNG file to write
    #[arg(short, long, global = true, default_value = "lumen.png")]
    output: PathBuf,

    /// JSON file overriding renderer settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gamma-encode (2.0) before quantizing
    #[arg(long, global = true)]
    gamma: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Technique {
    /// Scanline rasterizer with Phong shading
    Rasterizer {
        /// OBJ mesh to draw instead of the torus
        #[arg(long)]
        mesh: Option<PathBuf>,

        /// Draw the built-in cube instead of the torus
        #[arg(long, conflicts_with = "mesh")]
        cube: bool,
    },
    /// Grid raycaster with textured walls
    Raycaster {
        /// Wall texture for code 1, 2, ... (repeat the flag)
        #[arg(long)]
        texture: Vec<PathBuf>,

        /// JSON grid map (rows of wall codes)
        #[arg(long)]
        map: Option<PathBuf>,
    },
    /// Progressive path tracer over spheres
    Raytracer {
        /// JSON sphere list instead of the built-in box
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

impl Technique {
    fn kind(&self) -> RendererKind {
        match self {
            Self::Rasterizer { .. } => RendererKind::Rasterizer,
            Self::Raycaster { .. } => RendererKind::Raycaster,
            Self::Raytracer { .. } => RendererKind::Raytracer,
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    let Some(path) = path else {
        return Ok(RenderSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let settings = RenderSettings::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn build_renderer(technique: &Technique, settings: &RenderSettings) -> Result<AnyRenderer> {
    let renderer = match technique {
        Technique::Rasterizer { mesh: Some(path), .. } => {
            let mut mesh = assets::load_obj(path)?;
            mesh.fit_to_size(MESH_FIT_SIZE);
            let model = Model::from_mesh(&mesh, PhongMaterial::default());
            Rasterizer::new(vec![model], settings.rasterizer.clone()).into()
        }
        Technique::Rasterizer { cube: true, .. } => {
            let model = presets::cube_model(PhongMaterial::default());
            Rasterizer::new(vec![model], settings.rasterizer.clone()).into()
        }
        Technique::Raycaster { texture, map } if !texture.is_empty() || map.is_some() => {
            let map = match map {
                Some(path) => assets::load_map(path)?,
                None => presets::room_map()?,
            };
            let textures = if texture.is_empty() {
                presets::wall_textures()?
            } else {
                texture
                    .iter()
                    .map(|path| assets::load_texture(path))
                    .collect::<Result<Vec<_>>>()?
            };
            Raycaster::new(map, textures, settings.raycaster.clone())?.into()
        }
        Technique::Raytracer { scene: Some(path) } => {
            Raytracer::new(assets::load_spheres(path)?, settings.raytracer.clone())?.into()
        }
        other => lumen_renderer::preset_renderer(other.kind(), settings)?,
    };
    Ok(renderer)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::info!(
        "Starting {} at {}x{} for {} frame(s)",
        cli.technique.kind(),
        cli.width,
        cli.height,
        cli.frames
    );

    let settings = load_settings(cli.config.as_deref())?;
    let mut renderer = build_renderer(&cli.technique, &settings)?;

    let started = Instant::now();
    let mut frame = None;
    for tick in 0..cli.frames {
        let tick_start = Instant::now();
        frame = Some(
            renderer
                .render(cli.width, cli.height)
                .with_context(|| format!("Frame {} failed", tick))?,
        );
        renderer.advance();
        log::debug!("Frame {} rendered in {:.2?}", tick, tick_start.elapsed());
    }

    let elapsed = started.elapsed();
    log::info!(
        "Rendered {} frame(s) in {:.2?} ({:.2?} per frame)",
        cli.frames,
        elapsed,
        elapsed / cli.frames
    );

    let frame = frame.context("No frames rendered")?;
    assets::save_png(&frame, &cli.output, cli.gamma)?;

    Ok(())
}
