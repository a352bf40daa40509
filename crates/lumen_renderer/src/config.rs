//! Renderer configuration.
//!
//! Every field has a default matching the reference scenes, and all structs
//! deserialize with `#[serde(default)]` so a JSON file only needs the values
//! it overrides.

use lumen_math::{colors, Color, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;

/// Camera, transform and lighting parameters for the rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    /// Camera position (world space)
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Fixed rotation about x applied after the spin
    pub tilt: f32,
    /// Model translation applied last
    pub offset: Vec3,
    /// Spin about y added per frame-driver tick (radians)
    pub rotation_step: f32,
    /// Point light position (world space)
    pub light_position: Vec3,
    pub light_color: Color,
    pub ambient: Color,
    /// Color of pixels no triangle covers
    pub background: Color,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 0.78,
            z_near: 0.1,
            z_far: 100.0,
            tilt: 0.65,
            offset: Vec3::new(0.0, -0.4, 0.0),
            rotation_step: 0.02,
            light_position: Vec3::new(1.0, 1.0, -4.0),
            light_color: colors::WHITE,
            ambient: colors::DARK_GRAY,
            background: colors::GRAY,
        }
    }
}

impl RasterizerConfig {
    /// Clear tilt, offset and spin so models render in their own frame.
    pub fn with_static_model(mut self) -> Self {
        self.tilt = 0.0;
        self.offset = Vec3::ZERO;
        self.rotation_step = 0.0;
        self
    }

    pub fn with_light(mut self, position: Vec3, color: Color) -> Self {
        self.light_position = position;
        self.light_color = color;
        self
    }
}

/// Camera and colors for the grid raycaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycasterConfig {
    /// Camera position in map cells
    pub position: Vec2,
    /// View direction before rotation
    pub direction: Vec2,
    /// Camera plane before rotation; its length sets the field of view
    pub plane: Vec2,
    /// Starting camera angle (radians)
    pub angle: f32,
    /// Angle added per frame-driver tick (radians)
    pub rotation_step: f32,
    pub ceiling: Color,
    pub floor: Color,
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(3.5, 3.5),
            direction: Vec2::new(-1.0, 0.0),
            plane: Vec2::new(0.0, 0.5),
            angle: 0.0,
            rotation_step: 0.01,
            ceiling: colors::GRAY,
            floor: colors::GRAY,
        }
    }
}

impl RaycasterConfig {
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

/// Camera and sampling parameters for the ray tracer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaytracerConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Bounces before a path returns black, at most `MAX_TRACE_DEPTH`
    pub max_depth: u32,
    /// Seed for the renderer's random stream
    pub seed: u64,
    /// Randomize the sample position inside each pixel
    pub jitter: bool,
    /// Color returned by rays that escape the scene
    pub background: Color,
}

impl Default for RaytracerConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 0.785,
            max_depth: 5,
            seed: 42,
            jitter: true,
            background: colors::BLACK,
        }
    }
}

impl RaytracerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Settings for all three renderers, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub rasterizer: RasterizerConfig,
    pub raycaster: RaycasterConfig,
    pub raytracer: RaytracerConfig,
}

impl RenderSettings {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
