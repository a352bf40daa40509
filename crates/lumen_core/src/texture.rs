//! Texel grids for the raycaster walls.
//!
//! Textures are plain `Color` arrays. Decoding image files is the caller's
//! job; `Texture::from_rgba8` accepts the raw bytes a decoder produces.

use lumen_math::{Color, Rgba8};

use crate::error::{SceneError, SceneResult};

/// A 2D array of colors in row-major order, (0, 0) at the top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl Texture {
    /// Create a texture from texel data.
    pub fn new(width: u32, height: u32, texels: Vec<Color>) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyTexture { width, height });
        }

        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(SceneError::TextureSizeMismatch {
                expected,
                found: texels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Build a texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> SceneResult<Self> {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self::new(width, height, texels)
    }

    /// Build a texture from tightly packed 8-bit RGBA rows. Alpha is ignored.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> SceneResult<Self> {
        let texels = bytes
            .chunks_exact(4)
            .map(|px| Rgba8::new(px[0], px[1], px[2], px[3]).to_color())
            .collect();
        Self::new(width, height, texels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, or `None` outside the texture.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Nearest-neighbour lookup for `u`, `v` in [0, 1]. Coordinates are clamped.
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let index = y as usize * self.width as usize + x as usize;
        self.texels[index]
    }
}
