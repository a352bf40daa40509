//! Linear RGB color and its packed 8-bit framebuffer form.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clamp01;

/// Color type alias (RGB values typically 0-1)
///
/// Addition, scaling, the component product (light attenuation/tinting) and
/// interpolation all come from `Vec3`.
pub type Color = Vec3;

/// Named colors used by the preset scenes.
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const OFF_WHITE: Color = Color::new(0.85, 0.85, 0.85);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5);
    pub const DARK_GRAY: Color = Color::new(0.1, 0.1, 0.1);
    pub const ROYAL_BLUE: Color = Color::new(0.25, 0.25, 0.75);
    pub const CRIMSON: Color = Color::new(0.75, 0.25, 0.25);
    pub const GREEN: Color = Color::new(0.25, 0.75, 0.25);
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// One packed framebuffer pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize a linear color, clamping each channel to [0, 1]. Alpha is opaque.
    pub fn from_color(color: Color) -> Self {
        Self {
            r: (255.0 * clamp01(color.x)) as u8,
            g: (255.0 * clamp01(color.y)) as u8,
            b: (255.0 * clamp01(color.z)) as u8,
            a: 255,
        }
    }

    /// Like [`Rgba8::from_color`] but gamma-encodes first.
    pub fn from_color_gamma(color: Color) -> Self {
        Self::from_color(Color::new(
            linear_to_gamma(color.x),
            linear_to_gamma(color.y),
            linear_to_gamma(color.z),
        ))
    }

    /// Back to a linear float color (alpha dropped).
    pub fn to_color(self) -> Color {
        Color::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}
