//! Per-renderer pixel and depth storage.

use lumen_math::{Color, Rgba8};

/// Simple image buffer for storing render output.
///
/// Row-major, (0, 0) at the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::ZERO)
    }

    /// Create a new buffer filled with `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel at (x, y), or `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Writes outside the buffer are dropped.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Quantize to packed 8-bit pixels, optionally gamma-encoding first.
    pub fn to_rgba8(&self, gamma: bool) -> Vec<Rgba8> {
        let convert: fn(Color) -> Rgba8 = if gamma {
            Rgba8::from_color_gamma
        } else {
            Rgba8::from_color
        };
        self.pixels.iter().map(|color| convert(*color)).collect()
    }
}

/// Nearest depth seen per pixel. Smaller is nearer; cleared to +inf.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    depths: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depths: vec![f32::INFINITY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear to +inf, reallocating if the size changed.
    pub fn reset(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        } else {
            self.depths.fill(f32::INFINITY);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depths[y as usize * self.width as usize + x as usize])
    }

    /// Store `depth` if it is strictly nearer than the current value.
    ///
    /// Returns whether the fragment passed. Out-of-range coordinates fail.
    pub fn test_and_set(&mut self, x: u32, y: u32, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.depths[y as usize * self.width as usize + x as usize];
        if depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }
}
