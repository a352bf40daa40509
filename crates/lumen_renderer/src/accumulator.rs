use lumen_math::Color;

use crate::buffer::PixelBuffer;

/// Running per-pixel average of successive frames.
///
/// After `n` frames each pixel holds the mean of its `n` samples, updated
/// in place as `avg' = avg + (sample - avg) / (n + 1)`. A sample equal to
/// the current average leaves it untouched, so a converged pixel stays exact.
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    average: Vec<Color>,
    samples: u32,
}

impl Accumulator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            average: vec![Color::ZERO; width as usize * height as usize],
            samples: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frames folded into the average so far.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Drop all history.
    pub fn reset(&mut self) {
        self.average.fill(Color::ZERO);
        self.samples = 0;
    }

    /// Match the output size, discarding history if it changed.
    ///
    /// Returns true when the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Fold one frame into the average. The frame must match the accumulator size.
    pub fn add_frame(&mut self, frame: &PixelBuffer) {
        debug_assert_eq!((frame.width, frame.height), (self.width, self.height));

        let count = self.samples as f32 + 1.0;
        for (average, sample) in self.average.iter_mut().zip(&frame.pixels) {
            *average += (*sample - *average) / count;
        }
        self.samples += 1;
    }

    /// Current average as an image.
    pub fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self.average.clone(),
        }
    }
}
