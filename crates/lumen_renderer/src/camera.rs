//! Pinhole camera for primary rays.

use lumen_math::{Ray, Vec2, Vec3};

use crate::error::{RenderError, RenderResult};

/// Camera for generating rays into the scene.
///
/// Left-handed: `right = up × forward`, so with `up = +y` and
/// `forward = +z` the image x axis runs along world `+x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeCamera {
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    /// tan(fov / 2)
    scale: f32,
}

impl PinholeCamera {
    /// `fov` is the vertical field of view in radians.
    pub fn new(eye: Vec3, target: Vec3, up: Vec3, fov: f32) -> RenderResult<Self> {
        let forward = (target - eye).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Err(RenderError::InvalidCamera(format!("eye {eye} coincides with target")));
        }

        let right = up.cross(forward).normalize_or_zero();
        if right == Vec3::ZERO {
            return Err(RenderError::InvalidCamera(format!(
                "up {up} is parallel to the view direction {forward}"
            )));
        }

        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(RenderError::InvalidCamera(format!("field of view {fov} out of range")));
        }

        Ok(Self {
            eye,
            forward,
            right,
            up: forward.cross(right),
            scale: (fov / 2.0).tan(),
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Ray through pixel `(x, y)` of a `width` x `height` image.
    ///
    /// `offset` moves the sample inside the pixel, in pixels; zero is the
    /// pixel centre. Image y grows downward.
    pub fn ray(&self, x: u32, y: u32, width: u32, height: u32, offset: Vec2) -> Ray {
        let (w, h) = (width as f32, height as f32);
        let aspect = w / h;

        let camera_x = (2.0 * (x as f32 + 0.5 + offset.x) / w - 1.0) * aspect * self.scale;
        let camera_y = (1.0 - 2.0 * (y as f32 + 0.5 + offset.y) / h) * self.scale;

        Ray::new(
            self.eye,
            self.forward + self.right * camera_x + self.up * camera_y,
        )
    }
}
