//! Clamped interpolation.
//!
//! Every interpolation in Lumen saturates: `t` is clamped to [0, 1] before
//! blending, so edge walks never overshoot their endpoints.

use glam::{Vec2, Vec3};

/// Clamp a value to the [0, 1] range.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Types that can be blended linearly.
pub trait Lerp: Sized {
    /// Blend from `self` (t = 0) to `other` (t = 1). `t` is already clamped.
    fn lerp_unclamped(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_unclamped(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_unclamped(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp_unclamped(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// Linear interpolation from `min` to `max` with `t` clamped to [0, 1].
#[inline]
pub fn lerp<T: Lerp>(min: T, max: T, t: f32) -> T {
    min.lerp_unclamped(max, clamp01(t))
}
