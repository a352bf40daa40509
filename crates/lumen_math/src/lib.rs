//! Lumen math kernel.
//!
//! Vectors come straight from glam. On top of that this crate adds the pieces
//! the renderers share: a row-vector 4x4 [`Matrix`], [`Color`] helpers with a
//! packed 8-bit variant, clamped interpolation and the [`Ray`] type.

// Re-export glam for convenience
pub use glam::*;

mod color;
mod interp;
mod matrix;
mod ray;

pub use color::{colors, linear_to_gamma, Color, Rgba8};
pub use interp::{clamp01, lerp, Lerp};
pub use matrix::{MathError, Matrix};
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_normalize_zero_is_guarded() {
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_rotate() {
        let v = Vec2::new(-1.0, 0.0).rotate(Vec2::from_angle(std::f32::consts::FRAC_PI_2));
        assert!((v - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }
}
