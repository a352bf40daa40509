//! Direction sampling for the three sphere materials.
//!
//! All functions take the surface normal already flipped to face the
//! incoming ray.

use std::f32::consts::TAU;

use lumen_math::Vec3;
use rand::{Rng, RngCore};

pub use crate::shading::reflect;

/// Index of refraction outside every sphere.
pub const AIR_INDEX: f32 = 1.0;

/// Index of refraction inside refractive spheres.
pub const GLASS_INDEX: f32 = 1.5;

/// Generate a random f32 in [0, 1).
#[inline]
pub fn random_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Cosine-weighted direction on the hemisphere around `normal`.
///
/// `u1` and `u2` are uniform in [0, 1).
pub fn cosine_hemisphere(normal: Vec3, u1: f32, u2: f32) -> Vec3 {
    let mut tangent = normal.cross(Vec3::new(0.0, 1.0, 1.0)).normalize_or_zero();
    if tangent == Vec3::ZERO {
        // Normal parallel to (0, 1, 1)
        tangent = normal.any_orthonormal_vector();
    }
    let bitangent = tangent.cross(normal);

    let r = u1.sqrt();
    let theta = TAU * u2;
    let (sin_theta, cos_theta) = theta.sin_cos();

    tangent * (r * cos_theta) + bitangent * (r * sin_theta) + normal * (1.0 - u1).max(0.0).sqrt()
}

/// Diffuse bounce direction.
pub fn sample_diffuse(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = random_f32(rng);
    let u2 = random_f32(rng);
    cosine_hemisphere(normal, u1, u2)
}

/// Fresnel terms for light crossing from index `n1` into `n2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fresnel {
    /// Probability of taking the reflected branch
    pub reflectance: f32,
    /// Cosine of the transmitted angle
    pub cos_transmitted: f32,
}

/// Evaluate the Fresnel equations at incidence cosine `cos_i`.
///
/// Returns `None` under total internal reflection. The branch probability
/// is `rs² + rp²`.
pub fn fresnel(cos_i: f32, n1: f32, n2: f32) -> Option<Fresnel> {
    let eta = n1 / n2;
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin_t2 > 1.0 {
        return None;
    }

    let cos_t = (1.0 - sin_t2).sqrt();
    let rs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let rp = (n1 * cos_t - n2 * cos_i) / (n1 * cos_t + n2 * cos_i);

    Some(Fresnel {
        reflectance: rs * rs + rp * rp,
        cos_transmitted: cos_t,
    })
}

/// Snell refraction of unit `direction` through a surface with facing `normal`.
#[inline]
pub fn refract(direction: Vec3, normal: Vec3, eta: f32, cos_i: f32, cos_t: f32) -> Vec3 {
    direction * eta + normal * (eta * cos_i - cos_t)
}

/// Reflect or refract off a dielectric boundary.
///
/// `entering` selects air-to-glass versus glass-to-air indices.
pub fn sample_refractive(direction: Vec3, normal: Vec3, entering: bool, rng: &mut dyn RngCore) -> Vec3 {
    let (n1, n2) = if entering {
        (AIR_INDEX, GLASS_INDEX)
    } else {
        (GLASS_INDEX, AIR_INDEX)
    };
    let cos_i = direction.dot(normal).abs();

    match fresnel(cos_i, n1, n2) {
        Some(f) if random_f32(rng) >= f.reflectance => {
            refract(direction, normal, n1 / n2, cos_i, f.cos_transmitted)
        }
        _ => reflect(direction, normal),
    }
}
