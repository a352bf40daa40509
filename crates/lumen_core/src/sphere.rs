//! Implicit spheres for the ray tracer.

use lumen_math::{colors, Color, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Intersections closer than this are ignored to avoid self-intersection.
pub const HIT_EPSILON: f32 = 0.001;

/// How a sphere surface redirects light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SphereMaterial {
    #[default]
    Diffuse,
    Reflective,
    Refractive,
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
    #[serde(default)]
    pub emission: Color,
    #[serde(default)]
    pub material: SphereMaterial,
}

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub position: Vec3,
    /// Outward surface normal at the intersection
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Whether the ray arrived from outside the sphere
    pub front_face: bool,
    /// The sphere that was hit
    pub object: &'a Sphere,
}

impl Sphere {
    /// Create a sphere without emission. The radius must be positive and finite.
    pub fn new(center: Vec3, radius: f32, color: Color, material: SphereMaterial) -> SceneResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidSphere(format!("radius {radius} must be positive")));
        }
        if !center.is_finite() {
            return Err(SceneError::InvalidSphere(format!("center {center} is not finite")));
        }

        Ok(Self {
            center,
            radius,
            color,
            emission: colors::BLACK,
            material,
        })
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Intersect a ray with the sphere.
    ///
    /// Solves the quadratic in double precision. The huge wall spheres in
    /// the reference scene lose every significant digit of `b² - v·v + r²`
    /// in single precision.
    pub fn hit(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let v = (self.center - ray.origin).as_dvec3();
        let d = ray.direction.as_dvec3();
        let r = self.radius as f64;

        let b = v.dot(d);
        let discriminant = b * b - v.dot(v) + r * r;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let epsilon = HIT_EPSILON as f64;

        // Nearest root first
        let mut t = b - sqrtd;
        if t <= epsilon {
            t = b + sqrtd;
            if t <= epsilon {
                return None;
            }
        }

        let distance = t as f32;
        let position = ray.at(distance);
        let normal = (position - self.center) / self.radius;

        Some(HitRecord {
            position,
            normal,
            distance,
            front_face: ray.direction.dot(normal) < 0.0,
            object: self,
        })
    }
}

/// Find the nearest intersection across all spheres.
pub fn closest_hit<'a>(spheres: &'a [Sphere], ray: &Ray) -> Option<HitRecord<'a>> {
    spheres
        .iter()
        .filter_map(|sphere| sphere.hit(ray))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
