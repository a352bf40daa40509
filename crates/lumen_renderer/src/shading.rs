//! Phong lighting for the rasterizer.

use lumen_core::PhongMaterial;
use lumen_math::{Color, Vec3};

/// A point light in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}

/// Shade a view-space surface point.
///
/// The viewer sits at the view-space origin. `normal` must be unit length.
/// Specular only contributes on surfaces the light reaches.
pub fn phong(position: Vec3, normal: Vec3, material: &PhongMaterial, light: &PointLight, ambient: Color) -> Color {
    let to_light = (light.position - position).normalize_or_zero();
    let diffuse = to_light.dot(normal).max(0.0);

    let mut specular = 0.0;
    if diffuse > 0.0 {
        let reflected = reflect(-to_light, normal);
        let to_viewer = (-position).normalize_or_zero();
        specular = reflected.dot(to_viewer).max(0.0).powf(material.shininess);
    }

    ambient + material.diffuse * diffuse + light.color * specular
}

/// Mirror `incident` about the unit `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - normal * (2.0 * incident.dot(normal))
}
