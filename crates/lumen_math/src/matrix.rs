//! 4x4 transform matrix in the row-vector convention.
//!
//! Points are treated as row vectors: `p * A * B` applies `A` first, then `B`.
//! The sixteen floats are laid out row by row with the translation in
//! `m[12..15]`, which is bit-for-bit the same memory layout as glam's
//! column-major `Mat4` of the transposed (column-vector) transform. `Matrix`
//! therefore wraps a `Mat4` and only flips the order of composition.
//!
//! All factories build left-handed transforms: view space `+z` points into the
//! screen and `perspective` maps `[z_near, z_far]` to depth `[0, 1]`.

use std::ops::Mul;

use glam::{Mat4, Vec3, Vec4};
use thiserror::Error;

/// Errors produced by the math kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("matrix is singular (determinant {determinant}) and cannot be inverted")]
    SingularMatrix { determinant: f32 },
}

/// A 4x4 affine/projective transform (row-vector convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(Mat4);

impl Matrix {
    /// The multiplicative identity.
    pub const IDENTITY: Matrix = Matrix(Mat4::IDENTITY);

    /// All sixteen entries zero.
    pub const ZERO: Matrix = Matrix(Mat4::ZERO);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Build from sixteen floats in row-major order (`m[12..15]` = translation).
    pub fn from_rows_array(m: &[f32; 16]) -> Self {
        Self(Mat4::from_cols_array(m))
    }

    /// The sixteen floats in row-major order.
    pub fn to_rows_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is the vertical field of view in radians. After the homogeneous
    /// divide, x/y land in `[-1, 1]` and depth in `[0, 1]` for points between
    /// the clip planes; `w` equals the view-space depth.
    pub fn perspective(fov: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self(Mat4::perspective_lh(fov, aspect, z_near, z_far))
    }

    /// Left-handed view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self(Mat4::look_at_lh(eye, target, up))
    }

    pub fn scale(factors: Vec3) -> Self {
        Self(Mat4::from_scale(factors))
    }

    pub fn translate(offset: Vec3) -> Self {
        Self(Mat4::from_translation(offset))
    }

    /// Rotation about the x axis by `angle` radians.
    pub fn rotate_x(angle: f32) -> Self {
        Self(Mat4::from_rotation_x(angle))
    }

    /// Rotation about the y axis by `angle` radians.
    pub fn rotate_y(angle: f32) -> Self {
        Self(Mat4::from_rotation_y(angle))
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn rotate_z(angle: f32) -> Self {
        Self(Mat4::from_rotation_z(angle))
    }

    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    pub fn determinant(&self) -> f32 {
        self.0.determinant()
    }

    /// Inverse via the adjugate over the determinant.
    ///
    /// Fails instead of returning Inf/NaN entries when the matrix is singular
    /// (for example a zero scale).
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.0.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(MathError::SingularMatrix { determinant });
        }

        let inverse = self.0.inverse();
        if !inverse.is_finite() {
            return Err(MathError::SingularMatrix { determinant });
        }

        Ok(Self(inverse))
    }

    /// Transform a point, returning the homogeneous result without dividing.
    #[inline]
    pub fn transform_homogeneous(&self, point: Vec3) -> Vec4 {
        self.0 * point.extend(1.0)
    }

    /// Transform a point (w = 1) and divide by the resulting `w`.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.0.project_point3(point)
    }

    /// Transform a direction (w = 0); translation has no effect.
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.0.transform_vector3(vector)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn abs_diff_eq(&self, other: &Matrix, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    /// `A * B` applies `A` first, then `B`.
    fn mul(self, rhs: Matrix) -> Matrix {
        Matrix(rhs.0 * self.0)
    }
}

impl Mul<Matrix> for Vec3 {
    type Output = Vec3;

    /// Point transform with perspective divide.
    fn mul(self, rhs: Matrix) -> Vec3 {
        rhs.transform_point(self)
    }
}
