// Copyright 2025 vantage
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Column-major `Mat3` and `Mat4` matrix types.

use super::{Quaternion, Vec3, Vec4, EPSILON};
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

// --- Mat3 ---

/// A 3x3 column-major matrix.
///
/// Serves as the rotation/scale block of a [`Mat4`] and as the target of
/// quaternion-to-matrix conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// The 3x3 zero matrix.
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO; 3],
    };

    /// Creates a matrix from three column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Returns row `index` as a vector.
    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::new(self.cols[0][index], self.cols[1][index], self.cols[2][index])
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(scale.x, 0.0, 0.0),
            Vec3::new(0.0, scale.y, 0.0),
            Vec3::new(0.0, 0.0, scale.z),
        )
    }

    /// Creates a rotation about the X axis, in radians.
    #[inline]
    pub fn from_rotation_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::X,
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
        )
    }

    /// Creates a rotation about the Y axis, in radians.
    #[inline]
    pub fn from_rotation_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, 0.0, -s),
            Vec3::Y,
            Vec3::new(s, 0.0, c),
        )
    }

    /// Creates a rotation about the Z axis, in radians.
    #[inline]
    pub fn from_rotation_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::Z,
        )
    }

    /// Creates a rotation about an arbitrary unit axis (Rodrigues form).
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        Self::from_cols(
            Vec3::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y),
            Vec3::new(t * y * x - s * z, t * y * y + c, t * y * z + s * x),
            Vec3::new(t * z * x + s * y, t * z * y - s * x, t * z * z + c),
        )
    }

    /// Creates the rotation matrix of a quaternion.
    ///
    /// The quaternion is normalized first so drifted inputs still produce
    /// a proper rotation.
    pub fn from_quat(q: Quaternion) -> Self {
        let q = q.normalize();
        let x2 = q.x + q.x;
        let y2 = q.y + q.y;
        let z2 = q.z + q.z;
        let xx = q.x * x2;
        let xy = q.x * y2;
        let xz = q.x * z2;
        let yy = q.y * y2;
        let yz = q.y * z2;
        let zz = q.z * z2;
        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        Self::from_cols(
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
        )
    }

    /// Extracts the upper-left 3x3 block of a [`Mat4`], discarding the
    /// translation column.
    #[inline]
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::from_cols(
            m.cols[0].truncate(),
            m.cols[1].truncate(),
            m.cols[2].truncate(),
        )
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f32 {
        let [c0, c1, c2] = self.cols;
        c0.x * (c1.y * c2.z - c2.y * c1.z) - c1.x * (c0.y * c2.z - c2.y * c0.z)
            + c2.x * (c0.y * c1.z - c1.y * c0.z)
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    /// Computes the inverse, or `None` when the matrix is singular
    /// (determinant within epsilon of zero).
    pub fn inverse(&self) -> Option<Self> {
        let [c0, c1, c2] = self.cols;
        let x0 = c1.y * c2.z - c2.y * c1.z;
        let x1 = c2.y * c0.z - c0.y * c2.z;
        let x2 = c0.y * c1.z - c1.y * c0.z;
        let det = c0.x * x0 + c1.x * x1 + c2.x * x2;

        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let y0 = c2.x * c1.z - c1.x * c2.z;
        let y1 = c0.x * c2.z - c2.x * c0.z;
        let y2 = c1.x * c0.z - c0.x * c1.z;
        let z0 = c1.x * c2.y - c2.x * c1.y;
        let z1 = c2.x * c0.y - c0.x * c2.y;
        let z2 = c0.x * c1.y - c1.x * c0.y;

        Some(Self::from_cols(
            Vec3::new(x0, x1, x2) * inv_det,
            Vec3::new(y0, y1, y2) * inv_det,
            Vec3::new(z0, z1, z2) * inv_det,
        ))
    }

    /// Re-orthogonalizes the basis columns via Gram-Schmidt.
    ///
    /// The first column keeps its direction, the second is made
    /// perpendicular to it, and the third is rebuilt as their cross
    /// product, so the result is always a right-handed orthonormal basis.
    /// Intended to correct drift accumulated by repeated composition of
    /// rotations; already-orthonormal input passes through unchanged
    /// (within epsilon), and the operation is idempotent.
    pub fn orthonormalize(&self) -> Self {
        let b0 = self.cols[0].normalize();
        let c1 = self.cols[1];
        let b1 = (c1 - b0 * b0.dot(c1)).normalize();
        let b2 = b0.cross(b1);
        Self::from_cols(b0, b1, b2)
    }

    /// Embeds this matrix in the upper-left block of a [`Mat4`] with no
    /// translation.
    #[inline]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::from_vec3(self.cols[0], 0.0),
            Vec4::from_vec3(self.cols[1], 0.0),
            Vec4::from_vec3(self.cols[2], 0.0),
            Vec4::W,
        )
    }
}

impl Default for Mat3 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat3) -> Self {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    /// Transforms a vector: a linear combination of the columns.
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn index(&self, index: usize) -> &Vec3 {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vec3 {
        &mut self.cols[index]
    }
}

// --- Mat4 ---

/// A 4x4 column-major matrix.
///
/// The general transform type: affine poses, view matrices, and projection
/// matrices are all `Mat4`s. Column-major layout matches what graphics APIs
/// expect when the matrix is uploaded raw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// The 4x4 zero matrix.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns row `index` as a vector.
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::from_vec3(v, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation about the X axis, in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Mat3::from_rotation_x(angle).to_mat4()
    }

    /// Creates a rotation about the Y axis, in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Mat3::from_rotation_y(angle).to_mat4()
    }

    /// Creates a rotation about the Z axis, in radians.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        Mat3::from_rotation_z(angle).to_mat4()
    }

    /// Creates a rotation about an arbitrary unit axis.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Mat3::from_axis_angle(axis, angle).to_mat4()
    }

    /// Creates the rotation matrix of a quaternion.
    ///
    /// Only the rotation block is filled in; the translation column is the
    /// caller's to set (see
    /// [`AffineTransform::from_rotation_translation`](super::affine_transform::AffineTransform::from_rotation_translation)).
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        Mat3::from_quat(q).to_mat4()
    }

    /// Creates a right-handed perspective projection with depth mapped to
    /// `[0, 1]`.
    ///
    /// # Arguments
    ///
    /// * `fov_y_radians`: vertical field of view.
    /// * `aspect_ratio`: viewport width over height.
    /// * `z_near` / `z_far`: clip plane distances; both positive with
    ///   `z_far > z_near`.
    pub fn perspective_rh_zo(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        debug_assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        let range = z_near - z_far;

        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z_far / range, -1.0),
            Vec4::new(0.0, 0.0, z_near * z_far / range, 0.0),
        )
    }

    /// Creates a right-handed orthographic projection with depth mapped to
    /// `[0, 1]`.
    pub fn orthographic_rh_zo(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = z_far - z_near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0 / fmn, 0.0),
            Vec4::new(
                -(right + left) / rml,
                -(top + bottom) / tmb,
                -z_near / fmn,
                1.0,
            ),
        )
    }

    /// Creates a right-handed view matrix looking from `eye` towards
    /// `target`.
    ///
    /// Returns `None` when `eye` and `target` coincide or `up` is parallel
    /// to the view direction, since no orientation can be derived then.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let f = (target - eye).try_normalize()?;
        let s = f.cross(up).try_normalize()?;
        let u = s.cross(f);

        Some(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2), self.row(3))
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f32 {
        let (s, c) = self.sub_determinants();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    // 2x2 sub-determinants of the top two rows (s) and bottom two rows (c);
    // shared by determinant and inverse.
    fn sub_determinants(&self) -> ([f32; 6], [f32; 6]) {
        let [c0, c1, c2, c3] = self.cols;
        let s = [
            c0.x * c1.y - c0.y * c1.x,
            c0.x * c2.y - c0.y * c2.x,
            c0.x * c3.y - c0.y * c3.x,
            c1.x * c2.y - c1.y * c2.x,
            c1.x * c3.y - c1.y * c3.x,
            c2.x * c3.y - c2.y * c3.x,
        ];
        let c = [
            c0.z * c1.w - c0.w * c1.z,
            c0.z * c2.w - c0.w * c2.z,
            c0.z * c3.w - c0.w * c3.z,
            c1.z * c2.w - c1.w * c2.z,
            c1.z * c3.w - c1.w * c3.z,
            c2.z * c3.w - c2.w * c3.z,
        ];
        (s, c)
    }

    /// Computes the inverse by the adjugate method, or `None` when the
    /// matrix is singular (determinant within epsilon of zero).
    pub fn inverse(&self) -> Option<Self> {
        let (s, c) = self.sub_determinants();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let [c0, c1, c2, c3] = self.cols;

        // Adjugate rows; transposing at the end flips them into columns.
        let r0 = Vec4::new(
            c1.y * c[5] - c2.y * c[4] + c3.y * c[3],
            -c1.x * c[5] + c2.x * c[4] - c3.x * c[3],
            c1.w * s[5] - c2.w * s[4] + c3.w * s[3],
            -c1.z * s[5] + c2.z * s[4] - c3.z * s[3],
        );
        let r1 = Vec4::new(
            -c0.y * c[5] + c2.y * c[2] - c3.y * c[1],
            c0.x * c[5] - c2.x * c[2] + c3.x * c[1],
            -c0.w * s[5] + c2.w * s[2] - c3.w * s[1],
            c0.z * s[5] - c2.z * s[2] + c3.z * s[1],
        );
        let r2 = Vec4::new(
            c0.y * c[4] - c1.y * c[2] + c3.y * c[0],
            -c0.x * c[4] + c1.x * c[2] - c3.x * c[0],
            c0.w * s[4] - c1.w * s[2] + c3.w * s[0],
            -c0.z * s[4] + c1.z * s[2] - c3.z * s[0],
        );
        let r3 = Vec4::new(
            -c0.y * c[3] + c1.y * c[1] - c2.y * c[0],
            c0.x * c[3] - c1.x * c[1] + c2.x * c[0],
            -c0.w * s[3] + c1.w * s[1] - c2.w * s[0],
            c0.z * s[3] - c1.z * s[1] + c2.z * s[0],
        );

        Some(Self::from_cols(r0, r1, r2, r3).transpose() * inv_det)
    }

    /// Computes the inverse of an affine matrix (bottom row `(0,0,0,1)`).
    ///
    /// Cheaper and numerically tighter than [`Mat4::inverse`]: the 3x3
    /// block is inverted directly and the translation re-derived from it.
    /// Returns `None` when the 3x3 block is singular.
    pub fn affine_inverse(&self) -> Option<Self> {
        let inv3 = Mat3::from_mat4(self).inverse()?;
        let t = self.cols[3].truncate();
        let inv_t = -(inv3 * t);

        Some(Self::from_cols(
            Vec4::from_vec3(inv3.cols[0], 0.0),
            Vec4::from_vec3(inv3.cols[1], 0.0),
            Vec4::from_vec3(inv3.cols[2], 0.0),
            Vec4::from_vec3(inv_t, 1.0),
        ))
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Matrix composition. Not commutative; `(a * b) * v == a * (b * v)`.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a vector: a linear combination of the columns.
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}

impl Add for Mat4 {
    type Output = Self;
    /// Component-wise sum.
    ///
    /// An arithmetic primitive for blending matrices element by element.
    /// Blending *rotations* this way does not preserve orthonormality; use
    /// quaternion interpolation for that.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_cols(
            self.cols[0] + rhs.cols[0],
            self.cols[1] + rhs.cols[1],
            self.cols[2] + rhs.cols[2],
            self.cols[3] + rhs.cols[3],
        )
    }
}

impl Sub for Mat4 {
    type Output = Self;
    /// Component-wise difference.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_cols(
            self.cols[0] - rhs.cols[0],
            self.cols[1] - rhs.cols[1],
            self.cols[2] - rhs.cols[2],
            self.cols[3] - rhs.cols[3],
        )
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;
    /// Scales every component.
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::from_cols(
            self.cols[0] * s,
            self.cols[1] * s,
            self.cols[2] * s,
            self.cols[3] * s,
        )
    }
}

impl Div<f32> for Mat4 {
    type Output = Self;
    /// Divides every component.
    #[inline]
    fn div(self, s: f32) -> Self {
        self * (1.0 / s)
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn index(&self, index: usize) -> &Vec4 {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vec4 {
        &mut self.cols[index]
    }
}
