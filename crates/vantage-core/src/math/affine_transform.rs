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

//! Homogeneous (affine) transforms: rotation, translation, and scale.

use crate::math::{approx_eq_eps, Mat3, Mat4, Quaternion, Vec3, Vec4, EPSILON};
use std::ops::{Add, Div, Mul, Sub};

/// A 3D affine transformation.
///
/// A semantic wrapper around a [`Mat4`] whose bottom row is the constant
/// `(0, 0, 0, 1)`: only the three basis columns and the translation column
/// carry information. Every constructor and operator on this type
/// maintains that invariant, which is what makes the cheap
/// [`rigid_inverse`](AffineTransform::rigid_inverse) and the block-wise
/// blending operators sound.
///
/// Basis columns of a *pose* are expected to be orthonormal by convention,
/// not by construction — scale factories deliberately break orthonormality,
/// and repeated composition of rotations erodes it. Callers who compose
/// long chains re-square the basis with
/// [`orthonormalize`](AffineTransform::orthonormalize).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct AffineTransform(pub Mat4);

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    // --- Factories ---

    /// Creates a pure translation.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self(Mat4::from_translation(v))
    }

    /// Creates a translation of `distance` along `direction`.
    ///
    /// The direction is normalized internally; a near-zero direction yields
    /// the identity.
    #[inline]
    pub fn from_direction_distance(direction: Vec3, distance: f32) -> Self {
        match direction.try_normalize() {
            Some(n) => Self::from_translation(n * distance),
            None => Self::IDENTITY,
        }
    }

    /// Creates a non-uniform scale.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self(Mat4::from_scale(scale))
    }

    /// Creates a rotation about the X axis, in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Self(Mat4::from_rotation_x(angle))
    }

    /// Creates a rotation about the Y axis, in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Self(Mat4::from_rotation_y(angle))
    }

    /// Creates a rotation about the Z axis, in radians.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        Self(Mat4::from_rotation_z(angle))
    }

    /// Creates a rotation about an arbitrary axis, in radians.
    ///
    /// The axis is normalized internally; a near-zero axis yields the
    /// identity.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        match axis.try_normalize() {
            Some(n) => Self(Mat4::from_axis_angle(n, angle)),
            None => Self::IDENTITY,
        }
    }

    /// Creates a rotation from a quaternion.
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        Self(Mat4::from_quat(q))
    }

    /// Creates a rotation-plus-translation pose.
    #[inline]
    pub fn from_rotation_translation(rotation: Quaternion, translation: Vec3) -> Self {
        let mut m = Mat4::from_quat(rotation);
        m.cols[3] = Vec4::from_vec3(translation, 1.0);
        Self(m)
    }

    /// Creates the orthogonal projection onto the plane through `point`
    /// with the given `normal`.
    ///
    /// The linear block is `I - n nᵀ`, which annihilates the normal axis;
    /// the translation restores the plane's offset from the origin. Points
    /// already on the plane are fixed, everything else lands on it along
    /// the normal. The result is singular by construction (rank 2), so it
    /// has no inverse. A near-zero normal yields the identity.
    pub fn from_plane_projection(normal: Vec3, point: Vec3) -> Self {
        let n = match normal.try_normalize() {
            Some(n) => n,
            None => return Self::IDENTITY,
        };

        let c0 = Vec3::X - n * n.x;
        let c1 = Vec3::Y - n * n.y;
        let c2 = Vec3::Z - n * n.z;
        let t = n * n.dot(point);

        Self(Mat4::from_cols(
            Vec4::from_vec3(c0, 0.0),
            Vec4::from_vec3(c1, 0.0),
            Vec4::from_vec3(c2, 0.0),
            Vec4::from_vec3(t, 1.0),
        ))
    }

    /// Creates a camera pose at `eye` looking towards `target`, or `None`
    /// for a degenerate basis (see [`Mat4::look_at_rh`]).
    ///
    /// Note this is the *pose*, not the view matrix: it places an object at
    /// the eye, oriented towards the target. The view matrix is its
    /// [`rigid_inverse`](AffineTransform::rigid_inverse).
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let view = Mat4::look_at_rh(eye, target, up)?;
        Some(Self(view).rigid_inverse())
    }

    // --- Accessors ---

    /// Returns the underlying matrix, e.g. for upload to a GPU pipeline.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        self.0
    }

    /// The translation column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.0.cols[3].truncate()
    }

    /// The transformed +X axis (first basis column).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.0.cols[0].truncate()
    }

    /// The transformed +Y axis (second basis column).
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.0.cols[1].truncate()
    }

    /// The transformed +Z axis (third basis column).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.0.cols[2].truncate()
    }

    /// Extracts the rotation as a quaternion.
    ///
    /// Assumes the basis carries no non-uniform scale; orthonormalize
    /// first when in doubt.
    #[inline]
    pub fn rotation(&self) -> Quaternion {
        Quaternion::from_rotation_matrix(&self.0)
    }

    // --- Operations ---

    /// Transforms a point (translation applies).
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (self.0 * Vec4::from_vec3(p, 1.0)).truncate()
    }

    /// Transforms a direction (translation does not apply).
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (self.0 * Vec4::from_vec3(v, 0.0)).truncate()
    }

    /// Computes the general affine inverse, handling scale.
    ///
    /// Returns `None` when the basis block is singular (e.g. a zero scale
    /// or a plane projection).
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.0.affine_inverse().map(Self)
    }

    /// Computes the closed-form inverse of a rigid transform.
    ///
    /// Transposes the rotation block and rebuilds the translation as the
    /// negated, inversely-rotated position. Assumes the basis columns are
    /// orthonormal — callers that have accumulated drift should call
    /// [`orthonormalize`](AffineTransform::orthonormalize) first; with
    /// scale or shear present the result is simply wrong, which is why the
    /// general [`inverse`](AffineTransform::inverse) also exists.
    pub fn rigid_inverse(&self) -> Self {
        let rt = Mat3::from_mat4(&self.0).transpose();
        let t = self.translation();
        let inv_t = -(rt * t);

        Self(Mat4::from_cols(
            Vec4::from_vec3(rt.cols[0], 0.0),
            Vec4::from_vec3(rt.cols[1], 0.0),
            Vec4::from_vec3(rt.cols[2], 0.0),
            Vec4::from_vec3(inv_t, 1.0),
        ))
    }

    /// Re-orthogonalizes the basis columns via Gram-Schmidt, leaving the
    /// translation untouched. Idempotent within epsilon.
    pub fn orthonormalize(&self) -> Self {
        let basis = Mat3::from_mat4(&self.0).orthonormalize();
        Self(Mat4::from_cols(
            Vec4::from_vec3(basis.cols[0], 0.0),
            Vec4::from_vec3(basis.cols[1], 0.0),
            Vec4::from_vec3(basis.cols[2], 0.0),
            self.0.cols[3],
        ))
    }

    /// Compares all stored components within [`EPSILON`].
    ///
    /// Composition chains never reproduce a matrix bit-exactly, so
    /// `m * m.inverse() == IDENTITY` style checks go through this.
    pub fn approx_eq(&self, rhs: &Self) -> bool {
        (0..4).all(|i| {
            approx_eq_eps(self.0.cols[i].x, rhs.0.cols[i].x, EPSILON)
                && approx_eq_eps(self.0.cols[i].y, rhs.0.cols[i].y, EPSILON)
                && approx_eq_eps(self.0.cols[i].z, rhs.0.cols[i].z, EPSILON)
        })
    }
}

impl Default for AffineTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for AffineTransform {
    type Output = Self;
    /// Composition; the right-hand transform applies first.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Mul<Vec3> for AffineTransform {
    type Output = Vec3;
    /// Transforms a point.
    #[inline]
    fn mul(self, p: Vec3) -> Vec3 {
        self.transform_point(p)
    }
}

impl Add for AffineTransform {
    type Output = Self;
    /// Block-wise sum of the stored columns; the bottom row stays
    /// `(0,0,0,1)`.
    ///
    /// A blending primitive (e.g. averaging two poses element by element) —
    /// *not* a rotation interpolator, since summed bases lose
    /// orthonormality.
    fn add(self, rhs: Self) -> Self {
        let mut cols = [Vec4::ZERO; 4];
        for i in 0..4 {
            let sum = self.0.cols[i].truncate() + rhs.0.cols[i].truncate();
            cols[i] = Vec4::from_vec3(sum, if i == 3 { 1.0 } else { 0.0 });
        }
        Self(Mat4::from_cols(cols[0], cols[1], cols[2], cols[3]))
    }
}

impl Sub for AffineTransform {
    type Output = Self;
    /// Block-wise difference of the stored columns; the bottom row stays
    /// `(0,0,0,1)`.
    fn sub(self, rhs: Self) -> Self {
        let mut cols = [Vec4::ZERO; 4];
        for i in 0..4 {
            let diff = self.0.cols[i].truncate() - rhs.0.cols[i].truncate();
            cols[i] = Vec4::from_vec3(diff, if i == 3 { 1.0 } else { 0.0 });
        }
        Self(Mat4::from_cols(cols[0], cols[1], cols[2], cols[3]))
    }
}

impl Mul<f32> for AffineTransform {
    type Output = Self;
    /// Scales the stored columns; the bottom row stays `(0,0,0,1)`.
    fn mul(self, s: f32) -> Self {
        let mut cols = [Vec4::ZERO; 4];
        for i in 0..4 {
            let scaled = self.0.cols[i].truncate() * s;
            cols[i] = Vec4::from_vec3(scaled, if i == 3 { 1.0 } else { 0.0 });
        }
        Self(Mat4::from_cols(cols[0], cols[1], cols[2], cols[3]))
    }
}

impl Div<f32> for AffineTransform {
    type Output = Self;
    /// Divides the stored columns; the bottom row stays `(0,0,0,1)`.
    #[inline]
    fn div(self, s: f32) -> Self {
        self * (1.0 / s)
    }
}

impl From<AffineTransform> for Mat4 {
    #[inline]
    fn from(t: AffineTransform) -> Mat4 {
        t.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2, PI};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn random_rigid(rng: &mut StdRng) -> AffineTransform {
        let rotation = Quaternion::random(rng);
        let translation = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        AffineTransform::from_rotation_translation(rotation, translation)
    }

    #[test]
    fn test_identity_and_accessors() {
        let t = AffineTransform::IDENTITY;
        assert_eq!(t.translation(), Vec3::ZERO);
        assert_eq!(t.right(), Vec3::X);
        assert_eq!(t.up(), Vec3::Y);
        assert_eq!(t.forward(), Vec3::Z);

        let moved = AffineTransform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        // Directions ignore translation.
        assert_eq!(moved.transform_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_from_direction_distance() {
        let t = AffineTransform::from_direction_distance(Vec3::new(0.0, 3.0, 0.0), 2.0);
        assert!(vec3_approx_eq(t.translation(), Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(
            AffineTransform::from_direction_distance(Vec3::ZERO, 5.0).to_matrix(),
            Mat4::IDENTITY
        );
    }

    #[test]
    fn test_rotation_accessor_round_trip() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, -1.0).normalize(), 0.8);
        let pose = AffineTransform::from_rotation_translation(q, Vec3::new(4.0, 5.0, 6.0));
        let q_back = pose.rotation();
        assert_relative_eq!(q.dot(q_back).abs(), 1.0, epsilon = 1e-4);
        assert_eq!(pose.translation(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_rigid_inverse_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..16 {
            let m = random_rigid(&mut rng);
            let inv = m.rigid_inverse();
            assert!((m * inv).approx_eq(&AffineTransform::IDENTITY));
            assert!((inv * m).approx_eq(&AffineTransform::IDENTITY));
            assert!(inv.rigid_inverse().approx_eq(&m));
        }
    }

    #[test]
    fn test_rigid_inverse_matches_general_inverse() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..16 {
            let m = random_rigid(&mut rng);
            let general = m.inverse().expect("rigid transforms are invertible");
            assert!(m.rigid_inverse().approx_eq(&general));
        }
    }

    #[test]
    fn test_general_inverse_handles_scale() {
        let m = AffineTransform::from_translation(Vec3::new(1.0, -2.0, 0.5))
            * AffineTransform::from_rotation_y(0.4)
            * AffineTransform::from_scale(Vec3::new(2.0, 3.0, 0.5));
        let inv = m.inverse().expect("invertible");
        assert!((m * inv).approx_eq(&AffineTransform::IDENTITY));

        // Zero scale kills a basis column.
        let flat = AffineTransform::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(flat.inverse().is_none());
    }

    #[test]
    fn test_orthonormalize() {
        // Drifted pose: slightly scaled and sheared basis.
        let pose = AffineTransform::from_rotation_translation(
            Quaternion::from_axis_angle(Vec3::Y, 1.0),
            Vec3::new(3.0, 0.0, -1.0),
        );
        let mut drifted = pose.to_matrix();
        drifted.cols[0] = drifted.cols[0] * 1.05;
        drifted.cols[1] = drifted.cols[1] + drifted.cols[0] * 0.02;
        let drifted = AffineTransform(drifted);

        let fixed = drifted.orthonormalize();
        assert!(approx_eq(fixed.right().length(), 1.0));
        assert!(approx_eq(fixed.up().length(), 1.0));
        assert!(approx_eq(fixed.forward().length(), 1.0));
        assert!(approx_eq(fixed.right().dot(fixed.up()), 0.0));
        assert!(approx_eq(fixed.up().dot(fixed.forward()), 0.0));
        // Translation is untouched.
        assert_eq!(fixed.translation(), drifted.translation());

        // Idempotent, and a no-op on clean input.
        assert!(fixed.orthonormalize().approx_eq(&fixed));
        assert!(pose.orthonormalize().approx_eq(&pose));
    }

    #[test]
    fn test_orthonormalize_then_rigid_inverse() {
        // The documented recovery path for drifted poses.
        let pose = AffineTransform::from_rotation_translation(
            Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.7),
            Vec3::new(-2.0, 4.0, 1.0),
        );
        let mut drifted = pose.to_matrix();
        drifted.cols[2] = drifted.cols[2] * 1.01;
        let recovered = AffineTransform(drifted).orthonormalize();
        assert!((recovered * recovered.rigid_inverse()).approx_eq(&AffineTransform::IDENTITY));
    }

    #[test]
    fn test_plane_projection() {
        // Project onto the xy plane through the origin: z is eliminated.
        let proj = AffineTransform::from_plane_projection(Vec3::Z, Vec3::ZERO);
        let p = proj.transform_point(Vec3::new(3.0, -2.0, 7.0));
        assert!(vec3_approx_eq(p, Vec3::new(3.0, -2.0, 0.0)));
        // The normal column is zeroed out.
        assert!(vec3_approx_eq(proj.forward(), Vec3::ZERO));

        // Offset plane z = 2.
        let proj = AffineTransform::from_plane_projection(Vec3::Z, Vec3::new(0.0, 0.0, 2.0));
        let p = proj.transform_point(Vec3::new(1.0, 1.0, -5.0));
        assert!(vec3_approx_eq(p, Vec3::new(1.0, 1.0, 2.0)));
        // Points on the plane are fixed.
        let on_plane = Vec3::new(-4.0, 9.0, 2.0);
        assert!(vec3_approx_eq(proj.transform_point(on_plane), on_plane));

        // Singular by construction.
        assert!(proj.inverse().is_none());

        // Tilted plane: the projected point lands on the plane.
        let n = Vec3::new(1.0, 1.0, 1.0).normalize();
        let anchor = Vec3::new(1.0, 0.0, 0.0);
        let proj = AffineTransform::from_plane_projection(n, anchor);
        let q = proj.transform_point(Vec3::new(5.0, -3.0, 2.0));
        assert_relative_eq!(n.dot(q), n.dot(anchor), epsilon = 1e-4);
    }

    #[test]
    fn test_looking_at_pose() {
        let eye = Vec3::new(0.0, 0.0, 8.0);
        let pose = AffineTransform::looking_at(eye, Vec3::ZERO, Vec3::Y).expect("valid basis");
        assert!(vec3_approx_eq(pose.translation(), eye));
        // Right-handed camera pose: forward column is +Z towards the eye,
        // so the camera looks down its local -Z at the target.
        assert!(vec3_approx_eq(pose.forward(), Vec3::Z));

        assert!(AffineTransform::looking_at(eye, eye, Vec3::Y).is_none());
    }

    #[test]
    fn test_pose_blending_ops() {
        let a = AffineTransform::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let b = AffineTransform::from_translation(Vec3::new(6.0, 2.0, 0.0));

        let mid = (a + b) * 0.5;
        // The affine bottom row survives the arithmetic.
        assert_eq!(mid.0.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(vec3_approx_eq(mid.translation(), Vec3::new(4.0, 1.0, 0.0)));
        assert!(((a + b) / 2.0).approx_eq(&mid));

        let diff = b - a;
        assert_eq!(diff.0.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(vec3_approx_eq(diff.translation(), Vec3::new(4.0, 2.0, 0.0)));
        // The basis difference of two identical rotations is zero.
        assert!(vec3_approx_eq(diff.right(), Vec3::ZERO));
    }

    #[test]
    fn test_composition_against_points() {
        let t = AffineTransform::from_translation(Vec3::X);
        let r = AffineTransform::from_rotation_z(FRAC_PI_2);
        let p = Vec3::new(1.0, 0.0, 0.0);

        assert!(vec3_approx_eq((r * t) * p, Vec3::new(0.0, 2.0, 0.0)));
        assert!(vec3_approx_eq((t * r) * p, Vec3::new(1.0, 1.0, 0.0)));

        // Full turn composes back to the start.
        let quarter = AffineTransform::from_rotation_z(PI / 2.0);
        let full = quarter * quarter * quarter * quarter;
        assert!(full.approx_eq(&AffineTransform::IDENTITY));
    }
}
