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

//! Quaternion algebra and the interpolation routines built on it.
//!
//! Orientations are represented as unit quaternions. The type itself does
//! not enforce unit length; every operation that *produces* an orientation
//! (axis-angle construction, nlerp, slerp, squad, random sampling)
//! re-normalizes its result to counteract floating-point drift.
//!
//! A quaternion `q` and its negation `-q` encode the same rotation (the
//! double cover). All interpolators here resolve that ambiguity towards the
//! shorter arc by negating one operand when the pair's dot product is
//! negative.

use serde::{Deserialize, Serialize};

use super::{Mat4, Vec3, EPSILON};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

/// A rotation in 3D space.
///
/// Stored as `(x, y, z, w)` where `[x, y, z]` is the vector part and `w` the
/// scalar part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a quaternion from raw components.
    ///
    /// No normalization is performed; for orientations prefer
    /// [`Quaternion::from_axis_angle`].
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates the rotation of `angle_radians` about `axis`.
    ///
    /// The axis is normalized internally; a near-zero axis has no defined
    /// rotation plane and yields the identity.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        match axis.try_normalize() {
            Some(n) => {
                let (s, c) = (angle_radians * 0.5).sin_cos();
                Self {
                    x: n.x * s,
                    y: n.y * s,
                    z: n.z * s,
                    w: c,
                }
            }
            None => Self::IDENTITY,
        }
    }

    /// Extracts the rotation of the upper 3x3 block of a matrix.
    ///
    /// Branches on the largest diagonal term to keep the divisor well away
    /// from zero, then re-normalizes.
    pub fn from_rotation_matrix(m: &Mat4) -> Self {
        let m00 = m.cols[0].x;
        let m10 = m.cols[0].y;
        let m20 = m.cols[0].z;
        let m01 = m.cols[1].x;
        let m11 = m.cols[1].y;
        let m21 = m.cols[1].z;
        let m02 = m.cols[2].x;
        let m12 = m.cols[2].y;
        let m22 = m.cols[2].z;

        let trace = m00 + m11 + m22;
        let mut q = Self::IDENTITY;

        if trace > 0.0 {
            let s = 2.0 * (trace + 1.0).sqrt();
            q.w = 0.25 * s;
            q.x = (m21 - m12) / s;
            q.y = (m02 - m20) / s;
            q.z = (m10 - m01) / s;
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            q.w = (m21 - m12) / s;
            q.x = 0.25 * s;
            q.y = (m01 + m10) / s;
            q.z = (m02 + m20) / s;
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            q.w = (m02 - m20) / s;
            q.x = (m01 + m10) / s;
            q.y = 0.25 * s;
            q.z = (m12 + m21) / s;
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            q.w = (m10 - m01) / s;
            q.x = (m02 + m20) / s;
            q.y = (m12 + m21) / s;
            q.z = 0.25 * s;
        }
        q.normalize()
    }

    /// Samples a uniformly distributed orientation.
    ///
    /// Uses the subgroup algorithm (Shoemake): three uniform variates map to
    /// a point on the unit 3-sphere with uniform Haar measure.
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        use std::f32::consts::TAU;

        let u1: f32 = rng.gen();
        let u2: f32 = rng.gen();
        let u3: f32 = rng.gen();

        let r1 = (1.0 - u1).sqrt();
        let r2 = u1.sqrt();
        let (s2, c2) = (TAU * u2).sin_cos();
        let (s3, c3) = (TAU * u3).sin_cos();

        Self {
            x: r1 * s2,
            y: r1 * c2,
            z: r2 * s3,
            w: r2 * c3,
        }
    }

    /// Calculates the squared magnitude.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the magnitude.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    /// Returns a unit-magnitude copy of this quaternion.
    ///
    /// A near-zero quaternion has no direction on the 4-sphere; it yields
    /// the identity instead of dividing by zero.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            *self * (1.0 / mag_sq.sqrt())
        } else {
            Self::IDENTITY
        }
    }

    /// Returns the conjugate (negated vector part).
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Returns the multiplicative inverse.
    ///
    /// For a unit quaternion this equals the conjugate; otherwise the
    /// conjugate is divided by the squared magnitude. A near-zero input
    /// yields the identity.
    #[inline]
    pub fn inverse(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            self.conjugate() * (1.0 / mag_sq)
        } else {
            Self::IDENTITY
        }
    }

    /// Returns the rotation angle to another orientation, in radians.
    ///
    /// Double-cover aware: `q` and `-q` are at angle zero from each other.
    pub fn angle_to(&self, rhs: Self) -> f32 {
        let d = self.normalize().dot(rhs.normalize()).abs().min(1.0);
        2.0 * d.acos()
    }

    /// Rotates a vector by this quaternion.
    ///
    /// Expanded form of the `q v q⁻¹` sandwich product; assumes `self` is a
    /// unit quaternion.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Normalized linear interpolation between two orientations.
    ///
    /// Interpolates each component linearly, then re-normalizes onto the
    /// unit sphere. Cheaper than [`Quaternion::slerp`] and monotonic, but
    /// the angular velocity is only approximately constant. Takes the
    /// shorter of the two arcs; `t` is clamped to `[0.0, 1.0]`.
    pub fn nlerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let end = if start.dot(end) < 0.0 { -end } else { end };
        Self {
            x: start.x + (end.x - start.x) * t,
            y: start.y + (end.y - start.y) * t,
            z: start.z + (end.z - start.z) * t,
            w: start.w + (end.w - start.w) * t,
        }
        .normalize()
    }

    /// Spherical linear interpolation between two orientations.
    ///
    /// Constant angular velocity along the shorter great arc; `t` is
    /// clamped to `[0.0, 1.0]`. When the operands are nearly parallel the
    /// `1/sin(theta)` weights lose precision, so the interpolation falls
    /// back to [`Quaternion::nlerp`], which is indistinguishable at such
    /// small angles.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut cos_theta = start.dot(end);
        let mut end = end;

        // More than 90 degrees apart on the 4-sphere: the other cover of
        // the target is closer.
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end = -end;
        }

        if cos_theta > 1.0 - EPSILON {
            return Self::nlerp(start, end, t);
        }

        let theta = cos_theta.acos();
        let inv_sin = 1.0 / theta.sin();
        let scale_start = ((1.0 - t) * theta).sin() * inv_sin;
        let scale_end = (t * theta).sin() * inv_sin;
        ((start * scale_start) + (end * scale_end)).normalize()
    }

    /// Logarithm of a unit quaternion.
    ///
    /// Maps `(cos a, v sin a)` to the pure quaternion `(0, v a)`. Built on
    /// `atan2`, which stays stable for small rotation angles.
    pub fn ln(&self) -> Self {
        let v = Vec3::new(self.x, self.y, self.z);
        let v_len = v.length();
        if v_len < EPSILON {
            // No discernible axis; the angle is 0 or the quaternion is a
            // pure scalar. ln is the zero quaternion either way.
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let angle = v_len.atan2(self.w);
        let scale = angle / v_len;
        Self::new(v.x * scale, v.y * scale, v.z * scale, 0.0)
    }

    /// Exponential of a pure quaternion.
    ///
    /// Maps `(0, v a)` with `|v| = 1` back to the unit quaternion
    /// `(cos a, v sin a)`; the inverse of [`Quaternion::ln`].
    pub fn exp(&self) -> Self {
        let v = Vec3::new(self.x, self.y, self.z);
        let angle = v.length();
        if angle < EPSILON {
            return Self::IDENTITY;
        }
        let (s, c) = angle.sin_cos();
        let scale = s / angle;
        Self::new(v.x * scale, v.y * scale, v.z * scale, c)
    }

    /// Estimates the inner tangent at a keyframe from its neighbors.
    ///
    /// Shoemake's construction: the log-space average of the displacements
    /// to `prev` and `next`, negated, quartered, and mapped back through
    /// `exp`. Feeding these tangents to [`Quaternion::squad`] yields a
    /// C1-continuous orientation curve across keyframe boundaries, the
    /// quaternion analogue of Catmull-Rom tangents.
    pub fn tangent(&self, prev: Self, next: Self) -> Self {
        // Work on the same cover as `self`, otherwise the log terms jump
        // across the sphere.
        let prev = if self.dot(prev) < 0.0 { -prev } else { prev };
        let next = if self.dot(next) < 0.0 { -next } else { next };

        let inv = self.inverse();
        let sum = (inv * prev).ln() + (inv * next).ln();
        (*self * (sum * -0.25).exp()).normalize()
    }

    /// Spherical cubic interpolation across one keyframe segment.
    ///
    /// `base` is the interpolator used for the three inner evaluations
    /// (normally [`Quaternion::slerp`]). Two base interpolations run at
    /// `t` — along the segment and along the tangent curve — and a final
    /// one blends them at `2t(1-t)`, which vanishes at both endpoints so
    /// the curve passes exactly through `start` and `end`.
    pub fn squad(
        start: Self,
        end: Self,
        tan_start: Self,
        tan_end: Self,
        t: f32,
        base: fn(Self, Self, f32) -> Self,
    ) -> Self {
        let t = t.clamp(0.0, 1.0);
        let main = base(start, end, t);
        let across = base(tan_start, tan_end, t);
        base(main, across, 2.0 * t * (1.0 - t)).normalize()
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Hamilton product. Composing rotations this way applies the
    /// right-hand operand first; multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a vector by this quaternion.
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.normalize().rotate_vec3(rhs)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Component-wise sum. An algebra primitive, not a rotation operation.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Self;
    /// Component-wise difference.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w - rhs.w,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components.
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components; the result encodes the same rotation.
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, PI};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quat_rotation_eq(a: Quaternion, b: Quaternion) -> bool {
        // Same rotation up to double cover.
        approx::relative_eq!(a.dot(b).abs(), 1.0, epsilon = EPSILON * 10.0)
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        crate::math::approx_eq(a.x, b.x)
            && crate::math::approx_eq(a.y, b.y)
            && crate::math::approx_eq(a.z, b.z)
    }

    #[test]
    fn test_identity_default() {
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
        assert_relative_eq!(Quaternion::IDENTITY.magnitude(), 1.0, epsilon = EPSILON);
        let q = Quaternion::from_axis_angle(Vec3::Y, 1.0);
        assert!(quat_rotation_eq(q * Quaternion::IDENTITY, q));
        assert!(quat_rotation_eq(Quaternion::IDENTITY * q, q));
    }

    #[test]
    fn test_from_axis_angle() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let half = FRAC_PI_2 * 0.5;
        assert_relative_eq!(q.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(q.y, half.sin(), epsilon = EPSILON);
        assert_relative_eq!(q.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(q.w, half.cos(), epsilon = EPSILON);

        // Axis is normalized internally.
        let q_scaled = Quaternion::from_axis_angle(Vec3::new(0.0, 7.0, 0.0), FRAC_PI_2);
        assert!(quat_rotation_eq(q, q_scaled));

        // A degenerate axis has no rotation plane.
        assert_eq!(
            Quaternion::from_axis_angle(Vec3::ZERO, 1.0),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_normalize_and_degenerate() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0).normalize();
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_conjugate_inverse() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 0.75);
        let conj = q.conjugate();
        let inv = q.inverse();
        // Unit quaternion: inverse equals conjugate.
        assert_relative_eq!(conj.x, inv.x, epsilon = EPSILON);
        assert_relative_eq!(conj.y, inv.y, epsilon = EPSILON);
        assert_relative_eq!(conj.z, inv.z, epsilon = EPSILON);
        assert_relative_eq!(conj.w, inv.w, epsilon = EPSILON);

        let product = q * inv;
        assert!(quat_rotation_eq(product, Quaternion::IDENTITY));
        assert_relative_eq!(product.w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_composition_order() {
        // rhs first: (rot_x * rot_y) applied to v equals rot_x applied to
        // (rot_y applied to v).
        let rot_y = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let rot_x = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
        let composed = rot_x * rot_y;

        let v = Vec3::Z;
        let stepwise = rot_x * (rot_y * v);
        let direct = composed * v;
        assert!(vec3_approx_eq(stepwise, direct));
        assert!(vec3_approx_eq(stepwise, Vec3::X));
    }

    #[test]
    fn test_rotate_vec3() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(vec3_approx_eq(q * Vec3::X, Vec3::new(0.0, 0.0, -1.0)));
        assert!(vec3_approx_eq(q.rotate_vec3(Vec3::X), q * Vec3::X));

        // Rotation preserves magnitude.
        let v = Vec3::new(2.0, -3.0, 0.5);
        assert_relative_eq!((q * v).length(), v.length(), epsilon = EPSILON);
    }

    #[test]
    fn test_angle_to() {
        let a = Quaternion::from_axis_angle(Vec3::Z, 0.0);
        let b = Quaternion::from_axis_angle(Vec3::Z, 1.0);
        assert_relative_eq!(a.angle_to(b), 1.0, epsilon = 1e-4);
        // Double cover: -b is the same orientation.
        assert_relative_eq!(a.angle_to(-b), 1.0, epsilon = 1e-4);
        assert_relative_eq!(b.angle_to(b), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_nlerp_endpoints_and_unit_invariant() {
        let a = Quaternion::from_axis_angle(Vec3::X, 0.3);
        let b = Quaternion::from_axis_angle(Vec3::Y, 1.2);

        assert!(quat_rotation_eq(Quaternion::nlerp(a, b, 0.0), a));
        assert!(quat_rotation_eq(Quaternion::nlerp(a, b, 1.0), b));
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert_relative_eq!(
                Quaternion::nlerp(a, b, t).magnitude(),
                1.0,
                epsilon = EPSILON
            );
            assert_relative_eq!(
                Quaternion::slerp(a, b, t).magnitude(),
                1.0,
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn test_slerp_identity_interpolation() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.9);
        for i in 0..=4 {
            let t = i as f32 / 4.0;
            assert!(quat_rotation_eq(Quaternion::slerp(q, q, t), q));
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert!(quat_rotation_eq(Quaternion::slerp(a, b, 0.0), a));
        assert!(quat_rotation_eq(Quaternion::slerp(a, b, 1.0), b));
        // Out-of-range t clamps to the endpoints.
        assert!(quat_rotation_eq(Quaternion::slerp(a, b, -0.5), a));
        assert!(quat_rotation_eq(Quaternion::slerp(a, b, 1.5), b));
    }

    #[test]
    fn test_slerp_halfway_about_y() {
        // Identity to 90 degrees about Y; the midpoint must be the
        // 45-degree rotation, i.e. (cos 22.5, 0, sin 22.5, 0) scalar-first.
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let mid = Quaternion::slerp(a, b, 0.5);

        let angle = 22.5f32.to_radians();
        assert_relative_eq!(mid.w, angle.cos(), epsilon = 1e-5);
        assert_relative_eq!(mid.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(mid.y, angle.sin(), epsilon = 1e-5);
        assert_relative_eq!(mid.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_shortest_path_sign_correction() {
        // Operands on opposite covers: dot < 0 exercises the negation
        // branch, and the result must match interpolating against -b.
        let a = Quaternion::from_axis_angle(Vec3::Y, (-30.0f32).to_radians());
        let b = Quaternion::from_axis_angle(Vec3::Y, 170.0f32.to_radians());
        assert!(a.dot(b) < 0.0);

        let mid = Quaternion::slerp(a, b, 0.5);
        let mid_flipped = Quaternion::slerp(a, -b, 0.5);

        let v = Vec3::X;
        assert!(vec3_approx_eq(mid * v, mid_flipped * v));

        // And the same for nlerp.
        let nmid = Quaternion::nlerp(a, b, 0.5);
        let nmid_flipped = Quaternion::nlerp(a, -b, 0.5);
        assert!(vec3_approx_eq(nmid * v, nmid_flipped * v));

        // The shortest arc from -30 to 170 runs backwards through -110.
        let expected = Quaternion::from_axis_angle(Vec3::Y, (-110.0f32).to_radians());
        assert!(quat_rotation_eq(mid, expected));
    }

    #[test]
    fn test_slerp_near_parallel_fallback() {
        let a = Quaternion::from_axis_angle(Vec3::Y, 1e-5);
        let b = Quaternion::from_axis_angle(Vec3::Y, 3e-5);
        let mid = Quaternion::slerp(a, b, 0.5);
        assert_relative_eq!(mid.magnitude(), 1.0, epsilon = EPSILON * 10.0);
        assert!(quat_rotation_eq(
            mid,
            Quaternion::from_axis_angle(Vec3::Y, 2e-5)
        ));
    }

    #[test]
    fn test_ln_exp_round_trip() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.2, -1.0, 0.4).normalize(), 1.3);
        let back = q.ln().exp();
        assert!(quat_rotation_eq(q, back));
        assert_relative_eq!(back.x, q.x, epsilon = 1e-4);
        assert_relative_eq!(back.w, q.w, epsilon = 1e-4);

        // ln of identity is zero, exp of zero is identity.
        let zero = Quaternion::IDENTITY.ln();
        assert_relative_eq!(zero.magnitude(), 0.0, epsilon = EPSILON);
        assert_eq!(zero.exp(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_tangent_collinear_keys() {
        // Keyframes evenly spaced about one axis: the inner tangent must
        // stay on the same great arc (still a rotation about Y).
        let prev = Quaternion::from_axis_angle(Vec3::Y, 0.2);
        let q = Quaternion::from_axis_angle(Vec3::Y, 0.6);
        let next = Quaternion::from_axis_angle(Vec3::Y, 1.0);

        let tan = q.tangent(prev, next);
        assert_relative_eq!(tan.magnitude(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(tan.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(tan.z, 0.0, epsilon = 1e-4);
        // Evenly spaced keys pull the tangent onto the key itself.
        assert!(quat_rotation_eq(tan, q));
    }

    #[test]
    fn test_squad_endpoints() {
        let mut rng = StdRng::seed_from_u64(7);
        let q: Vec<Quaternion> = (0..4).map(|_| Quaternion::random(&mut rng)).collect();
        let t1 = q[1].tangent(q[0], q[2]);
        let t2 = q[2].tangent(q[1], q[3]);

        let at0 = Quaternion::squad(q[1], q[2], t1, t2, 0.0, Quaternion::slerp);
        let at1 = Quaternion::squad(q[1], q[2], t1, t2, 1.0, Quaternion::slerp);
        assert!(quat_rotation_eq(at0, q[1]));
        assert!(quat_rotation_eq(at1, q[2]));

        // Interior samples stay unit length.
        for i in 1..10 {
            let s = Quaternion::squad(q[1], q[2], t1, t2, i as f32 / 10.0, Quaternion::slerp);
            assert_relative_eq!(s.magnitude(), 1.0, epsilon = EPSILON * 10.0);
        }
    }

    #[test]
    fn test_random_orientations_are_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..64 {
            let q = Quaternion::random(&mut rng);
            assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_quat_matrix_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let v = Vec3::new(0.3, -1.7, 2.2);
        for _ in 0..32 {
            let q = Quaternion::random(&mut rng);
            let m = Mat4::from_quat(q);
            let via_matrix = (m * crate::math::Vec4::from_vec3(v, 1.0)).truncate();
            let direct = q * v;
            assert_relative_eq!(via_matrix.x, direct.x, epsilon = 1e-4);
            assert_relative_eq!(via_matrix.y, direct.y, epsilon = 1e-4);
            assert_relative_eq!(via_matrix.z, direct.z, epsilon = 1e-4);

            let q_back = Quaternion::from_rotation_matrix(&m);
            assert!(quat_rotation_eq(q, q_back));
        }
    }

    #[test]
    fn test_full_turn_is_identity_rotation() {
        let q = Quaternion::from_axis_angle(Vec3::Z, PI) * Quaternion::from_axis_angle(Vec3::Z, PI);
        // A full turn lands on -identity: the other cover of no rotation.
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec3_approx_eq(q * v, v));
    }
}
