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

//! Foundational 3D math: vectors, quaternions, matrices, transforms.
//!
//! All angular quantities are in **radians** unless a function name says
//! otherwise. Types are plain `f32` value types with no interior state;
//! operations that can degrade numerically (normalizing a zero vector,
//! inverting a singular matrix) either return `Option` or fall back to a
//! documented neutral value rather than panicking.

// --- Fundamental Constants ---

/// Default tolerance for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

// Re-export the standard mathematical constants for convenience.
pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, SQRT_2, TAU};

/// Factor converting degrees to radians.
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// Factor converting radians to degrees.
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Sub-Modules ---

pub mod affine_transform;
pub mod color;
pub mod geometry;
pub mod interpolation;
pub mod matrix;
pub mod quaternion;
pub mod vector;

// --- Principal Type Re-Exports ---

pub use self::affine_transform::AffineTransform;
pub use self::color::Color;
pub use self::geometry::{Aabb, Plane};
pub use self::interpolation::{InterpolationMode, Interpolator, OrientationTrack};
pub use self::matrix::{Mat3, Mat4};
pub use self::quaternion::Quaternion;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Scalar Helpers ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use vantage_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use vantage_core::math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Clamps a value into `[min_val, max_val]`.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a value into `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// use vantage_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Approximate equality under a caller-supplied tolerance.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Approximate equality under the default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use vantage_core::math::approx_eq;
/// assert!(approx_eq(1.0, 1.0 + 1e-6));
/// assert!(!approx_eq(1.0, 1.001));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
