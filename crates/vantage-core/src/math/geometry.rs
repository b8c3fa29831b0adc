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

//! Geometric primitives used for culling: oriented planes and axis-aligned
//! bounding boxes.

use super::{Mat4, Vec3, Vec4, EPSILON};

// --- Plane ---

/// An oriented plane `normal · p + distance = 0`.
///
/// Points with a non-negative [`signed_distance`](Plane::signed_distance)
/// lie on the side the normal faces. Frustum planes are stored facing
/// inward, so "non-negative on all six" means "inside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane.
    pub normal: Vec3,
    /// Signed distance term; the plane contains the points where
    /// `normal · p == -distance`.
    pub distance: f32,
}

impl Plane {
    /// Creates a plane from a unit normal and distance term.
    #[inline]
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Creates the plane through `point` with the given facing.
    ///
    /// The normal is normalized internally.
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize();
        Self {
            normal: n,
            distance: -n.dot(point),
        }
    }

    /// Creates a plane from raw coefficients `(a, b, c, d)` representing
    /// `ax + by + cz + d = 0`, rescaling so the normal is unit length.
    ///
    /// Degenerate coefficients (a near-zero normal, as produced by a
    /// degenerate projection matrix) pass through unnormalized; the
    /// resulting plane classifies everything as outside or everything as
    /// inside, which is the documented garbage-in/garbage-out contract for
    /// frustum extraction.
    pub fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len > EPSILON {
            Self {
                normal: normal / len,
                distance: v.w / len,
            }
        } else {
            Self {
                normal,
                distance: v.w,
            }
        }
    }

    /// Signed distance from the point to the plane; positive on the side
    /// the normal faces.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

// --- Aabb ---

/// An axis-aligned bounding box, stored as its minimum and maximum corners.
///
/// The cheap broad-phase volume handed to visibility culling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner with the smallest coordinate on every axis.
    pub min: Vec3,
    /// The corner with the largest coordinate on every axis.
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (`min` at +infinity, `max` at -infinity), the neutral
    /// element of [`merge`](Aabb::merge).
    pub const INVALID: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates a box from two opposite corners, in either order.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box from its center and half-extents (made non-negative).
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let he = half_extents.abs();
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Creates the tightest box enclosing `points`, or `None` for an empty
    /// slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let mut min = first;
        let mut max = first;
        for &p in rest {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    /// The center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the size of the box on each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The full size of the box on each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `min <= max` on every axis; degenerate zero-volume boxes
    /// count as valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Whether the point lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// The smallest box enclosing both operands.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The eight corner vertices.
    ///
    /// Order: all min/max combinations, x varying fastest.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The box enclosing this box after an affine transformation.
    ///
    /// Transforms the center once and re-derives the extents from the
    /// absolute values of the rotation block, which is cheaper than
    /// transforming all eight corners. Not tight under perspective.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let center = (*matrix * Vec4::from_vec3(self.center(), 1.0)).truncate();
        let he = self.half_extents();

        let abs_x = matrix.cols[0].truncate().abs();
        let abs_y = matrix.cols[1].truncate().abs();
        let abs_z = matrix.cols[2].truncate().abs();
        let new_he = abs_x * he.x + abs_y * he.y + abs_z * he.z;

        Self::from_center_half_extents(center, new_he)
    }
}

impl Default for Aabb {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, PI};

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    // --- Plane ---

    #[test]
    fn test_plane_signed_distance() {
        // The xy plane facing +z.
        let plane = Plane::new(Vec3::Z, 0.0);
        assert!(approx_eq(plane.signed_distance(Vec3::new(1.0, 2.0, 3.0)), 3.0));
        assert!(approx_eq(plane.signed_distance(Vec3::new(1.0, 2.0, -3.0)), -3.0));
        assert!(approx_eq(plane.signed_distance(Vec3::X), 0.0));
    }

    #[test]
    fn test_plane_from_point_normal() {
        // Plane z = 5 facing +z.
        let plane = Plane::from_point_normal(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 9.0));
        assert!(vec3_approx_eq(plane.normal, Vec3::Z));
        assert!(approx_eq(plane.distance, -5.0));
        assert!(approx_eq(plane.signed_distance(Vec3::new(7.0, -2.0, 5.0)), 0.0));
        assert!(plane.signed_distance(Vec3::new(0.0, 0.0, 6.0)) > 0.0);
    }

    #[test]
    fn test_plane_from_coefficients_normalizes() {
        // 2x + 0y + 0z - 4 = 0, i.e. the plane x = 2 facing +x.
        let plane = Plane::from_coefficients(Vec4::new(2.0, 0.0, 0.0, -4.0));
        assert!(vec3_approx_eq(plane.normal, Vec3::X));
        assert!(approx_eq(plane.distance, -2.0));
        assert!(approx_eq(plane.signed_distance(Vec3::new(3.0, 0.0, 0.0)), 1.0));

        // Degenerate coefficients pass through.
        let degenerate = Plane::from_coefficients(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(degenerate.normal, Vec3::ZERO);
        assert_eq!(degenerate.distance, 1.0);
    }

    // --- Aabb ---

    #[test]
    fn test_aabb_constructors() {
        let a = Aabb::from_min_max(Vec3::new(4.0, 5.0, 6.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.max, Vec3::new(4.0, 5.0, 6.0));

        let b = Aabb::from_center_half_extents(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(b.min, Vec3::new(9.0, -2.0, -3.0));
        assert_eq!(b.max, Vec3::new(11.0, 2.0, 3.0));

        assert!(Aabb::from_points(&[]).is_none());
        let c = Aabb::from_points(&[
            Vec3::new(1.0, 5.0, -1.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(4.0, 8.0, 0.0),
        ])
        .unwrap();
        assert_eq!(c.min, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(c.max, Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn test_aabb_measures() {
        let a = Aabb::from_min_max(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(3.0, 2.0, 5.0));
        assert!(vec3_approx_eq(a.center(), Vec3::new(1.0, 1.0, 3.0)));
        assert!(vec3_approx_eq(a.size(), Vec3::new(4.0, 2.0, 4.0)));
        assert!(vec3_approx_eq(a.half_extents(), Vec3::new(2.0, 1.0, 2.0)));
        assert!(a.is_valid());
        assert!(!Aabb::INVALID.is_valid());
    }

    #[test]
    fn test_aabb_contains_point() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        assert!(a.contains_point(Vec3::splat(0.5)));
        assert!(a.contains_point(Vec3::ZERO));
        assert!(a.contains_point(Vec3::ONE));
        assert!(!a.contains_point(Vec3::new(1.1, 0.5, 0.5)));
        assert!(!a.contains_point(Vec3::new(0.5, -0.1, 0.5)));
    }

    #[test]
    fn test_aabb_merge() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_min_max(Vec3::splat(0.5), Vec3::splat(1.5));
        let merged = a.merge(&b);
        assert_eq!(merged.min, Vec3::ZERO);
        assert_eq!(merged.max, Vec3::splat(1.5));

        // INVALID is the neutral element.
        let via_invalid = Aabb::INVALID.merge(&a);
        assert_eq!(via_invalid, a);
    }

    #[test]
    fn test_aabb_corners() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let corners = a.corners();
        assert_eq!(corners.len(), 8);
        // All corners are on the box boundary, and min/max are among them.
        assert!(corners.iter().all(|&c| a.contains_point(c)));
        assert!(corners.contains(&a.min));
        assert!(corners.contains(&a.max));
        // All eight are distinct for a non-degenerate box.
        for i in 0..8 {
            for j in (i + 1)..8 {
                assert_ne!(corners[i], corners[j]);
            }
        }
    }

    #[test]
    fn test_aabb_transform() {
        let unit = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));

        let translated = unit.transform(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert!(vec3_approx_eq(translated.min, Vec3::new(9.0, -1.0, -1.0)));
        assert!(vec3_approx_eq(translated.max, Vec3::new(11.0, 1.0, 1.0)));

        // A 45 degree turn widens x/z to sqrt(2).
        let rotated = unit.transform(&Mat4::from_rotation_y(PI / 4.0));
        let s = 2.0f32.sqrt();
        assert!(approx_eq(rotated.min.x, -s));
        assert!(approx_eq(rotated.max.x, s));
        assert!(approx_eq(rotated.min.y, -1.0));
        assert!(approx_eq(rotated.max.z, s));

        let scaled = unit.transform(&Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5)));
        assert!(vec3_approx_eq(scaled.min, Vec3::new(-2.0, -1.0, -0.5)));
        assert!(vec3_approx_eq(scaled.max, Vec3::new(2.0, 1.0, 0.5)));
    }
}
