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

//! Camera state and frustum visibility queries.
//!
//! A [`Camera`] owns a world-space pose, a projection matrix, and a screen
//! viewport, plus two lazily refreshed caches derived from them: the
//! world-to-view matrix (from the pose) and the clipping [`Frustum`] (from
//! the projection). Each cache has its own dirty flag, set by the
//! corresponding mutators and cleared on the next query, so a frame that
//! mutates nothing pays for no recomputation and a frame that mutates the
//! projection recomputes the planes exactly once.
//!
//! There is no process-wide "current" camera; rendering code receives the
//! camera it should use as an explicit argument.
//!
//! Not thread-safe: queries take `&mut self` because they may refresh the
//! caches. The intended use is a single-threaded render loop that mutates
//! the camera and then issues its visibility queries.

use crate::math::geometry::{Aabb, Plane};
use crate::math::{AffineTransform, Mat4, Vec3, Vec4};

// --- Viewport ---

/// A screen-space viewport rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal origin of the lower-left corner.
    pub x: i32,
    /// Vertical origin of the lower-left corner.
    pub y: i32,
    /// Width in pixels, at least 1.
    pub width: u32,
    /// Height in pixels, at least 1.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport, clamping the origin to be non-negative and the
    /// extent to at least one pixel so the aspect ratio is always defined.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x: x.max(0),
            y: y.max(0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width over height.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    /// A 1x1 viewport at the origin.
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

// --- Frustum ---

/// The visible volume of a projection, as six inward-facing planes.
///
/// Plane order is left, right, bottom, top, near, far. A point is inside
/// when its signed distance to every plane is non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Derives the six planes from a projection matrix.
    ///
    /// Row combinations of the matrix (Gribb-Hartmann), for the
    /// right-handed `[0, 1]`-depth convention of
    /// [`Mat4::perspective_rh_zo`]: the side planes are `row3 ± row0` and
    /// `row3 ± row1`; the near plane is `row2` alone (clip-space depth
    /// starts at zero) and the far plane `row3 - row2`. Each plane is
    /// normalized so signed distances are in view-space units.
    ///
    /// A degenerate projection yields degenerate planes; no validation is
    /// performed.
    pub fn from_projection(projection: &Mat4) -> Self {
        let r0 = projection.row(0);
        let r1 = projection.row(1);
        let r2 = projection.row(2);
        let r3 = projection.row(3);

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// The six planes, in left, right, bottom, top, near, far order.
    #[inline]
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Whether a view-space point lies inside the frustum.
    ///
    /// Tests the signed distance against each plane and bails out at the
    /// first one the point is behind: outside on any single plane means
    /// outside the volume.
    pub fn contains_point(&self, view_point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(view_point) >= 0.0)
    }

    /// Whether any corner of a view-space box lies inside the frustum.
    ///
    /// A deliberately cheap pre-test for culling: it reports `true` as soon
    /// as one of the eight corners is individually visible. A box that
    /// straddles the frustum with every corner outside is reported as not
    /// visible (a false negative), and a box is reported visible even when
    /// only a corner of it is. Callers trade that imprecision for eight
    /// point tests per box.
    pub fn contains_aabb(&self, view_box: &Aabb) -> bool {
        view_box
            .corners()
            .iter()
            .any(|&corner| self.contains_point(corner))
    }
}

// --- Camera ---

/// A camera: pose, projection, viewport, and cached derived state.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: AffineTransform,
    projection: Mat4,
    viewport: Viewport,

    // Derived caches, each guarded by its own dirty flag.
    view: AffineTransform,
    frustum: Frustum,
    view_dirty: bool,
    frustum_dirty: bool,
}

impl Camera {
    /// Creates a camera at the world origin looking down -Z with an
    /// identity projection.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport,
            view: AffineTransform::IDENTITY,
            frustum: Frustum::from_projection(&Mat4::IDENTITY),
            view_dirty: false,
            frustum_dirty: false,
        }
    }

    // --- Projection ---

    /// Sets the projection matrix and marks the frustum stale.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.frustum_dirty = true;
    }

    /// The current projection matrix.
    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Sets a perspective projection derived from the viewport's aspect
    /// ratio.
    ///
    /// After a viewport resize, call this again to pick up the new aspect
    /// ratio.
    pub fn set_perspective(&mut self, fov_y_radians: f32, z_near: f32, z_far: f32) {
        self.set_projection(Mat4::perspective_rh_zo(
            fov_y_radians,
            self.viewport.aspect_ratio(),
            z_near,
            z_far,
        ));
    }

    /// Sets an orthographic projection.
    pub fn set_orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) {
        self.set_projection(Mat4::orthographic_rh_zo(
            left, right, bottom, top, z_near, z_far,
        ));
    }

    // --- Pose ---

    /// Sets the world-space pose and marks the view cache stale.
    ///
    /// The basis is assumed orthonormal (the camera inverts it as a rigid
    /// transform); pass drifted poses through
    /// [`AffineTransform::orthonormalize`] first.
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
        self.view_dirty = true;
    }

    /// The world-space pose.
    #[inline]
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// Moves the camera to `position`, keeping its orientation.
    pub fn set_position(&mut self, position: Vec3) {
        let mut m = self.transform.to_matrix();
        m.cols[3] = Vec4::from_vec3(position, 1.0);
        self.set_transform(AffineTransform(m));
    }

    /// The world-space position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.translation()
    }

    /// Places the camera at `eye` looking towards `target`.
    ///
    /// Returns `false` and leaves the camera unchanged when no orientation
    /// can be derived (`eye == target`, or `up` parallel to the view
    /// direction).
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> bool {
        match AffineTransform::looking_at(eye, target, up) {
            Some(pose) => {
                self.set_transform(pose);
                true
            }
            None => false,
        }
    }

    /// Translates the camera in world space.
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position() + delta);
    }

    /// Rotates the camera in place about a world-space axis through its
    /// own position.
    pub fn rotate(&mut self, axis: Vec3, angle_radians: f32) {
        let rotation = AffineTransform::from_axis_angle(axis, angle_radians);
        let position = self.position();
        let mut m = (rotation * self.transform).to_matrix();
        m.cols[3] = Vec4::from_vec3(position, 1.0);
        self.set_transform(AffineTransform(m));
    }

    // --- Viewport ---

    /// Sets the viewport rectangle.
    ///
    /// The projection is left as-is; callers reacting to a resize follow up
    /// with [`Camera::set_perspective`] to refresh the aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The viewport rectangle.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // --- Queries ---

    /// The frustum for the current projection, recomputed if stale.
    pub fn frustum(&mut self) -> &Frustum {
        self.refresh_frustum();
        &self.frustum
    }

    /// The world-to-view matrix for the current pose, recomputed if stale.
    pub fn view_matrix(&mut self) -> Mat4 {
        self.refresh_view();
        self.view.to_matrix()
    }

    /// Whether a world-space point is inside the view frustum.
    pub fn contains_point(&mut self, world_point: Vec3) -> bool {
        self.refresh_view();
        self.refresh_frustum();
        self.frustum
            .contains_point(self.view.transform_point(world_point))
    }

    /// Whether a world-space box is (approximately) visible.
    ///
    /// Each corner is brought into view space and tested individually; see
    /// [`Frustum::contains_aabb`] for the accuracy trade-off.
    pub fn contains_aabb(&mut self, world_box: &Aabb) -> bool {
        self.refresh_view();
        self.refresh_frustum();
        world_box
            .corners()
            .iter()
            .any(|&corner| self.frustum.contains_point(self.view.transform_point(corner)))
    }

    fn refresh_frustum(&mut self) {
        if self.frustum_dirty {
            log::trace!("camera: projection changed, re-deriving frustum planes");
            self.frustum = Frustum::from_projection(&self.projection);
            self.frustum_dirty = false;
        }
    }

    fn refresh_view(&mut self) {
        if self.view_dirty {
            log::trace!("camera: pose changed, re-deriving view matrix");
            self.view = self.transform.rigid_inverse();
            self.view_dirty = false;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
