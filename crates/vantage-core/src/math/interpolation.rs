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

//! Orientation interpolation drivers: mode selection and keyframe tracks.
//!
//! [`Quaternion`] itself only knows how to blend *two* orientations. The
//! choice of algorithm and the bookkeeping for multi-keyframe animation
//! (sign alignment across the double cover, tangent precomputation,
//! segment lookup) live here, owned by the animation driver rather than
//! the quaternion type.

use super::Quaternion;

/// A pairwise orientation interpolator, passed around as a plain function
/// value.
pub type Interpolator = fn(Quaternion, Quaternion, f32) -> Quaternion;

/// Which algorithm an animation driver blends keyframes with.
///
/// Held by the caller, not by [`Quaternion`]; switching modes at runtime is
/// just swapping this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Normalized linear interpolation: cheapest, approximately constant
    /// angular velocity.
    Nlerp,
    /// Spherical linear interpolation: constant angular velocity, but
    /// piecewise — velocity jumps at keyframe boundaries.
    #[default]
    Slerp,
    /// Spherical cubic interpolation with precomputed tangents: smooth
    /// velocity across keyframe boundaries.
    Squad,
}

impl InterpolationMode {
    /// The pairwise interpolator backing this mode.
    ///
    /// Squad is built from slerp evaluations, so it reports slerp here;
    /// the cubic construction itself needs tangents and is driven by
    /// [`OrientationTrack::sample`].
    pub fn base_interpolator(self) -> Interpolator {
        match self {
            InterpolationMode::Nlerp => Quaternion::nlerp,
            InterpolationMode::Slerp | InterpolationMode::Squad => Quaternion::slerp,
        }
    }
}

/// A sequence of orientation keyframes with precomputed squad tangents.
///
/// On construction the keys are normalized and successive keys are brought
/// onto the same cover (a key is negated when its dot product with its
/// predecessor is negative), so every segment interpolates along the
/// shorter arc and the tangent estimates do not jump across the sphere.
#[derive(Debug, Clone, Default)]
pub struct OrientationTrack {
    keys: Vec<Quaternion>,
    tangents: Vec<Quaternion>,
}

impl OrientationTrack {
    /// Builds a track from orientation keyframes.
    ///
    /// Tangents are computed per key from its neighbors; the first and
    /// last key use themselves as the missing neighbor (clamped ends, the
    /// quaternion analogue of a clamped Catmull-Rom spline).
    pub fn new(keys: impl IntoIterator<Item = Quaternion>) -> Self {
        let mut aligned: Vec<Quaternion> = Vec::new();
        for q in keys {
            let mut q = q.normalize();
            if let Some(prev) = aligned.last() {
                if prev.dot(q) < 0.0 {
                    q = -q;
                }
            }
            aligned.push(q);
        }

        let n = aligned.len();
        let tangents = (0..n)
            .map(|i| {
                let prev = aligned[i.saturating_sub(1)];
                let next = aligned[(i + 1).min(n - 1)];
                aligned[i].tangent(prev, next)
            })
            .collect();

        Self {
            keys: aligned,
            tangents,
        }
    }

    /// The number of keyframes.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the track has no keyframes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The (normalized, sign-aligned) keyframe at `index`.
    #[inline]
    pub fn keyframe(&self, index: usize) -> Quaternion {
        self.keys[index]
    }

    /// Samples one segment at a local parameter.
    ///
    /// `segment` indexes the span between keyframes `segment` and
    /// `segment + 1`; `t` is clamped to `[0.0, 1.0]`.
    pub fn sample_segment(&self, segment: usize, t: f32, mode: InterpolationMode) -> Quaternion {
        let start = self.keys[segment];
        let end = self.keys[segment + 1];
        match mode {
            InterpolationMode::Nlerp => Quaternion::nlerp(start, end, t),
            InterpolationMode::Slerp => Quaternion::slerp(start, end, t),
            InterpolationMode::Squad => Quaternion::squad(
                start,
                end,
                self.tangents[segment],
                self.tangents[segment + 1],
                t,
                Quaternion::slerp,
            ),
        }
    }

    /// Samples the whole track at `t` in `[0.0, 1.0]`, mapped uniformly
    /// across the segments.
    ///
    /// An empty track yields the identity and a single-key track yields
    /// that key, so a driver can sample unconditionally.
    pub fn sample(&self, t: f32, mode: InterpolationMode) -> Quaternion {
        match self.keys.len() {
            0 => Quaternion::IDENTITY,
            1 => self.keys[0],
            n => {
                let segments = (n - 1) as f32;
                let scaled = t.clamp(0.0, 1.0) * segments;
                let segment = (scaled as usize).min(n - 2);
                self.sample_segment(segment, scaled - segment as f32, mode)
            }
        }
    }
}
