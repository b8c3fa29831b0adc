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

//! # Vantage Core
//!
//! 3D orientation mathematics and camera-culling geometry: vectors,
//! quaternions (with nlerp/slerp/squad interpolation), homogeneous
//! transforms, colors, and frustum visibility tests driven by a camera's
//! projection and pose.

#![warn(missing_docs)]

pub mod camera;
pub mod math;

pub use camera::{Camera, Frustum, Viewport};
