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

//! A linear-space RGBA color type.

use super::saturate;
use std::ops::{Add, Mul, Sub};

/// An RGBA color with linear-space `f32` components.
///
/// Components are not clamped on construction — values above `1.0` are
/// meaningful for HDR work — and `#[repr(C)]` keeps the layout suitable for
/// raw upload. Alpha is carried through arithmetic untouched by the color
/// math.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with explicit alpha.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque gray of the given intensity.
    #[inline]
    pub const fn gray(value: f32) -> Self {
        Self::rgb(value, value, value)
    }

    /// Creates a color from hue/saturation/value.
    ///
    /// Hue is in degrees and wraps modulo 360; saturation and value are
    /// clamped to `[0, 1]`. Alpha is 1.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturate(saturation);
        let v = saturate(value);

        let sector = h as u32 % 6;
        let f = h - h.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(r, g, b)
    }

    /// Converts to hue/saturation/value.
    ///
    /// Hue is in degrees in `[0, 360)` and is 0 for achromatic colors,
    /// where it is undefined.
    pub fn to_hsv(&self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };

        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        (hue, saturation, max)
    }

    /// Returns this color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Clamps every component to `[0, 1]`, e.g. before quantizing to
    /// 8-bit.
    pub fn saturate(&self) -> Self {
        Self {
            r: saturate(self.r),
            g: saturate(self.g),
            b: saturate(self.b),
            a: saturate(self.a),
        }
    }

    /// Linearly interpolates between two colors, alpha included.
    /// The interpolation factor `t` is clamped to the `[0.0, 1.0]` range.
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: start.r + (end.r - start.r) * t,
            g: start.g + (end.g - start.g) * t,
            b: start.b + (end.b - start.b) * t,
            a: start.a + (end.a - start.a) * t,
        }
    }

    /// The components as an array, in RGBA order.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    /// Opaque white.
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for Color {
    type Output = Self;
    /// Adds the color channels; alpha is taken from the left operand.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a,
        }
    }
}

impl Sub for Color {
    type Output = Self;
    /// Subtracts the color channels; alpha is taken from the left operand.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
            a: self.a,
        }
    }
}

impl Mul<f32> for Color {
    type Output = Self;
    /// Scales the color channels; alpha is unchanged.
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self {
            r: self.r * s,
            g: self.g * s,
            b: self.b * s,
            a: self.a,
        }
    }
}

impl Mul for Color {
    type Output = Self;
    /// Channel-wise modulation; alpha multiplies too.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
            a: self.a * rhs.a,
        }
    }
}
