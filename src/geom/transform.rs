// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Affine transformation
//!
//! Box layout never rotates or skews, so a transform is a uniform scale
//! followed by a translation.

use super::Vec2;

/// Uniform scale plus translation
///
/// A transform `t` maps a point `p` via `t.apply(p) == p * scale + offset`.
/// Transforms may be combined with [`Affine::then`]:
/// `a.then(b).apply(p) == b.apply(a.apply(p))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    scale: f64,
    offset: Vec2,
}

impl Affine {
    /// The identity transform
    pub const IDENTITY: Affine = Affine {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    /// Construct from a scale and an offset
    ///
    /// Required: `scale` is finite and positive (asserted in debug builds).
    #[inline]
    pub fn new(scale: f64, offset: Vec2) -> Self {
        debug_assert!(scale.is_finite() && scale > 0.0);
        Affine { scale, offset }
    }

    /// Construct a pure translation
    #[inline]
    pub fn translate(offset: Vec2) -> Self {
        Affine { scale: 1.0, offset }
    }

    /// Construct a pure scaling transform
    #[inline]
    pub fn scale(scale: f64) -> Self {
        Affine::new(scale, Vec2::ZERO)
    }

    /// Apply to a point
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    /// Apply the inverse to a point
    #[inline]
    pub fn apply_inv(self, p: Vec2) -> Vec2 {
        Vec2((p.0 - self.offset.0) / self.scale, (p.1 - self.offset.1) / self.scale)
    }

    /// Apply to an x coordinate
    #[inline]
    pub fn apply_x(self, x: f64) -> f64 {
        x * self.scale + self.offset.0
    }

    /// Apply to a y coordinate
    #[inline]
    pub fn apply_y(self, y: f64) -> f64 {
        y * self.scale + self.offset.1
    }

    /// Apply the inverse to an x coordinate
    #[inline]
    pub fn apply_inv_x(self, x: f64) -> f64 {
        (x - self.offset.0) / self.scale
    }

    /// Apply the inverse to a y coordinate
    #[inline]
    pub fn apply_inv_y(self, y: f64) -> f64 {
        (y - self.offset.1) / self.scale
    }

    /// Apply to a length (translation-free)
    #[inline]
    pub fn apply_len(self, len: f64) -> f64 {
        len * self.scale
    }

    /// Apply the inverse to a length (translation-free)
    #[inline]
    pub fn apply_inv_len(self, len: f64) -> f64 {
        len / self.scale
    }

    /// Combine: `self` first, `rhs` second
    #[inline]
    #[must_use = "method does not modify self but returns a new value"]
    pub fn then(self, rhs: Affine) -> Affine {
        Affine {
            scale: self.scale * rhs.scale,
            offset: self.offset * rhs.scale + rhs.offset,
        }
    }
}

impl Default for Affine {
    #[inline]
    fn default() -> Self {
        Affine::IDENTITY
    }
}
