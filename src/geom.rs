// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Geometry types
//!
//! All layout arithmetic uses the `f64` type: stroke compensation reserves
//! half a line width per side, which is not usefully integral.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

mod transform;
pub use transform::Affine;

/// 2D vector over `f64`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2(pub f64, pub f64);

impl Vec2 {
    /// Zero vector
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);

    /// Construct with equal components
    #[inline]
    pub const fn splat(value: f64) -> Self {
        Vec2(value, value)
    }

    /// True if both components are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.0 -= rhs.0;
        self.1 -= rhs.1;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2(self.0 * rhs, self.1 * rhs)
    }
}

impl From<Size> for Vec2 {
    #[inline]
    fn from(size: Size) -> Vec2 {
        Vec2(size.0, size.1)
    }
}

/// 2D extent (width, height) over `f64`
///
/// Extents are expected to be non-negative and finite; [`Size::is_valid`]
/// checks this.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size(pub f64, pub f64);

impl Size {
    /// Zero size
    pub const ZERO: Size = Size(0.0, 0.0);

    /// True if both extents are finite and non-negative
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.0 >= 0.0 && self.1 >= 0.0
    }

    /// Component-wise maximum
    #[inline]
    #[must_use = "method does not modify self but returns a new value"]
    pub fn max(self, rhs: Size) -> Size {
        Size(self.0.max(rhs.0), self.1.max(rhs.1))
    }
}

/// Axis-aligned rectangle: position of the top-left corner plus size
///
/// Grows to the right and downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Size,
}

impl Rect {
    /// The zero rect (all fields zero)
    pub const ZERO: Rect = Rect::new(Vec2::ZERO, Size::ZERO);

    /// Construct from a position and size
    #[inline]
    pub const fn new(pos: Vec2, size: Size) -> Self {
        Rect { pos, size }
    }

    /// True if the position is finite and the size is valid
    #[inline]
    pub fn is_valid(self) -> bool {
        self.pos.is_finite() && self.size.is_valid()
    }

    #[inline]
    pub fn left(self) -> f64 {
        self.pos.0
    }

    #[inline]
    pub fn right(self) -> f64 {
        self.pos.0 + self.size.0
    }

    #[inline]
    pub fn top(self) -> f64 {
        self.pos.1
    }

    #[inline]
    pub fn bottom(self) -> f64 {
        self.pos.1 + self.size.1
    }

    #[inline]
    pub fn center_x(self) -> f64 {
        self.pos.0 + 0.5 * self.size.0
    }

    #[inline]
    pub fn center_y(self) -> f64 {
        self.pos.1 + 0.5 * self.size.1
    }

    /// Shrink by `value` on all four sides
    #[inline]
    #[must_use = "method does not modify self but returns a new value"]
    pub fn shrink(self, value: f64) -> Rect {
        let size = Size(
            (self.size.0 - 2.0 * value).max(0.0),
            (self.size.1 - 2.0 * value).max(0.0),
        );
        Rect::new(self.pos + Vec2::splat(value), size)
    }
}
