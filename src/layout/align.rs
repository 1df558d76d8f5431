// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Alignment types

/// Horizontal alignment of content or a title within an available span
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    /// Offset of the left edge of `extent` placed within `[start, end]`
    ///
    /// `extent` larger than the span overflows toward the right (`Left`),
    /// both sides (`Center`) or the left (`Right`).
    pub fn position(self, start: f64, end: f64, extent: f64) -> f64 {
        match self {
            Align::Left => start,
            Align::Center => start + 0.5 * (end - start - extent),
            Align::Right => end - extent,
        }
    }
}

/// Vertical alignment within an available span
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AlignV {
    Top,
    #[default]
    Center,
    Bottom,
}

impl AlignV {
    /// Offset of the top edge of `extent` placed within `[start, end]`
    pub fn position(self, start: f64, end: f64, extent: f64) -> f64 {
        match self {
            AlignV::Top => start,
            AlignV::Center => start + 0.5 * (end - start - extent),
            AlignV::Bottom => end - extent,
        }
    }
}
