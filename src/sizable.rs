// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The [`Sizable`] trait

use crate::element::{Element, SizingFlags};

/// Size-negotiation capability
///
/// Attached to anything a container may negotiate space with: plain
/// [`Element`]s and whole containers alike.
///
/// Minimum extents flow bottom-up: `minimum_width`/`minimum_height` return
/// the smallest extent at which the element can render without clipping, or
/// `None` when the element does not participate on that axis (its natural
/// size is authoritative) or no pass has published a value yet.
///
/// Preferred extents flow top-down: `set_preferred_width`/`set_preferred_height`
/// request a layout at the given extent; `None` clears the request, reverting
/// to natural size. Setting a preference on a resizable element may trigger
/// that element's own internal constraint, cascading recomputation.
pub trait Sizable {
    fn minimum_width(&self) -> Option<f64>;
    fn minimum_height(&self) -> Option<f64>;

    fn set_preferred_width(&self, width: Option<f64>);
    fn set_preferred_height(&self, height: Option<f64>);

    /// Capability query; no side effects
    fn is_width_resizable(&self) -> bool;
    /// Capability query; no side effects
    fn is_height_resizable(&self) -> bool;
}

impl Sizable for Element {
    fn minimum_width(&self) -> Option<f64> {
        if !self.is_width_resizable() {
            return None;
        }
        self.effective_minimum_size().map(|size| size.0)
    }

    fn minimum_height(&self) -> Option<f64> {
        if !self.is_height_resizable() {
            return None;
        }
        self.effective_minimum_size().map(|size| size.1)
    }

    fn set_preferred_width(&self, width: Option<f64>) {
        if self.is_width_resizable() {
            self.set_preferred_width_raw(width);
        }
    }

    fn set_preferred_height(&self, height: Option<f64>) {
        if self.is_height_resizable() {
            self.set_preferred_height_raw(height);
        }
    }

    fn is_width_resizable(&self) -> bool {
        self.sizing().contains(SizingFlags::WIDTH)
    }

    fn is_height_resizable(&self) -> bool {
        self.sizing().contains(SizingFlags::HEIGHT)
    }
}
