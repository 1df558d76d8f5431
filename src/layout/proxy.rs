// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Per-pass element access

use crate::element::Element;
use crate::geom::Affine;
use crate::Sizable;

/// Scoped handle for reading and writing an element's box model
///
/// A proxy expresses all coordinates in the owning constraint's frame,
/// translating through a transform into the element's parent frame. This is
/// how a constraint positions a shared content node it does not own: writes
/// go through the frame-relative interface, never the element's absolute
/// fields directly.
///
/// The transform is a snapshot taken at construction. If the transform
/// between the two frames changes mid-pass the proxy's view is stale and
/// must not be reused; each pass creates fresh proxies.
///
/// A proxy must be disposed before the pass ends. Access through a disposed
/// proxy is a programming error: fatal in debug builds, a zero-read or
/// no-op write in release builds.
pub struct LayoutProxy {
    element: Element,
    transform: Affine,
    disposed: bool,
}

impl LayoutProxy {
    /// Construct for one element
    ///
    /// `transform` maps the constraint's frame to the element's parent frame.
    pub fn new(element: &Element, transform: Affine) -> Self {
        LayoutProxy {
            element: element.clone(),
            transform,
            disposed: false,
        }
    }

    /// Release the proxy; further access is an error
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn live(&self) -> bool {
        debug_assert!(!self.disposed, "LayoutProxy used after dispose");
        !self.disposed
    }

    fn edges(&self) -> Option<(f64, f64, f64, f64)> {
        if !self.live() {
            return None;
        }
        let rect = self.element.rect()?;
        let t = self.transform;
        Some((
            t.apply_inv_x(rect.left()),
            t.apply_inv_x(rect.right()),
            t.apply_inv_y(rect.top()),
            t.apply_inv_y(rect.bottom()),
        ))
    }

    /// Effective width in the constraint's frame; zero while unmeasured
    pub fn width(&self) -> f64 {
        self.edges().map(|(l, r, _, _)| r - l).unwrap_or(0.0)
    }

    /// Effective height in the constraint's frame; zero while unmeasured
    pub fn height(&self) -> f64 {
        self.edges().map(|(_, _, t, b)| b - t).unwrap_or(0.0)
    }

    pub fn left(&self) -> f64 {
        self.edges().map(|(l, ..)| l).unwrap_or(0.0)
    }

    pub fn right(&self) -> f64 {
        self.edges().map(|(_, r, ..)| r).unwrap_or(0.0)
    }

    pub fn top(&self) -> f64 {
        self.edges().map(|(_, _, t, _)| t).unwrap_or(0.0)
    }

    pub fn bottom(&self) -> f64 {
        self.edges().map(|(.., b)| b).unwrap_or(0.0)
    }

    pub fn center_x(&self) -> f64 {
        self.edges().map(|(l, r, ..)| 0.5 * (l + r)).unwrap_or(0.0)
    }

    pub fn center_y(&self) -> f64 {
        self.edges().map(|(_, _, t, b)| 0.5 * (t + b)).unwrap_or(0.0)
    }

    /// Position the left edge at `x` (constraint frame)
    pub fn set_left(&mut self, x: f64) {
        if self.live() {
            self.element.set_origin_x(self.transform.apply_x(x));
        }
    }

    /// Position the right edge at `x` (constraint frame)
    pub fn set_right(&mut self, x: f64) {
        if self.live() {
            let x = x - self.width();
            self.element.set_origin_x(self.transform.apply_x(x));
        }
    }

    /// Position the top edge at `y` (constraint frame)
    pub fn set_top(&mut self, y: f64) {
        if self.live() {
            self.element.set_origin_y(self.transform.apply_y(y));
        }
    }

    /// Position the bottom edge at `y` (constraint frame)
    pub fn set_bottom(&mut self, y: f64) {
        if self.live() {
            let y = y - self.height();
            self.element.set_origin_y(self.transform.apply_y(y));
        }
    }

    /// Center horizontally on `x` (constraint frame)
    pub fn set_center_x(&mut self, x: f64) {
        if self.live() {
            let x = x - 0.5 * self.width();
            self.element.set_origin_x(self.transform.apply_x(x));
        }
    }

    /// Center vertically on `y` (constraint frame)
    pub fn set_center_y(&mut self, y: f64) {
        if self.live() {
            let y = y - 0.5 * self.height();
            self.element.set_origin_y(self.transform.apply_y(y));
        }
    }

    /// Published minimum width in the constraint's frame
    pub fn minimum_width(&self) -> Option<f64> {
        if !self.live() {
            return None;
        }
        self.element
            .minimum_width()
            .map(|w| self.transform.apply_inv_len(w))
    }

    /// Published minimum height in the constraint's frame
    pub fn minimum_height(&self) -> Option<f64> {
        if !self.live() {
            return None;
        }
        self.element
            .minimum_height()
            .map(|h| self.transform.apply_inv_len(h))
    }

    /// Minimum width falling back to the natural width for elements that do
    /// not participate in width negotiation; `None` while unmeasured
    pub fn effective_minimum_width(&self) -> Option<f64> {
        if !self.live() {
            return None;
        }
        self.element
            .effective_minimum_size()
            .map(|size| self.transform.apply_inv_len(size.0))
    }

    /// As [`Self::effective_minimum_width`], for height
    pub fn effective_minimum_height(&self) -> Option<f64> {
        if !self.live() {
            return None;
        }
        self.element
            .effective_minimum_size()
            .map(|size| self.transform.apply_inv_len(size.1))
    }

    /// Request a preferred width (constraint frame)
    ///
    /// A no-op if the element is not width-resizable.
    pub fn set_preferred_width(&mut self, width: Option<f64>) {
        if self.live() {
            self.element
                .set_preferred_width(width.map(|w| self.transform.apply_len(w)));
        }
    }

    /// Request a preferred height (constraint frame)
    ///
    /// A no-op if the element is not height-resizable.
    pub fn set_preferred_height(&mut self, height: Option<f64>) {
        if self.live() {
            self.element
                .set_preferred_height(height.map(|h| self.transform.apply_len(h)));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::SizingFlags;
    use crate::geom::{Rect, Size, Vec2};

    #[test]
    fn identity_edges() {
        let element = Element::new();
        element.set_natural_bounds(Some(Rect::new(Vec2(3.0, 4.0), Size(10.0, 20.0))));
        let proxy = LayoutProxy::new(&element, Affine::IDENTITY);
        assert_eq!(proxy.left(), 3.0);
        assert_eq!(proxy.right(), 13.0);
        assert_eq!(proxy.top(), 4.0);
        assert_eq!(proxy.bottom(), 24.0);
        assert_eq!(proxy.center_x(), 8.0);
    }

    #[test]
    fn translated_writes() {
        let element = Element::new().with_natural_size(10.0, 10.0);
        // constraint frame origin sits at (100, 50) in the element's parent
        let mut proxy = LayoutProxy::new(&element, Affine::translate(Vec2(100.0, 50.0)));
        proxy.set_left(5.0);
        proxy.set_top(7.0);
        assert_eq!(element.origin(), Some(Vec2(105.0, 57.0)));
        assert_eq!(proxy.left(), 5.0);
        proxy.set_center_x(20.0);
        assert_eq!(proxy.center_x(), 20.0);
        proxy.dispose();
    }

    #[test]
    fn scaled_lengths() {
        let element = Element::new()
            .with_natural_size(10.0, 10.0)
            .with_sizing(SizingFlags::WIDTH);
        let mut proxy = LayoutProxy::new(&element, Affine::scale(2.0));
        assert_eq!(proxy.width(), 5.0);
        proxy.set_preferred_width(Some(8.0));
        assert_eq!(element.preferred_width(), Some(16.0));
        assert_eq!(proxy.width(), 8.0);
        proxy.dispose();
    }

    #[test]
    fn non_resizable_write_is_noop() {
        let element = Element::new().with_natural_size(10.0, 10.0);
        let mut proxy = LayoutProxy::new(&element, Affine::IDENTITY);
        proxy.set_preferred_width(Some(99.0));
        assert_eq!(element.preferred_width(), None);
        proxy.dispose();
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn disposed_reads_zero() {
        let element = Element::new().with_natural_size(10.0, 10.0);
        let mut proxy = LayoutProxy::new(&element, Affine::IDENTITY);
        proxy.dispose();
        assert_eq!(proxy.width(), 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "used after dispose")]
    fn disposed_access_panics_in_debug() {
        let element = Element::new().with_natural_size(10.0, 10.0);
        let mut proxy = LayoutProxy::new(&element, Affine::IDENTITY);
        proxy.dispose();
        let _ = proxy.width();
    }
}
