// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Bordered single-content panel

use log::{trace, warn};
use thiserror::Error;

use super::{Align, AlignV, LayoutConstraint, LayoutProxy, LayoutStrategy};
use crate::element::{Element, SizingFlags};
use crate::geom::{Affine, Rect, Size, Vec2};
use crate::Sizable;

/// Invalid container configuration
///
/// Detected eagerly when options are set. Fatal in debug builds; in release
/// builds the offending field reverts to its default (best-effort, logged).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} does not support {value}")]
    UnsupportedAlign {
        name: &'static str,
        value: &'static str,
    },
}

/// Panel configuration
///
/// Defaults: 8.0 margins, no minimum floor, corner radius 5.0, a 1.0-wide
/// stroke, centered content, automatic resize enabled. Per-instance
/// overrides use struct update syntax:
///
/// ```
/// # use boxlayout::layout::{Align, PanelOptions};
/// let options = PanelOptions {
///     x_margin: 12.0,
///     align: Align::Left,
///     ..Default::default()
/// };
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelOptions {
    /// Horizontal margin between content and the background edge; must be
    /// positive
    pub x_margin: f64,
    /// Vertical margin; must be positive
    pub y_margin: f64,
    /// Minimum width floor applied before stroke compensation
    pub min_width: f64,
    /// Minimum height floor applied before stroke compensation
    pub min_height: f64,
    /// Background corner radius; non-negative
    pub corner_radius: f64,
    /// Border line width; `None` draws no border and reserves no space for
    /// one. Toggling this changes the panel's minimum size.
    pub stroke: Option<f64>,
    /// Horizontal content alignment
    pub align: Align,
    /// Vertical content alignment
    pub y_align: AlignV,
    /// Maps to the constraint's enabled flag: `false` freezes geometry
    pub resize: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        PanelOptions {
            x_margin: 8.0,
            y_margin: 8.0,
            min_width: 0.0,
            min_height: 0.0,
            corner_radius: 5.0,
            stroke: Some(1.0),
            align: Align::Center,
            y_align: AlignV::Center,
            resize: true,
        }
    }
}

impl PanelOptions {
    /// Check all fields
    pub fn validate(&self) -> Result<(), OptionsError> {
        require_positive("x_margin", self.x_margin)?;
        require_positive("y_margin", self.y_margin)?;
        require_non_negative("min_width", self.min_width)?;
        require_non_negative("min_height", self.min_height)?;
        require_non_negative("corner_radius", self.corner_radius)?;
        if let Some(width) = self.stroke {
            require_positive("stroke", width)?;
        }
        Ok(())
    }

    /// Validate, reverting invalid fields to defaults in release builds
    fn sanitize(mut self) -> Self {
        if let Err(error) = self.validate() {
            debug_assert!(false, "PanelOptions: {error}");
            warn!(target: "boxlayout", "PanelOptions: {error}; reverting to defaults");
            let defaults = PanelOptions::default();
            if self.x_margin <= 0.0 {
                self.x_margin = defaults.x_margin;
            }
            if self.y_margin <= 0.0 {
                self.y_margin = defaults.y_margin;
            }
            if self.min_width < 0.0 {
                self.min_width = defaults.min_width;
            }
            if self.min_height < 0.0 {
                self.min_height = defaults.min_height;
            }
            if self.corner_radius < 0.0 {
                self.corner_radius = defaults.corner_radius;
            }
            if self.stroke.is_some_and(|w| w <= 0.0) {
                self.stroke = defaults.stroke;
            }
        }
        self
    }

    /// Total space reserved for the stroke: half the line width per side
    fn stroke_compensation(&self) -> f64 {
        self.stroke.unwrap_or(0.0)
    }
}

pub(super) fn require_positive(name: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OptionsError::NonPositive { name, value })
    }
}

pub(super) fn require_non_negative(name: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OptionsError::Negative { name, value })
    }
}

struct PanelStrategy {
    node: Element,
    background: Element,
    content: Element,
    options: PanelOptions,
}

impl PanelStrategy {
    /// The "no valid content yet" terminal state: hide the background,
    /// clear minimums. Re-entered automatically once content is valid.
    fn bail_out(&self) {
        self.background.set_visible(false);
        self.node.set_natural_bounds(None);
        self.node.set_minimum_size(None, None);
    }
}

impl LayoutStrategy for PanelStrategy {
    fn recompute(&mut self) {
        let o = &self.options;
        let comp = o.stroke_compensation();
        let half = 0.5 * comp;

        let mut content = LayoutProxy::new(&self.content, Affine::IDENTITY);
        let (content_min_w, content_min_h) = match (
            content.effective_minimum_width(),
            content.effective_minimum_height(),
        ) {
            (Some(w), Some(h)) if self.content.is_visible() => (w, h),
            _ => {
                content.dispose();
                self.bail_out();
                return;
            }
        };

        // Read phase: the panel's own minimum, bottom-up.
        let min_w = o.min_width.max(content_min_w + 2.0 * o.x_margin) + comp;
        let min_h = o.min_height.max(content_min_h + 2.0 * o.y_margin) + comp;

        // Resolve preferred size against the external request, if any.
        let request_w = self.node.preferred_width();
        let request_h = self.node.preferred_height();
        let pref_w = min_w.max(request_w.unwrap_or(0.0));
        let pref_h = min_h.max(request_h.unwrap_or(0.0));

        // Write phase. Content gets a preferred size only when the panel
        // itself has one: without an external request, forcing a preference
        // would needlessly collapse content to its minimum.
        if request_w.is_some() {
            content.set_preferred_width(Some(pref_w - 2.0 * o.x_margin - comp));
        }
        if request_h.is_some() {
            content.set_preferred_height(Some(pref_h - 2.0 * o.y_margin - comp));
        }

        // Background: stroke centered on its edge, so the rect is inset by
        // half the line width from the panel bounds.
        self.background.set_natural_bounds(Some(Rect::new(
            Vec2::splat(half),
            Size(pref_w - comp, pref_h - comp),
        )));
        self.background.set_visible(true);

        match o.align {
            Align::Center => content.set_center_x(0.5 * pref_w),
            Align::Left => content.set_left(half + o.x_margin),
            Align::Right => content.set_right(pref_w - half - o.x_margin),
        }
        match o.y_align {
            AlignV::Center => content.set_center_y(0.5 * pref_h),
            AlignV::Top => content.set_top(half + o.y_margin),
            AlignV::Bottom => content.set_bottom(pref_h - half - o.y_margin),
        }
        content.dispose();

        // The node's origin belongs to whatever embeds the panel; only the
        // size is ours to write.
        let origin = self.node.origin().unwrap_or(Vec2::ZERO);
        self.node
            .set_natural_bounds(Some(Rect::new(origin, Size(pref_w, pref_h))));

        // Publish upward last: this may trigger a parent's pass.
        self.node.set_minimum_size(Some(min_w), Some(min_h));

        trace!(
            target: "boxlayout::panel",
            "min=({min_w}, {min_h}), preferred=({pref_w}, {pref_h})"
        );
    }
}

/// A bordered container around a single content element
///
/// The panel reports a minimum size derived from its content's minimum plus
/// margins and stroke compensation, and distributes an externally requested
/// preferred size (see [`Sizable`]) back down to the content and the
/// background decoration.
///
/// The content element need not be exclusively owned: all position writes go
/// through a [`LayoutProxy`].
pub struct Panel {
    node: Element,
    background: Element,
    content: Element,
    constraint: LayoutConstraint<PanelStrategy>,
}

impl Panel {
    /// Construct; the first layout pass runs synchronously
    pub fn new(content: Element, options: PanelOptions) -> Self {
        let options = options.sanitize();
        let node = Element::new().with_sizing(SizingFlags::WIDTH | SizingFlags::HEIGHT);
        let background = Element::new();
        node.set_children(vec![background.clone(), content.clone()]);

        let constraint = LayoutConstraint::new(PanelStrategy {
            node: node.clone(),
            background: background.clone(),
            content: content.clone(),
            options,
        });
        constraint.add_node(&content);
        constraint.add_node(&node);
        if !options.resize {
            constraint.set_enabled(false);
        }
        // Initial synchronous pass: valid geometry before first paint,
        // even when automatic resize is off.
        constraint.update_layout();

        Panel {
            node,
            background,
            content,
            constraint,
        }
    }

    /// The panel's own node, for embedding in a parent container
    pub fn element(&self) -> &Element {
        &self.node
    }

    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Background decoration rect in the panel's frame; `None` in the
    /// "no valid content" state
    pub fn background_rect(&self) -> Option<Rect> {
        if !self.background.is_visible() {
            return None;
        }
        self.background.natural_bounds()
    }

    pub fn options(&self) -> PanelOptions {
        self.constraint.read_strategy(|s| s.options)
    }

    /// Replace the options (validated) and re-layout
    pub fn set_options(&self, options: PanelOptions) {
        let options = options.sanitize();
        self.constraint.with_strategy(|s| s.options = options);
        self.constraint.set_enabled(options.resize);
        self.constraint.update_layout();
    }

    /// Force a synchronous layout pass
    pub fn update_layout(&self) {
        self.constraint.update_layout();
    }
}

impl Sizable for Panel {
    fn minimum_width(&self) -> Option<f64> {
        self.node.minimum_width()
    }

    fn minimum_height(&self) -> Option<f64> {
        self.node.minimum_height()
    }

    fn set_preferred_width(&self, width: Option<f64>) {
        self.node.set_preferred_width(width);
    }

    fn set_preferred_height(&self, height: Option<f64>) {
        self.node.set_preferred_height(height);
    }

    fn is_width_resizable(&self) -> bool {
        true
    }

    fn is_height_resizable(&self) -> bool {
        true
    }
}
