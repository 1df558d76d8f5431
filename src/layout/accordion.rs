// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Collapsible accordion container

use log::{trace, warn};

use super::panel::{require_non_negative, require_positive};
use super::{Align, AlignV, LayoutConstraint, LayoutProxy, LayoutStrategy, OptionsError};
use crate::element::{Element, Flag, SizingFlags};
use crate::geom::{Affine, Rect, Size, Vec2};
use crate::Sizable;

/// Accordion configuration
///
/// Two layout regimes are selected by `show_title_when_expanded`: content
/// below the title bar (vertical stack), or content beside the toggle button
/// with the title hidden while expanded (horizontal split).
///
/// Defaults follow the panel's conventions; see field docs. Overrides use
/// struct update syntax, as for [`PanelOptions`](super::PanelOptions).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AccordionOptions {
    /// Title x within the title-bar span not occupied by the button
    pub title_align: Align,
    /// Title and button y within the title bar; `Bottom` is not supported
    pub title_align_y: AlignV,
    /// Which side the toggle button sits on; `Center` is not supported
    pub button_align: Align,
    /// Horizontal margin between content and box edge; must be positive
    pub content_x_margin: f64,
    /// Vertical margin below content; must be positive
    pub content_y_margin: f64,
    /// Gap between button and content in the horizontal-split regime
    pub content_x_spacing: f64,
    /// Gap between title bar and content in the vertical-stack regime
    pub content_y_spacing: f64,
    pub button_x_margin: f64,
    pub button_y_margin: f64,
    pub title_x_margin: f64,
    pub title_y_margin: f64,
    /// Gap between button and title
    pub title_x_spacing: f64,
    /// Side length of the square toggle button; must be positive
    pub button_size: f64,
    /// Keep the title visible above content while expanded
    pub show_title_when_expanded: bool,
    /// Report the expanded size even while collapsed
    pub use_expanded_bounds_when_collapsed: bool,
    /// Start content at the box top (under the title bar) instead of below it
    pub allow_content_to_overlap_title: bool,
    /// Whether clicking the title bar toggles the box; no layout effect,
    /// consumed by interaction code
    pub title_bar_expand_collapse: bool,
    /// Corner radius of the box and title bar; non-negative
    pub corner_radius: f64,
    /// Border line width; `None` reserves no stroke compensation
    pub stroke: Option<f64>,
    /// Minimum width floor applied before stroke compensation
    pub min_width: f64,
    /// Maps to the constraint's enabled flag
    pub resize: bool,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        AccordionOptions {
            title_align: Align::Center,
            title_align_y: AlignV::Center,
            button_align: Align::Left,
            content_x_margin: 15.0,
            content_y_margin: 8.0,
            content_x_spacing: 5.0,
            content_y_spacing: 8.0,
            button_x_margin: 4.0,
            button_y_margin: 2.0,
            title_x_margin: 10.0,
            title_y_margin: 2.0,
            title_x_spacing: 5.0,
            button_size: 16.0,
            show_title_when_expanded: true,
            use_expanded_bounds_when_collapsed: false,
            allow_content_to_overlap_title: false,
            title_bar_expand_collapse: true,
            corner_radius: 10.0,
            stroke: Some(1.0),
            min_width: 0.0,
            resize: true,
        }
    }
}

impl AccordionOptions {
    /// Check all fields
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.title_align_y == AlignV::Bottom {
            return Err(OptionsError::UnsupportedAlign {
                name: "title_align_y",
                value: "Bottom",
            });
        }
        if self.button_align == Align::Center {
            return Err(OptionsError::UnsupportedAlign {
                name: "button_align",
                value: "Center",
            });
        }
        require_positive("content_x_margin", self.content_x_margin)?;
        require_positive("content_y_margin", self.content_y_margin)?;
        require_non_negative("content_x_spacing", self.content_x_spacing)?;
        require_non_negative("content_y_spacing", self.content_y_spacing)?;
        require_non_negative("button_x_margin", self.button_x_margin)?;
        require_non_negative("button_y_margin", self.button_y_margin)?;
        require_non_negative("title_x_margin", self.title_x_margin)?;
        require_non_negative("title_y_margin", self.title_y_margin)?;
        require_non_negative("title_x_spacing", self.title_x_spacing)?;
        require_positive("button_size", self.button_size)?;
        require_non_negative("corner_radius", self.corner_radius)?;
        require_non_negative("min_width", self.min_width)?;
        if let Some(width) = self.stroke {
            require_positive("stroke", width)?;
        }
        Ok(())
    }

    /// Validate, reverting invalid fields to defaults in release builds
    fn sanitize(mut self) -> Self {
        while let Err(error) = self.validate() {
            debug_assert!(false, "AccordionOptions: {error}");
            warn!(target: "boxlayout", "AccordionOptions: {error}; reverting to default");
            let defaults = AccordionOptions::default();
            match error {
                OptionsError::UnsupportedAlign { name: "title_align_y", .. } => {
                    self.title_align_y = defaults.title_align_y;
                }
                OptionsError::UnsupportedAlign { .. } => {
                    self.button_align = defaults.button_align;
                }
                OptionsError::NonPositive { name, .. } | OptionsError::Negative { name, .. } => {
                    match name {
                        "content_x_margin" => self.content_x_margin = defaults.content_x_margin,
                        "content_y_margin" => self.content_y_margin = defaults.content_y_margin,
                        "content_x_spacing" => self.content_x_spacing = defaults.content_x_spacing,
                        "content_y_spacing" => self.content_y_spacing = defaults.content_y_spacing,
                        "button_x_margin" => self.button_x_margin = defaults.button_x_margin,
                        "button_y_margin" => self.button_y_margin = defaults.button_y_margin,
                        "title_x_margin" => self.title_x_margin = defaults.title_x_margin,
                        "title_y_margin" => self.title_y_margin = defaults.title_y_margin,
                        "title_x_spacing" => self.title_x_spacing = defaults.title_x_spacing,
                        "button_size" => self.button_size = defaults.button_size,
                        "corner_radius" => self.corner_radius = defaults.corner_radius,
                        "min_width" => self.min_width = defaults.min_width,
                        _ => self.stroke = defaults.stroke,
                    }
                }
            }
        }
        self
    }

    fn stroke_compensation(&self) -> f64 {
        self.stroke.unwrap_or(0.0)
    }
}

/// Corner geometry of the title-bar background
///
/// The top corners always match the box radius. When expanded the bottom
/// corners are square so the bar merges visually with the box below; a
/// collapsed box is just the bar, so all four corners round.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TitleBarShape {
    pub top_radius: f64,
    pub bottom_radius: f64,
}

struct AccordionStrategy {
    node: Element,
    content: Element,
    title: Element,
    button: Element,
    title_bar: Element,
    box_background: Element,
    expanded: Flag,
    options: AccordionOptions,
    collapsed_height: Option<f64>,
    expanded_height: Option<f64>,
    shape: TitleBarShape,
}

impl AccordionStrategy {
    /// Terminal state for invalid required bounds: empty the children list
    /// (so embedding containers measure zero, not stale size), hide the
    /// decorations and clear all published sizes.
    fn bail_out(&mut self) {
        self.node.set_children(Vec::new());
        self.title_bar.set_visible(false);
        self.box_background.set_visible(false);
        self.node.set_natural_bounds(None);
        self.collapsed_height = None;
        self.expanded_height = None;
        self.node.set_minimum_size(None, None);
    }

    /// Width needed by the title bar: button, gap, title, margins
    fn title_bar_min_width(&self, title_min_w: f64) -> f64 {
        let o = &self.options;
        o.button_x_margin + o.button_size + o.title_x_spacing + title_min_w + o.title_x_margin
    }
}

impl LayoutStrategy for AccordionStrategy {
    fn recompute(&mut self) {
        let o = self.options;
        let comp = o.stroke_compensation();
        let half = 0.5 * comp;
        let expanded = self.expanded.get();
        let retain = o.use_expanded_bounds_when_collapsed;

        let mut title = LayoutProxy::new(&self.title, Affine::IDENTITY);
        let mut content = LayoutProxy::new(&self.content, Affine::IDENTITY);

        let title_min = match (
            title.effective_minimum_width(),
            title.effective_minimum_height(),
        ) {
            (Some(w), Some(h)) => Size(w, h),
            _ => {
                title.dispose();
                content.dispose();
                self.bail_out();
                return;
            }
        };

        let content_min = match (
            content.effective_minimum_width(),
            content.effective_minimum_height(),
        ) {
            (Some(w), Some(h)) if self.content.is_visible() => Some(Size(w, h)),
            _ => None,
        };
        let content_needed = expanded || retain;
        if content_needed && content_min.is_none() {
            // invalid content while it is required: same policy as the panel
            title.dispose();
            content.dispose();
            self.bail_out();
            return;
        }

        // Read phase: state-dependent minimum extents.
        let collapsed_h = (o.button_size + 2.0 * o.button_y_margin)
            .max(title_min.1 + 2.0 * o.title_y_margin);

        match content_min {
            None => {
                // never expose a stale cached height once content goes invalid
                self.expanded_height = None;
            }
            Some(cm) if content_needed => {
                let expanded_h = if o.show_title_when_expanded {
                    if o.allow_content_to_overlap_title {
                        collapsed_h.max(cm.1 + 2.0 * o.content_y_margin)
                    } else {
                        collapsed_h + o.content_y_spacing + cm.1 + o.content_y_margin
                    }
                } else {
                    (o.button_size + 2.0 * o.button_y_margin)
                        .max(cm.1 + 2.0 * o.content_y_margin)
                };
                self.expanded_height = Some(expanded_h);
            }
            Some(_) => (),
        }
        self.collapsed_height = Some(collapsed_h);

        // The content width term applies whenever content is measurable:
        // only the minimum heights are state-dependent, so collapsing must
        // not narrow the box under an embedding parent.
        let mut min_w = o.min_width.max(self.title_bar_min_width(title_min.0));
        if let Some(cm) = content_min {
            min_w = min_w.max(if o.show_title_when_expanded {
                cm.0 + 2.0 * o.content_x_margin
            } else {
                o.button_x_margin
                    + o.button_size
                    + o.content_x_spacing
                    + cm.0
                    + o.content_x_margin
            });
        }
        let min_w = min_w + comp;

        let box_h = if expanded || retain {
            self.expanded_height.unwrap_or(collapsed_h)
        } else {
            collapsed_h
        };
        let min_h = box_h + comp;

        // Resolve against the external request.
        let request_w = self.node.preferred_width();
        let request_h = self.node.preferred_height();
        let pref_w = min_w.max(request_w.unwrap_or(0.0));
        let pref_h = min_h.max(request_h.unwrap_or(0.0));

        // Write phase: distribute, then position.
        if expanded && request_w.is_some() {
            let available = if o.show_title_when_expanded {
                pref_w - comp - 2.0 * o.content_x_margin
            } else {
                pref_w - comp
                    - o.button_x_margin
                    - o.button_size
                    - o.content_x_spacing
                    - o.content_x_margin
            };
            content.set_preferred_width(Some(available));
        }
        if expanded && request_h.is_some() {
            let available = if o.show_title_when_expanded {
                if o.allow_content_to_overlap_title {
                    pref_h - comp - 2.0 * o.content_y_margin
                } else {
                    pref_h - comp - collapsed_h - o.content_y_spacing - o.content_y_margin
                }
            } else {
                pref_h - comp - 2.0 * o.content_y_margin
            };
            content.set_preferred_height(Some(available));
        }

        // Title bar and box backgrounds (owned decorations).
        let bar_visible = !expanded || o.show_title_when_expanded;
        self.title_bar.set_natural_bounds(Some(Rect::new(
            Vec2::splat(half),
            Size(pref_w - comp, collapsed_h),
        )));
        self.title_bar.set_visible(bar_visible);
        self.box_background.set_natural_bounds(Some(Rect::new(
            Vec2::splat(half),
            Size(pref_w - comp, pref_h - comp),
        )));
        self.box_background.set_visible(expanded);
        self.shape = TitleBarShape {
            top_radius: o.corner_radius,
            bottom_radius: if expanded { 0.0 } else { o.corner_radius },
        };

        // Button within the title bar.
        let button_left = match o.button_align {
            Align::Right => pref_w - half - o.button_x_margin - o.button_size,
            _ => half + o.button_x_margin,
        };
        let button_top = match o.title_align_y {
            AlignV::Top => half + o.button_y_margin,
            _ => half + 0.5 * (collapsed_h - o.button_size),
        };
        self.button
            .set_origin(Vec2(button_left, button_top));

        // Title within the span the button leaves free.
        let title_visible = bar_visible;
        self.title.set_visible(title_visible);
        if title_visible {
            let (span_start, span_end) = match o.button_align {
                Align::Right => (half + o.title_x_margin, button_left - o.title_x_spacing),
                _ => (
                    button_left + o.button_size + o.title_x_spacing,
                    pref_w - half - o.title_x_margin,
                ),
            };
            let title_w = title.width();
            title.set_left(o.title_align.position(span_start, span_end, title_w));
            match o.title_align_y {
                AlignV::Top => title.set_top(half + o.title_y_margin),
                _ => title.set_center_y(half + 0.5 * collapsed_h),
            }
        }
        title.dispose();

        // Content, present only while expanded.
        if expanded {
            if o.show_title_when_expanded {
                let start = half + o.content_x_margin;
                let end = pref_w - half - o.content_x_margin;
                let content_w = content.width();
                content.set_left(Align::Center.position(start, end, content_w));
                let top = if o.allow_content_to_overlap_title {
                    half + o.content_y_margin
                } else {
                    half + collapsed_h + o.content_y_spacing
                };
                content.set_top(top);
            } else {
                let (start, end) = match o.button_align {
                    Align::Right => (
                        half + o.content_x_margin,
                        pref_w - half - o.button_x_margin - o.button_size - o.content_x_spacing,
                    ),
                    _ => (
                        half + o.button_x_margin + o.button_size + o.content_x_spacing,
                        pref_w - half - o.content_x_margin,
                    ),
                };
                let content_w = content.width();
                content.set_left(Align::Center.position(start, end, content_w));
                content.set_center_y(0.5 * pref_h);
            }
        }
        content.dispose();

        // While collapsed the content (and box background) are excluded from
        // the children list entirely, not merely hidden: an embedding
        // container must measure the collapsed bar, never stale content.
        if expanded {
            self.node.set_children(vec![
                self.box_background.clone(),
                self.title_bar.clone(),
                self.button.clone(),
                self.title.clone(),
                self.content.clone(),
            ]);
        } else {
            self.node.set_children(vec![
                self.title_bar.clone(),
                self.button.clone(),
                self.title.clone(),
            ]);
        }

        let origin = self.node.origin().unwrap_or(Vec2::ZERO);
        self.node
            .set_natural_bounds(Some(Rect::new(origin, Size(pref_w, pref_h))));

        // Publish upward last.
        self.node.set_minimum_size(Some(min_w), Some(min_h));

        trace!(
            target: "boxlayout::accordion",
            "expanded={expanded}, min=({min_w}, {min_h}), preferred=({pref_w}, {pref_h})"
        );
    }
}

/// A two-state collapsible container with a title bar and toggle button
///
/// Expanded, the box shows its content below the title bar (or beside the
/// button, per [`AccordionOptions::show_title_when_expanded`]); collapsed,
/// only the title bar remains and the content is excluded from the box's
/// children outright. [`Self::collapsed_box_height`] and
/// [`Self::expanded_box_height`] expose exact pixel geometry independent of
/// the current state, for callers that need it.
pub struct AccordionBox {
    node: Element,
    content: Element,
    title: Element,
    button: Element,
    title_bar: Element,
    expanded: Flag,
    constraint: LayoutConstraint<AccordionStrategy>,
}

impl AccordionBox {
    /// Construct, initially expanded; the first layout pass runs
    /// synchronously
    pub fn new(content: Element, title: Element, options: AccordionOptions) -> Self {
        let options = options.sanitize();
        let node = Element::new().with_sizing(SizingFlags::WIDTH | SizingFlags::HEIGHT);
        let button =
            Element::new().with_natural_size(options.button_size, options.button_size);
        let title_bar = Element::new();
        let box_background = Element::new();
        let expanded = Flag::new(true);

        let constraint = LayoutConstraint::new(AccordionStrategy {
            node: node.clone(),
            content: content.clone(),
            title: title.clone(),
            button: button.clone(),
            title_bar: title_bar.clone(),
            box_background,
            expanded: expanded.clone(),
            options,
            collapsed_height: None,
            expanded_height: None,
            shape: TitleBarShape::default(),
        });
        constraint.add_node(&content);
        constraint.add_node(&title);
        constraint.add_node(&node);
        constraint.watch_flag(&expanded);
        if !options.resize {
            constraint.set_enabled(false);
        }
        constraint.update_layout();

        AccordionBox {
            node,
            content,
            title,
            button,
            title_bar,
            expanded,
            constraint,
        }
    }

    /// The box's own node, for embedding in a parent container
    pub fn element(&self) -> &Element {
        &self.node
    }

    pub fn content(&self) -> &Element {
        &self.content
    }

    pub fn title(&self) -> &Element {
        &self.title
    }

    /// The internally owned toggle button
    pub fn button(&self) -> &Element {
        &self.button
    }

    /// Title-bar rect in the box's frame, when shown
    pub fn title_bar_rect(&self) -> Option<Rect> {
        if !self.title_bar.is_visible() {
            return None;
        }
        self.title_bar.natural_bounds()
    }

    /// Box background rect in the box's frame, when expanded
    pub fn box_rect(&self) -> Option<Rect> {
        self.constraint.read_strategy(|s| {
            if !s.box_background.is_visible() {
                return None;
            }
            s.box_background.natural_bounds()
        })
    }

    /// Corner geometry of the title-bar background
    pub fn title_bar_shape(&self) -> TitleBarShape {
        self.constraint.read_strategy(|s| s.shape)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Toggle state; re-enters the full layout pass via the watched flag
    pub fn set_expanded(&self, expanded: bool) {
        self.expanded.set(expanded);
    }

    /// Height of the bare title bar, from button and title rows only
    pub fn collapsed_box_height(&self) -> Option<f64> {
        self.constraint.read_strategy(|s| s.collapsed_height)
    }

    /// Height of the open box
    ///
    /// Computed while expanded (or when
    /// [`AccordionOptions::use_expanded_bounds_when_collapsed`] is set) and
    /// retained across a collapse; `None` whenever content bounds are
    /// invalid, so a stale height is never observable.
    pub fn expanded_box_height(&self) -> Option<f64> {
        self.constraint.read_strategy(|s| s.expanded_height)
    }

    pub fn options(&self) -> AccordionOptions {
        self.constraint.read_strategy(|s| s.options)
    }

    /// Replace the options (validated) and re-layout
    pub fn set_options(&self, options: AccordionOptions) {
        let options = options.sanitize();
        self.constraint.with_strategy(|s| s.options = options);
        self.button
            .set_natural_bounds(Some(Rect::new(
                self.button.origin().unwrap_or(Vec2::ZERO),
                Size(options.button_size, options.button_size),
            )));
        self.constraint.set_enabled(options.resize);
        self.constraint.update_layout();
    }

    /// Force a synchronous layout pass
    pub fn update_layout(&self) {
        self.constraint.update_layout();
    }
}

impl Sizable for AccordionBox {
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
