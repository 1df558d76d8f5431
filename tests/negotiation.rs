// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! End-to-end negotiation properties

use boxlayout::geom::{Rect, Size, Vec2};
use boxlayout::layout::{AccordionBox, AccordionOptions, Align, AlignV, Panel, PanelOptions};
use boxlayout::{Element, Sizable, SizingFlags};

fn content(width: f64, height: f64) -> Element {
    Element::new().with_natural_size(width, height)
}

fn resizable_content(width: f64, height: f64) -> Element {
    content(width, height).with_sizing(SizingFlags::WIDTH | SizingFlags::HEIGHT)
}

#[test]
fn minimum_size_monotonicity() {
    let mut last = 0.0;
    for content_width in [10.0, 10.0, 25.0, 60.0, 200.0] {
        let panel = Panel::new(content(content_width, 20.0), PanelOptions::default());
        let min_w = panel.minimum_width().unwrap();
        assert!(min_w >= last, "minimum must not shrink as content grows");
        last = min_w;
    }
}

#[test]
fn margin_invariant_with_and_without_stroke() {
    for margin in [1.0, 4.0, 8.0, 20.0] {
        for stroke in [None, Some(1.0), Some(3.0)] {
            let panel = Panel::new(
                content(50.0, 20.0),
                PanelOptions {
                    x_margin: margin,
                    y_margin: margin,
                    stroke,
                    ..Default::default()
                },
            );
            let comp = stroke.unwrap_or(0.0);
            assert_eq!(panel.minimum_width(), Some(50.0 + 2.0 * margin + comp));
            assert_eq!(panel.minimum_height(), Some(20.0 + 2.0 * margin + comp));
        }
    }
}

#[test]
fn forced_pass_is_idempotent() {
    let inner = resizable_content(50.0, 20.0);
    let panel = Panel::new(inner.clone(), PanelOptions::default());
    panel.set_preferred_width(Some(200.0));

    let snapshot = |panel: &Panel, inner: &Element| {
        (
            panel.element().natural_bounds(),
            panel.background_rect(),
            inner.rect(),
            panel.minimum_width(),
            panel.minimum_height(),
        )
    };
    let before = snapshot(&panel, &inner);
    panel.update_layout();
    panel.update_layout();
    assert_eq!(snapshot(&panel, &inner), before);
}

#[test]
fn preferred_size_round_trip() {
    let inner = resizable_content(50.0, 20.0);
    let options = PanelOptions {
        x_margin: 8.0,
        y_margin: 8.0,
        stroke: Some(2.0),
        ..Default::default()
    };
    let panel = Panel::new(inner.clone(), options);
    let min_w = panel.minimum_width().unwrap();

    let request = min_w + 50.0;
    panel.set_preferred_width(Some(request));
    assert_eq!(inner.preferred_width(), Some(request - 16.0 - 2.0));
    assert_eq!(panel.element().rect().unwrap().size.0, request);

    // a request below the minimum clamps to the minimum
    panel.set_preferred_width(Some(min_w - 30.0));
    assert_eq!(panel.element().rect().unwrap().size.0, min_w);
    assert_eq!(inner.preferred_width(), Some(min_w - 16.0 - 2.0));
}

#[test]
fn no_request_leaves_content_at_natural_size() {
    let inner = resizable_content(50.0, 20.0);
    let panel = Panel::new(inner.clone(), PanelOptions::default());
    // without an external preferred size, content keeps its natural size
    // rather than being collapsed to a minimum
    assert_eq!(inner.preferred_width(), None);
    assert_eq!(inner.rect().unwrap().size, Size(50.0, 20.0));
    let _ = panel;
}

#[test]
fn left_alignment_is_independent_of_content_width() {
    for content_width in [10.0, 30.0, 50.0] {
        let inner = content(content_width, 20.0);
        let options = PanelOptions {
            align: Align::Left,
            x_margin: 6.0,
            min_width: 100.0,
            stroke: Some(2.0),
            ..Default::default()
        };
        let panel = Panel::new(inner.clone(), options);
        let background = panel.background_rect().unwrap();
        let rect = inner.rect().unwrap();
        assert_eq!(rect.left(), background.left() + 6.0);
        // vertically centered by default
        assert_eq!(rect.center_y(), panel.element().rect().unwrap().size.1 / 2.0);
    }
}

#[test]
fn right_alignment_tracks_the_background_edge() {
    for content_width in [10.0, 30.0, 50.0] {
        let inner = content(content_width, 20.0);
        let options = PanelOptions {
            align: Align::Right,
            x_margin: 6.0,
            min_width: 100.0,
            stroke: Some(2.0),
            ..Default::default()
        };
        let panel = Panel::new(inner.clone(), options);
        let background = panel.background_rect().unwrap();
        let rect = inner.rect().unwrap();
        assert_eq!(rect.right(), background.right() - 6.0);
    }
}

#[test]
fn vertical_alignment_places_content_at_the_margins() {
    for (y_align, expected_top) in [(AlignV::Top, 7.0), (AlignV::Bottom, 55.0)] {
        let inner = content(30.0, 20.0);
        let options = PanelOptions {
            y_align,
            x_margin: 6.0,
            y_margin: 6.0,
            min_height: 80.0,
            stroke: Some(2.0),
            ..Default::default()
        };
        let panel = Panel::new(inner.clone(), options);
        // pref height: max(80, 20 + 12) + 2 stroke = 82; half-stroke inset 1
        assert_eq!(panel.element().rect().unwrap().size.1, 82.0);
        assert_eq!(inner.rect().unwrap().top(), expected_top);
    }
}

#[test]
fn invalid_content_bails_out_and_recovers() {
    let inner = Element::new(); // unmeasured
    let panel = Panel::new(inner.clone(), PanelOptions { stroke: None, ..Default::default() });

    assert_eq!(panel.minimum_width(), None);
    assert_eq!(panel.minimum_height(), None);
    assert!(panel.background_rect().is_none());
    assert!(panel.element().visible_children().is_empty());

    // one valid measurement restores consistent minimums automatically
    inner.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(50.0, 20.0))));
    let margin = PanelOptions::default().x_margin;
    assert_eq!(panel.minimum_width(), Some(50.0 + 2.0 * margin));
    assert!(panel.background_rect().is_some());
    assert!(!panel.element().visible_children().is_empty());
}

#[test]
fn content_growth_propagates_automatically() {
    let inner = content(50.0, 20.0);
    let panel = Panel::new(inner.clone(), PanelOptions { stroke: None, ..Default::default() });
    let before = panel.minimum_width().unwrap();
    inner.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(90.0, 20.0))));
    assert_eq!(panel.minimum_width(), Some(before + 40.0));
}

#[test]
fn nested_panels_cascade_minimums() {
    let leaf = content(50.0, 20.0);
    let child = Panel::new(leaf.clone(), PanelOptions { stroke: None, ..Default::default() });
    let outer = Panel::new(child.element().clone(), PanelOptions { stroke: None, ..Default::default() });

    let margin = PanelOptions::default().x_margin;
    assert_eq!(outer.minimum_width(), Some(50.0 + 4.0 * margin));

    // a leaf change reaches the outer container through the chain
    leaf.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(70.0, 20.0))));
    assert_eq!(outer.minimum_width(), Some(70.0 + 4.0 * margin));
}

#[test]
fn nested_preferred_size_distributes_down_the_chain() {
    let leaf = resizable_content(50.0, 20.0);
    let child = Panel::new(leaf.clone(), PanelOptions { stroke: None, ..Default::default() });
    let outer = Panel::new(child.element().clone(), PanelOptions { stroke: None, ..Default::default() });

    let margin = PanelOptions::default().x_margin;
    let request = 200.0;
    outer.set_preferred_width(Some(request));
    assert_eq!(child.element().rect().unwrap().size.0, request - 2.0 * margin);
    assert_eq!(leaf.rect().unwrap().size.0, request - 4.0 * margin);
}

#[test]
fn disabled_resize_freezes_geometry() {
    let inner = content(50.0, 20.0);
    let panel = Panel::new(
        inner.clone(),
        PanelOptions { resize: false, stroke: None, ..Default::default() },
    );
    let frozen = panel.minimum_width();
    assert!(frozen.is_some());

    inner.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(100.0, 40.0))));
    assert_eq!(panel.minimum_width(), frozen);

    // an explicit forced pass still works while frozen
    panel.update_layout();
    assert_eq!(panel.minimum_width(), Some(100.0 + 2.0 * PanelOptions::default().x_margin));
}

#[test]
fn toggling_stroke_changes_minimum_size() {
    let inner = content(50.0, 20.0);
    let panel = Panel::new(inner, PanelOptions { stroke: None, ..Default::default() });
    let without = panel.minimum_width().unwrap();
    let mut options = panel.options();
    options.stroke = Some(2.0);
    panel.set_options(options);
    assert_eq!(panel.minimum_width(), Some(without + 2.0));
}

#[test]
fn accordion_toggle_scenario() {
    // collapsedBoxHeight 40, content height 100, y margin 8, y spacing 8
    let options = AccordionOptions {
        content_y_margin: 8.0,
        content_y_spacing: 8.0,
        title_y_margin: 2.0,
        button_y_margin: 2.0,
        button_size: 16.0,
        show_title_when_expanded: true,
        stroke: None,
        ..Default::default()
    };
    let abox = AccordionBox::new(
        content(80.0, 100.0),
        content(60.0, 36.0),
        options,
    );
    assert_eq!(abox.collapsed_box_height(), Some(40.0));
    assert_eq!(abox.expanded_box_height(), Some(156.0));

    // repeated toggling must reproduce the same height without drift
    for _ in 0..5 {
        abox.set_expanded(false);
        assert_eq!(abox.minimum_height(), Some(40.0));
        abox.set_expanded(true);
        assert_eq!(abox.expanded_box_height(), Some(156.0));
        assert_eq!(abox.minimum_height(), Some(156.0));
    }
}

#[test]
fn collapsed_accordion_measures_as_bar_inside_a_panel() {
    let options = AccordionOptions {
        content_y_margin: 8.0,
        content_y_spacing: 8.0,
        title_y_margin: 2.0,
        button_y_margin: 2.0,
        stroke: None,
        ..Default::default()
    };
    let abox = AccordionBox::new(content(80.0, 100.0), content(60.0, 36.0), options);
    let outer = Panel::new(
        abox.element().clone(),
        PanelOptions { stroke: None, ..Default::default() },
    );
    let margin = PanelOptions::default().y_margin;
    let box_min_w = abox.minimum_width();
    let outer_min_w = outer.minimum_width();

    assert_eq!(outer.minimum_height(), Some(156.0 + 2.0 * margin));
    abox.set_expanded(false);
    // the parent sees the collapsed bar, not stale expanded geometry
    assert_eq!(outer.minimum_height(), Some(40.0 + 2.0 * margin));
    // only the heights are state-dependent: collapsing never narrows the box
    assert_eq!(abox.minimum_width(), box_min_w);
    assert_eq!(outer.minimum_width(), outer_min_w);
}

#[test]
fn accordion_content_invalid_while_collapsed_clears_cached_height() {
    let inner = content(80.0, 100.0);
    let abox = AccordionBox::new(
        inner.clone(),
        content(60.0, 36.0),
        AccordionOptions { stroke: None, ..Default::default() },
    );
    assert!(abox.expanded_box_height().is_some());

    abox.set_expanded(false);
    inner.set_natural_bounds(None);
    // no stale cached height is observable
    assert_eq!(abox.expanded_box_height(), None);
    // the collapsed bar itself is still fully laid out
    assert!(abox.collapsed_box_height().is_some());

    inner.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(80.0, 100.0))));
    abox.set_expanded(true);
    assert!(abox.expanded_box_height().is_some());
}

#[test]
fn shared_content_notifies_both_containers() {
    let shared = content(50.0, 20.0);
    let a = Panel::new(shared.clone(), PanelOptions { stroke: None, ..Default::default() });
    let b = Panel::new(
        shared.clone(),
        PanelOptions { x_margin: 20.0, y_margin: 20.0, stroke: None, ..Default::default() },
    );
    shared.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(60.0, 20.0))));
    assert_eq!(a.minimum_width(), Some(60.0 + 16.0));
    assert_eq!(b.minimum_width(), Some(60.0 + 40.0));

    // each panel repositions the shared node during its own pass; those
    // moves must not ping-pong the two constraints against each other
    a.update_layout();
    b.update_layout();
    assert_eq!(a.minimum_width(), Some(60.0 + 16.0));
    assert_eq!(b.minimum_width(), Some(60.0 + 40.0));
}
