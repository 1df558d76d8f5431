// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Element nodes and change notification

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use linear_map::LinearMap;

use crate::geom::{Rect, Size, Vec2};

bitflags! {
    /// Which axes an element participates in size negotiation on
    ///
    /// An element without a flag is not resizable on that axis: its natural
    /// size is authoritative and preferred-size writes are ignored.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct SizingFlags: u8 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
    }
}

/// A change notification delivered to element listeners
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementEvent {
    /// Natural size or measurement validity changed
    BoundsChanged,
    /// Origin moved without a size or validity change
    ///
    /// Not a dirty-trigger for constraints: minimum sizes never depend on
    /// position, and containers sharing one content node each position it
    /// during their own passes.
    OriginChanged,
    /// Visibility toggled
    VisibilityChanged,
    /// A published minimum extent changed
    MinimumSizeChanged,
    /// A requested preferred extent changed
    PreferredSizeChanged,
}

/// Identifies one subscription on an [`Element`] or [`Flag`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ListenerId(u32);

struct ElementData {
    /// Natural (intrinsic) bounds in the parent frame; `None` = not yet
    /// measured (the "invalid bounds" state).
    bounds: Option<Rect>,
    visible: bool,
    sizing: SizingFlags,
    preferred_width: Option<f64>,
    preferred_height: Option<f64>,
    minimum_width: Option<f64>,
    minimum_height: Option<f64>,
    /// Populated for container nodes only
    children: Vec<Element>,
    listeners: LinearMap<u32, Rc<dyn Fn(ElementEvent)>>,
    next_listener: u32,
}

impl ElementData {
    fn new() -> Self {
        ElementData {
            bounds: None,
            visible: true,
            sizing: SizingFlags::empty(),
            preferred_width: None,
            preferred_height: None,
            minimum_width: None,
            minimum_height: None,
            children: Vec::new(),
            listeners: LinearMap::new(),
            next_listener: 0,
        }
    }

    /// Effective size: natural size with preferences applied on resizable axes
    ///
    /// A preference is clamped to at least the published minimum. `None` while
    /// unmeasured.
    fn effective_size(&self) -> Option<Size> {
        let rect = self.bounds.filter(|r| r.is_valid())?;
        let mut size = rect.size;
        if self.sizing.contains(SizingFlags::WIDTH) {
            if let Some(w) = self.preferred_width {
                size.0 = w.max(self.minimum_width.unwrap_or(0.0));
            }
        }
        if self.sizing.contains(SizingFlags::HEIGHT) {
            if let Some(h) = self.preferred_height {
                size.1 = h.max(self.minimum_height.unwrap_or(0.0));
            }
        }
        Some(size)
    }
}

/// A visual node participating in layout
///
/// `Element` is a cheap-to-clone handle; all clones refer to the same node.
/// The node is owned by whichever UI object created it and merely referenced
/// by constraints, possibly by more than one (a shared content node).
///
/// An element carries natural bounds (position and intrinsic size in its
/// parent's frame), a visibility flag, resizability capabilities, and the
/// negotiated preferred/minimum extents. Any change notifies subscribed
/// listeners synchronously, after the write completes.
#[derive(Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

/// Non-owning handle to an [`Element`]
#[derive(Clone)]
pub struct WeakElement(Weak<RefCell<ElementData>>);

impl WeakElement {
    /// Attempt to upgrade to a strong handle
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::new()
    }
}

impl PartialEq for Element {
    /// Handle identity, not structural equality
    fn eq(&self, rhs: &Self) -> bool {
        Rc::ptr_eq(&self.0, &rhs.0)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Element")
            .field("bounds", &data.bounds)
            .field("visible", &data.visible)
            .field("sizing", &data.sizing)
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Construct an unmeasured, visible, non-resizable element
    pub fn new() -> Self {
        Element(Rc::new(RefCell::new(ElementData::new())))
    }

    /// Set natural size at origin zero (inline)
    #[must_use]
    pub fn with_natural_size(self, width: f64, height: f64) -> Self {
        self.set_natural_bounds(Some(Rect::new(Vec2::ZERO, Size(width, height))));
        self
    }

    /// Set resizability flags (inline)
    #[must_use]
    pub fn with_sizing(self, sizing: SizingFlags) -> Self {
        self.0.borrow_mut().sizing = sizing;
        self
    }

    /// Downgrade to a non-owning handle
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    /// Handle identity
    pub fn ptr_eq(&self, rhs: &Element) -> bool {
        Rc::ptr_eq(&self.0, &rhs.0)
    }

    fn notify(&self, event: ElementEvent) {
        // Listeners may re-enter this element; the borrow must be released
        // before any callback runs.
        let listeners: Vec<Rc<dyn Fn(ElementEvent)>> =
            self.0.borrow().listeners.values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self, listener: impl Fn(ElementEvent) + 'static) -> ListenerId {
        let mut data = self.0.borrow_mut();
        let id = data.next_listener;
        data.next_listener += 1;
        data.listeners.insert(id, Rc::new(listener));
        ListenerId(id)
    }

    /// Remove a subscription
    ///
    /// Removing an unknown id is a no-op.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.0.borrow_mut().listeners.remove(&id.0);
    }

    /// Natural bounds, if measured and valid
    pub fn natural_bounds(&self) -> Option<Rect> {
        self.0.borrow().bounds.filter(|r| r.is_valid())
    }

    /// Replace the natural bounds
    ///
    /// A rect failing [`Rect::is_valid`] is stored as-is but treated as
    /// unmeasured by all readers.
    pub fn set_natural_bounds(&self, bounds: Option<Rect>) {
        let event = {
            let mut data = self.0.borrow_mut();
            let old = data.bounds;
            data.bounds = bounds;
            match (old, bounds) {
                (a, b) if a == b => None,
                (Some(a), Some(b)) if a.is_valid() && b.is_valid() && a.size == b.size => {
                    Some(ElementEvent::OriginChanged)
                }
                _ => Some(ElementEvent::BoundsChanged),
            }
        };
        if let Some(event) = event {
            self.notify(event);
        }
    }

    /// Effective bounds: natural position with the effective size
    ///
    /// On resizable axes a requested preferred extent (clamped to at least
    /// the published minimum) replaces the natural extent. `None` while
    /// unmeasured.
    pub fn rect(&self) -> Option<Rect> {
        let data = self.0.borrow();
        let size = data.effective_size()?;
        data.bounds.map(|r| Rect::new(r.pos, size))
    }

    /// Position of the top-left corner in the parent frame
    pub fn origin(&self) -> Option<Vec2> {
        self.0.borrow().bounds.map(|r| r.pos)
    }

    /// Move the top-left corner; a no-op while unmeasured
    pub fn set_origin(&self, origin: Vec2) {
        let event = {
            let mut data = self.0.borrow_mut();
            match data.bounds.as_mut() {
                Some(rect) if rect.pos != origin => {
                    let was_valid = rect.is_valid();
                    rect.pos = origin;
                    if rect.is_valid() == was_valid {
                        Some(ElementEvent::OriginChanged)
                    } else {
                        Some(ElementEvent::BoundsChanged)
                    }
                }
                _ => None,
            }
        };
        if let Some(event) = event {
            self.notify(event);
        }
    }

    /// Move along the x axis only; a no-op while unmeasured
    pub fn set_origin_x(&self, x: f64) {
        if let Some(pos) = self.origin() {
            self.set_origin(Vec2(x, pos.1));
        }
    }

    /// Move along the y axis only; a no-op while unmeasured
    pub fn set_origin_y(&self, y: f64) {
        if let Some(pos) = self.origin() {
            self.set_origin(Vec2(pos.0, y));
        }
    }

    pub fn is_visible(&self) -> bool {
        self.0.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        let changed = {
            let mut data = self.0.borrow_mut();
            let changed = data.visible != visible;
            data.visible = visible;
            changed
        };
        if changed {
            self.notify(ElementEvent::VisibilityChanged);
        }
    }

    /// Resizability flags
    pub fn sizing(&self) -> SizingFlags {
        self.0.borrow().sizing
    }

    /// Requested preferred width, unfiltered
    pub fn preferred_width(&self) -> Option<f64> {
        self.0.borrow().preferred_width
    }

    /// Requested preferred height, unfiltered
    pub fn preferred_height(&self) -> Option<f64> {
        self.0.borrow().preferred_height
    }

    pub(crate) fn set_preferred_width_raw(&self, width: Option<f64>) {
        let changed = {
            let mut data = self.0.borrow_mut();
            let changed = data.preferred_width != width;
            data.preferred_width = width;
            changed
        };
        if changed {
            self.notify(ElementEvent::PreferredSizeChanged);
        }
    }

    pub(crate) fn set_preferred_height_raw(&self, height: Option<f64>) {
        let changed = {
            let mut data = self.0.borrow_mut();
            let changed = data.preferred_height != height;
            data.preferred_height = height;
            changed
        };
        if changed {
            self.notify(ElementEvent::PreferredSizeChanged);
        }
    }

    /// Publish minimum extents (constraints only)
    ///
    /// `None` clears a minimum (the "no valid content yet" state). Publishing
    /// notifies listeners, which may include a parent container's constraint;
    /// callers must have finished reading sizes first.
    pub fn set_minimum_size(&self, width: Option<f64>, height: Option<f64>) {
        let changed = {
            let mut data = self.0.borrow_mut();
            let changed = data.minimum_width != width || data.minimum_height != height;
            data.minimum_width = width;
            data.minimum_height = height;
            changed
        };
        if changed {
            self.notify(ElementEvent::MinimumSizeChanged);
        }
    }

    /// Minimum extents used when negotiating: published minimums where
    /// available, else the natural size
    ///
    /// `None` while unmeasured.
    pub fn effective_minimum_size(&self) -> Option<Size> {
        let data = self.0.borrow();
        let rect = data.bounds.filter(|r| r.is_valid())?;
        let width = data.minimum_width.unwrap_or(rect.size.0);
        let height = data.minimum_height.unwrap_or(rect.size.1);
        Some(Size(width, height))
    }

    /// Replace the children list (container nodes only)
    pub fn set_children(&self, children: Vec<Element>) {
        self.0.borrow_mut().children = children;
    }

    /// All children, visible or not
    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    /// Children that are visible and have valid bounds
    ///
    /// This is what an embedding container measures: an invalid or hidden
    /// child contributes nothing.
    pub fn visible_children(&self) -> Vec<Element> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| child.is_visible() && child.natural_bounds().is_some())
            .cloned()
            .collect()
    }
}

struct FlagData {
    value: bool,
    listeners: LinearMap<u32, Rc<dyn Fn(bool)>>,
    next_listener: u32,
}

/// An observable boolean
///
/// Carries the accordion's expanded state so that toggling it is a layout
/// dirty-trigger exactly like a watched element's size change.
#[derive(Clone)]
pub struct Flag(Rc<RefCell<FlagData>>);

impl Flag {
    pub fn new(value: bool) -> Self {
        Flag(Rc::new(RefCell::new(FlagData {
            value,
            listeners: LinearMap::new(),
            next_listener: 0,
        })))
    }

    pub fn get(&self) -> bool {
        self.0.borrow().value
    }

    /// Set the value, notifying listeners on change
    pub fn set(&self, value: bool) {
        let changed = {
            let mut data = self.0.borrow_mut();
            let changed = data.value != value;
            data.value = value;
            changed
        };
        if changed {
            let listeners: Vec<Rc<dyn Fn(bool)>> =
                self.0.borrow().listeners.values().cloned().collect();
            for listener in listeners {
                listener(value);
            }
        }
    }

    pub fn subscribe(&self, listener: impl Fn(bool) + 'static) -> ListenerId {
        let mut data = self.0.borrow_mut();
        let id = data.next_listener;
        data.next_listener += 1;
        data.listeners.insert(id, Rc::new(listener));
        ListenerId(id)
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.0.borrow_mut().listeners.remove(&id.0);
    }
}
