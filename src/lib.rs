// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! boxlayout: size negotiation for box-shaped container widgets
//!
//! A container must report the *minimum* space its dynamic content needs
//! while also accepting a *preferred* size from its own parent and
//! distributing that space back down to content, margins and decorations.
//! This crate implements that two-directional protocol:
//!
//! - [`Sizable`]: the per-element negotiation interface (read minimums,
//!   write preferences, query capability);
//! - [`layout::LayoutProxy`]: a per-pass handle for reading and writing an
//!   element's box model through a coordinate transform, so shared content
//!   nodes are never mutated absolutely;
//! - [`layout::LayoutConstraint`]: watch-set management, notification
//!   coalescing and re-entrancy guarding, shared by every container;
//! - two concrete containers: [`layout::Panel`] (bordered single-content
//!   box) and [`layout::AccordionBox`] (two-state collapsible box).
//!
//! Everything is single-threaded and synchronous: a content-size change,
//! an option mutation or a forced [`layout::Panel::update_layout`] call
//! runs to completion on the calling thread. Rendering, event handling and
//! styling are out of scope; collaborators consume the computed positions,
//! sizes and visibility.

pub mod geom;

mod element;
mod sizable;

pub mod layout;

pub use element::{Element, ElementEvent, Flag, ListenerId, SizingFlags, WeakElement};
pub use sizable::Sizable;
