// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Layout negotiation
//!
//! Containers own a [`LayoutConstraint`] pairing the shared watch-set and
//! re-entrancy machinery with a container-specific [`LayoutStrategy`]. A
//! pass reads watched elements' minimum sizes bottom-up, publishes the
//! container's own minimum upward, and distributes any externally requested
//! preferred size back down into content sizes and positions, writing
//! shared content only through a per-pass [`LayoutProxy`].

mod accordion;
mod align;
mod constraint;
mod panel;
mod proxy;

pub use accordion::{AccordionBox, AccordionOptions, TitleBarShape};
pub use align::{Align, AlignV};
pub use constraint::{LayoutConstraint, LayoutStrategy};
pub use panel::{OptionsError, Panel, PanelOptions};
pub use proxy::LayoutProxy;
