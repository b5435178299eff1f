//! The glue between the logical route model and a map rendering surface: a mode-driven
//! editing facade that mutates the model, mirrors the mutation onto the surface, and
//! persists it, always in that order.
//!
//! Everything here is single-threaded. The host owns the event loop and marshals surface
//! callbacks onto one thread before calling in; none of these operations block or suspend.

#[macro_use]
extern crate log;

mod events;
mod headless;
mod locate;
mod pane;
mod render;

pub use crate::events::{ContextTarget, EventKind, EventTarget, MapEvent, Outcome};
pub use crate::headless::HeadlessRenderer;
pub use crate::locate::{FixedLocator, Locator};
pub use crate::pane::{MapPane, Mode};
pub use crate::render::{MapRenderer, MarkerId, ScreenPt, ShapeId};
