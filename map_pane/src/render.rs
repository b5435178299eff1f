use anyhow::Result;
use geom::LonLat;
use route_model::{MapOptions, Marker, PolylineStyle};

use crate::events::{EventKind, EventTarget};

/// An opaque handle to a marker drawn on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

/// An opaque handle to a line drawn on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// A pixel position on the surface, for anchoring popups next to geographic positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPt {
    pub x: f64,
    pub y: f64,
}

/// The rendering surface. Implementations wrap an actual map widget; the facade only ever
/// calls in from the single event thread and treats every failure as loggable, never fatal.
/// The surface holds drawn peers only; the model keeps ownership of all logical entities.
pub trait MapRenderer {
    /// Creates the underlying surface. Called once, before anything is drawn.
    fn init(&mut self, options: &MapOptions) -> Result<()>;

    fn draw_marker(&mut self, position: LonLat, marker: &Marker) -> Result<MarkerId>;
    fn remove_marker(&mut self, id: MarkerId) -> Result<()>;
    fn draw_line(&mut self, path: &[LonLat], style: &PolylineStyle) -> Result<ShapeId>;
    fn remove_line(&mut self, id: ShapeId) -> Result<()>;

    fn set_center(&mut self, position: LonLat) -> Result<()>;
    fn zoom(&self) -> usize;
    fn set_zoom(&mut self, zoom: usize) -> Result<()>;

    /// Projects a geographic position to surface pixels, if the surface can do that yet.
    fn screen_point(&self, position: LonLat) -> Option<ScreenPt>;

    /// Asks the surface to start delivering matching events to the host, which forwards
    /// them to `MapPane::event`.
    fn subscribe(&mut self, target: EventTarget, kind: EventKind) -> Result<()>;
}
