use anyhow::Result;
use geom::LonLat;
use route_model::{MapOptions, Marker, PolylineStyle};

use crate::events::{EventKind, EventTarget};
use crate::render::{MapRenderer, MarkerId, ScreenPt, ShapeId};

/// A renderer that draws nothing: it hands out ids, remembers zoom and center, and logs
/// calls at debug level. Lets hosts without a GUI (the CLI, scripts) drive the full editing
/// flows.
pub struct HeadlessRenderer {
    next_id: usize,
    zoom: usize,
    center: Option<LonLat>,
}

impl HeadlessRenderer {
    pub fn new() -> HeadlessRenderer {
        HeadlessRenderer {
            next_id: 0,
            zoom: 0,
            center: None,
        }
    }

    pub fn center(&self) -> Option<LonLat> {
        self.center
    }

    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        HeadlessRenderer::new()
    }
}

impl MapRenderer for HeadlessRenderer {
    fn init(&mut self, options: &MapOptions) -> Result<()> {
        self.zoom = options.zoom;
        debug!("surface up at zoom {}", options.zoom);
        Ok(())
    }

    fn draw_marker(&mut self, position: LonLat, marker: &Marker) -> Result<MarkerId> {
        let id = MarkerId(self.next_id());
        debug!("marker {} ({}) at {}", id.0, marker.label, position);
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        debug!("remove marker {}", id.0);
        Ok(())
    }

    fn draw_line(&mut self, path: &[LonLat], style: &PolylineStyle) -> Result<ShapeId> {
        let id = ShapeId(self.next_id());
        debug!(
            "line {} with {} points, {}",
            id.0,
            path.len(),
            style.stroke_color
        );
        Ok(id)
    }

    fn remove_line(&mut self, id: ShapeId) -> Result<()> {
        debug!("remove line {}", id.0);
        Ok(())
    }

    fn set_center(&mut self, position: LonLat) -> Result<()> {
        self.center = Some(position);
        Ok(())
    }

    fn zoom(&self) -> usize {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: usize) -> Result<()> {
        self.zoom = zoom;
        Ok(())
    }

    fn screen_point(&self, _: LonLat) -> Option<ScreenPt> {
        None
    }

    fn subscribe(&mut self, _: EventTarget, _: EventKind) -> Result<()> {
        Ok(())
    }
}
