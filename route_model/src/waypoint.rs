use geom::LonLat;
use serde::{Deserialize, Serialize};

use crate::Polyline;

/// The visual pin for a waypoint or standalone marker. Owned exclusively by whatever it
/// marks; the rendering surface only ever holds a drawn peer, never this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub title: String,
    pub label: char,
    pub color: MarkerColor,
    pub visible: bool,
}

impl Marker {
    /// A waypoint pin labelled by its position in the route: 'A', 'B', ... wrapping after 'Z'.
    pub fn waypoint(idx: usize) -> Marker {
        Marker {
            title: "Waypoint".to_string(),
            label: Marker::label_for(idx),
            color: MarkerColor::Green,
            visible: true,
        }
    }

    pub fn label_for(idx: usize) -> char {
        char::from_u32('A' as u32 + (idx as u32) % 26).unwrap()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarkerColor {
    Green,
    Blue,
    Brown,
    Pink,
}

/// A position on some route, plus the line connecting it to its immediate predecessor. The
/// first waypoint in a route has no connection. The connection is a value copy; the line
/// actually rendered lives in the owning route's line sequence, and the two are matched up
/// by path key, never by instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Waypoint {
    position: LonLat,
    marker: Marker,
    connection: Option<Polyline>,
}

impl Waypoint {
    pub fn new(position: LonLat, marker: Marker) -> Waypoint {
        Waypoint {
            position,
            marker,
            connection: None,
        }
    }

    pub fn position(&self) -> LonLat {
        self.position
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Exclusive: a waypoint has at most one connection at a time, so any prior one is
    /// replaced.
    pub fn set_connection(&mut self, line: Polyline) {
        self.connection = Some(line);
    }

    pub fn clear_connection(&mut self) {
        self.connection = None;
    }

    pub fn connection(&self) -> Option<&Polyline> {
        self.connection.as_ref()
    }
}
