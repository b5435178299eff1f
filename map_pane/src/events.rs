use geom::LonLat;

use crate::render::{MarkerId, ScreenPt, ShapeId};

/// What kind of surface interaction happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    RightClick,
}

/// What the interaction hit: the map background, or a drawn object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Map,
    Marker(MarkerId),
    Shape(ShapeId),
}

/// A surface event, marshalled onto the event thread by the host. The payload always
/// carries the geographic position of the interaction.
#[derive(Clone, Copy, Debug)]
pub struct MapEvent {
    pub target: EventTarget,
    pub kind: EventKind,
    pub position: LonLat,
}

/// What the facade did with an event, and what the host should do next.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Not handled here; other handlers may still care.
    Nothing,
    /// A waypoint was appended to this route.
    WaypointAdded { route: String },
    /// The user asked for a delete affordance on an object. The target names the canonical
    /// entity from the route's own sequences, never the event payload's copy.
    ShowContextMenu {
        target: ContextTarget,
        screen: Option<ScreenPt>,
    },
}

/// A delete target, resolved to the owning route and the canonical waypoint.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextTarget {
    /// A right-clicked waypoint marker.
    Waypoint { route: String, position: LonLat },
    /// A right-clicked connecting line, resolved to the waypoint owning that connection.
    Connection { route: String, position: LonLat },
}
