use std::collections::HashMap;

use geom::{HashableLonLat, LonLat, PathKey};

use crate::{MapModel, Polyline, Waypoint};

/// Value-keyed lookup from waypoints and lines to the route owning them. Rendered peers and
/// event payloads are separate allocations describing the same geometry, so ownership is
/// resolved by position and path equality, never by instance. Rebuild this after every
/// mutation of the map it was built from.
#[derive(Default)]
pub struct RouteIndex {
    waypoint_owners: HashMap<HashableLonLat, String>,
    line_owners: HashMap<PathKey, String>,
}

impl RouteIndex {
    /// Scans routes left to right, then each route's waypoints and lines in order. The first
    /// route claiming a position or path keeps it; when duplicate positions exist across
    /// routes, lookups are best-effort by that order.
    pub fn rebuild(map: &MapModel) -> RouteIndex {
        let mut index = RouteIndex::default();
        for route in map.routes() {
            for wp in route.waypoints() {
                index
                    .waypoint_owners
                    .entry(wp.position().to_hashable())
                    .or_insert_with(|| route.name().to_string());
            }
            for line in route.lines() {
                index
                    .line_owners
                    .entry(line.path_key())
                    .or_insert_with(|| route.name().to_string());
            }
        }
        index
    }

    pub fn route_for_waypoint(&self, wp: &Waypoint) -> Option<&str> {
        self.route_for_position(wp.position())
    }

    pub fn route_for_line(&self, line: &Polyline) -> Option<&str> {
        self.route_for_path(&line.path_key())
    }

    pub fn route_for_position(&self, position: LonLat) -> Option<&str> {
        self.waypoint_owners
            .get(&position.to_hashable())
            .map(|name| name.as_str())
    }

    pub fn route_for_path(&self, key: &PathKey) -> Option<&str> {
        self.line_owners.get(key).map(|name| name.as_str())
    }
}
