use geom::{Distance, LonLat, PathKey};
use serde::{Deserialize, Serialize};

use crate::{Marker, Polyline, PolylineStyle, Waypoint};

/// An ordered, named sequence of waypoints and the lines connecting consecutive pairs.
/// After any use of the documented add flow, `lines.len() == max(0, waypoints.len() - 1)`,
/// and line i's path is exactly the positions of waypoints i and i+1, in order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    name: String,
    waypoints: Vec<Waypoint>,
    lines: Vec<Polyline>,
    interim_markers_visible: bool,
}

impl Route {
    pub fn new(name: &str) -> Route {
        Route {
            name: name.to_string(),
            waypoints: Vec::new(),
            lines: Vec::new(),
            interim_markers_visible: true,
        }
    }

    /// Builds a whole route at once: waypoints, connecting lines and connections, all with
    /// one style.
    pub fn from_positions(name: &str, positions: Vec<LonLat>, style: &PolylineStyle) -> Route {
        let mut route = Route::new(name);
        for (idx, pos) in positions.into_iter().enumerate() {
            let mut wp = Waypoint::new(pos, Marker::waypoint(idx));
            if idx > 0 {
                let line = Polyline::new(
                    vec![route.waypoints[idx - 1].position(), pos],
                    style.clone(),
                );
                wp.set_connection(line.clone());
                route.lines.push(line);
            }
            route.waypoints.push(wp);
        }
        route
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Panics if idx isn't in `[0, len)`; an invalid index is a programmer error.
    pub fn waypoint(&self, idx: usize) -> &Waypoint {
        &self.waypoints[idx]
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }

    pub fn origin(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn destination(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn interim_markers_visible(&self) -> bool {
        self.interim_markers_visible
    }

    pub fn set_interim_markers_visible(&mut self, visible: bool) {
        self.interim_markers_visible = visible;
    }

    /// Appends to the waypoint sequence. Doesn't create the connecting line; the caller
    /// attaches one once the route has >= 2 waypoints, so per-edge styles stay in the
    /// caller's hands.
    pub fn add_waypoint(&mut self, wp: Waypoint) {
        self.waypoints.push(wp);
    }

    /// Appends to the line sequence. The caller is responsible for keeping lines consistent
    /// with consecutive waypoint pairs.
    pub fn add_line(&mut self, line: Polyline) {
        self.lines.push(line);
    }

    /// Removes the first waypoint whose position equals the query's. The line sequence is
    /// deliberately left untouched; callers erase rendering state beforehand and repair the
    /// gap afterwards (see `reconnect`).
    pub fn remove_waypoint(&mut self, wp: &Waypoint) -> Option<Waypoint> {
        let idx = self
            .waypoints
            .iter()
            .position(|w| w.position() == wp.position())?;
        Some(self.waypoints.remove(idx))
    }

    /// Clears both sequences.
    pub fn remove_all_waypoints(&mut self) {
        self.waypoints.clear();
        self.lines.clear();
    }

    /// Finds the waypoint whose connection has the same path as the given line. This is how
    /// a rendered peer or an event payload copy resolves to the instance actually stored
    /// here; a miss just means no waypoint owns such a connection.
    pub fn waypoint_for_line(&self, line: &Polyline) -> Option<&Waypoint> {
        self.waypoint_for_path(&line.path_key())
    }

    pub fn waypoint_for_path(&self, key: &PathKey) -> Option<&Waypoint> {
        self.waypoints
            .iter()
            .find(|wp| wp.connection().map_or(false, |c| &c.path_key() == key))
    }

    /// The inverse: the line in this route's sequence matching the given waypoint's
    /// connection.
    pub fn line_for_waypoint(&self, wp: &Waypoint) -> Option<&Polyline> {
        let key = wp.connection()?.path_key();
        self.lines.iter().find(|line| line.path_key() == key)
    }

    /// Recomputes the line sequence from the current waypoint order. Lines whose path still
    /// matches a consecutive pair are kept, preserving their style; gaps get a fresh line
    /// with the given style; dangling lines are dropped. Every waypoint's connection is
    /// refreshed, with the first waypoint ending up unconnected.
    pub fn reconnect(&mut self, style: &PolylineStyle) {
        let old = std::mem::take(&mut self.lines);
        for wp in &mut self.waypoints {
            wp.clear_connection();
        }

        let positions: Vec<LonLat> = self.waypoints.iter().map(|wp| wp.position()).collect();
        for (idx, pair) in positions.windows(2).enumerate() {
            let key = PathKey::new(pair);
            let line = old
                .iter()
                .find(|l| l.path_key() == key)
                .cloned()
                .unwrap_or_else(|| Polyline::new(pair.to_vec(), style.clone()));
            self.waypoints[idx + 1].set_connection(line.clone());
            self.lines.push(line);
        }
    }

    /// Re-attaches each line as the connection of the waypoint owning it, refreshing value
    /// copies that may have drifted apart across edits or reloads. Lines no waypoint claims
    /// are left alone.
    pub fn refresh_connections(&mut self) {
        let lines = self.lines.clone();
        for line in lines {
            let key = line.path_key();
            if let Some(wp) = self
                .waypoints
                .iter_mut()
                .find(|wp| wp.connection().map_or(false, |c| c.path_key() == key))
            {
                wp.set_connection(line);
            }
        }
    }

    /// Total over-the-ground length of the waypoint sequence.
    pub fn length(&self) -> Distance {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].position().gps_dist(pair[1].position()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(lon: f64, lat: f64) -> Waypoint {
        Waypoint::new(LonLat::new(lon, lat), Marker::waypoint(0))
    }

    // Grow a route through the documented add flow: append the waypoint, then connect it to
    // the previous one.
    fn grow(route: &mut Route, lon: f64, lat: f64) {
        let mut new = Waypoint::new(LonLat::new(lon, lat), Marker::waypoint(route.len()));
        if !route.is_empty() {
            let line = Polyline::new(
                vec![
                    route.destination().unwrap().position(),
                    new.position(),
                ],
                PolylineStyle::default(),
            );
            new.set_connection(line.clone());
            route.add_waypoint(new);
            route.add_line(line);
        } else {
            route.add_waypoint(new);
        }
    }

    #[test]
    fn empty_route_grows_one_waypoint_at_a_time() {
        let mut route = Route::new("Trip");
        assert!(route.is_empty());
        assert!(route.origin().is_none());
        assert!(route.destination().is_none());

        grow(&mut route, 10.0, 20.0);
        assert_eq!(route.len(), 1);
        assert_eq!(route.lines().len(), 0);
        assert_eq!(route.origin().unwrap().position(), LonLat::new(10.0, 20.0));
        assert_eq!(
            route.origin().unwrap().position(),
            route.destination().unwrap().position()
        );

        grow(&mut route, 11.0, 21.0);
        assert_eq!(route.len(), 2);
        assert_eq!(route.lines().len(), 1);
        assert_eq!(
            route.lines()[0].path(),
            &[LonLat::new(10.0, 20.0), LonLat::new(11.0, 21.0)]
        );
    }

    #[test]
    fn lines_invariant_holds_through_add_flow() {
        let mut route = Route::new("long");
        for i in 0..7 {
            grow(&mut route, i as f64, i as f64);
            assert_eq!(route.lines().len(), route.len().saturating_sub(1));
        }
    }

    #[test]
    fn removal_leaves_lines_alone() {
        let mut route = Route::new("asym");
        grow(&mut route, 0.0, 0.0);
        grow(&mut route, 1.0, 1.0);
        grow(&mut route, 2.0, 2.0);

        // Removing the origin doesn't touch the line sequence. Callers must erase and
        // rebuild around the gap themselves.
        let removed = route.remove_waypoint(&wp(0.0, 0.0)).unwrap();
        assert_eq!(removed.position(), LonLat::new(0.0, 0.0));
        assert_eq!(route.len(), 2);
        assert_eq!(route.lines().len(), 2);

        // And removing something absent is a recoverable miss.
        assert!(route.remove_waypoint(&wp(9.0, 9.0)).is_none());
    }

    #[test]
    fn reconnect_repairs_the_gap() {
        let mut route = Route::new("repair");
        grow(&mut route, 0.0, 0.0);
        grow(&mut route, 1.0, 1.0);
        grow(&mut route, 2.0, 2.0);

        route.remove_waypoint(&wp(1.0, 1.0));
        route.reconnect(&PolylineStyle::default());

        assert_eq!(route.len(), 2);
        assert_eq!(route.lines().len(), 1);
        assert_eq!(
            route.lines()[0].path(),
            &[LonLat::new(0.0, 0.0), LonLat::new(2.0, 2.0)]
        );
        assert!(route.waypoint(0).connection().is_none());
        assert_eq!(
            route.waypoint(1).connection().unwrap().path_key(),
            route.lines()[0].path_key()
        );
    }

    #[test]
    fn reconnect_keeps_surviving_edges_and_their_style() {
        let mut route = Route::new("styles");
        grow(&mut route, 0.0, 0.0);

        let mut second = Waypoint::new(LonLat::new(1.0, 1.0), Marker::waypoint(1));
        let fancy = PolylineStyle {
            stroke_color: "green".to_string(),
            ..PolylineStyle::default()
        };
        let line = Polyline::new(
            vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)],
            fancy.clone(),
        );
        second.set_connection(line.clone());
        route.add_waypoint(second);
        route.add_line(line);
        grow(&mut route, 2.0, 2.0);

        // Dropping the destination keeps the custom first edge untouched.
        route.remove_waypoint(&wp(2.0, 2.0));
        route.reconnect(&PolylineStyle::default());

        assert_eq!(route.lines().len(), 1);
        assert_eq!(route.lines()[0].style().stroke_color, "green");
    }

    #[test]
    fn canonical_lookup_round_trips_on_distinct_instances() {
        let mut route = Route::new("lookup");
        grow(&mut route, 0.0, 0.0);
        grow(&mut route, 1.0, 1.0);

        // A separately allocated line with the same path but different style stands in for a
        // rendered peer or event payload copy.
        let peer = Polyline::new(
            vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)],
            PolylineStyle {
                stroke_color: "blue".to_string(),
                ..PolylineStyle::default()
            },
        );

        let owner = route.waypoint_for_line(&peer).unwrap();
        assert_eq!(owner.position(), LonLat::new(1.0, 1.0));

        let canonical = route.line_for_waypoint(owner).unwrap();
        assert_eq!(canonical.path_key(), peer.path_key());

        // The first waypoint legitimately has no connection, so the inverse lookup misses.
        assert!(route.line_for_waypoint(route.waypoint(0)).is_none());

        // A reversed path is a different line and resolves to nothing.
        let reversed = Polyline::new(
            vec![LonLat::new(1.0, 1.0), LonLat::new(0.0, 0.0)],
            PolylineStyle::default(),
        );
        assert!(route.waypoint_for_line(&reversed).is_none());
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_fails_loudly() {
        Route::new("oops").waypoint(0);
    }

    #[test]
    fn length_sums_legs() {
        let route = Route::from_positions(
            "legs",
            vec![
                LonLat::new(-122.3, 47.6),
                LonLat::new(-122.3, 47.7),
                LonLat::new(-122.3, 47.8),
            ],
            &PolylineStyle::default(),
        );
        let direct = LonLat::new(-122.3, 47.6).gps_dist(LonLat::new(-122.3, 47.8));
        let legs = route.length();
        assert!((legs.inner_meters() - direct.inner_meters()).abs() < 1.0);
    }
}
