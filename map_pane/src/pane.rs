use std::collections::HashMap;

use geom::{HashableLonLat, LonLat, PathKey};
use route_model::{
    MapOptions, MapStore, Marker, Polyline, PolylineStyle, Route, RouteIndex, Waypoint,
};

use crate::events::{ContextTarget, EventKind, EventTarget, MapEvent, Outcome};
use crate::locate::Locator;
use crate::render::{MapRenderer, MarkerId, ScreenPt, ShapeId};

/// Whether map clicks edit the current route. Nothing changes the mode except an explicit
/// `set_mode` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Normal,
    AddWaypoints,
}

// Click-added waypoints land here when no route was made current.
const FALLBACK_ROUTE: &str = "temp";

/// The editing facade over one rendering surface and one store. All session state lives
/// here; two panes with separate stores edit independently in one process.
///
/// Every mutating flow applies in the same order: model first, then rendering, then
/// persistence. A crash between the last two leaves rendering ahead of storage, never the
/// reverse, and a failed collaborator call is logged without rolling the model back.
pub struct MapPane<R: MapRenderer> {
    renderer: R,
    locator: Box<dyn Locator>,
    store: MapStore,
    store_path: String,
    index: RouteIndex,

    mode: Mode,
    current_route: Option<String>,
    map_options: MapOptions,
    default_line_style: PolylineStyle,
    default_click_handler: bool,

    ready_fired: bool,
    ready_listeners: Vec<Box<dyn FnOnce(&mut MapPane<R>)>>,

    // Drawn peers, keyed by the value identity of what they render. The surface never owns
    // logical entities; this is the only record of what's actually on screen.
    markers: HashMap<HashableLonLat, MarkerId>,
    shapes: HashMap<PathKey, ShapeId>,
}

impl<R: MapRenderer> MapPane<R> {
    pub fn new(renderer: R, locator: Box<dyn Locator>, store_path: &str) -> MapPane<R> {
        MapPane {
            renderer,
            locator,
            store: MapStore::empty(store_path),
            store_path: store_path.to_string(),
            index: RouteIndex::default(),
            mode: Mode::Normal,
            current_route: None,
            map_options: MapOptions::default(),
            default_line_style: PolylineStyle::default(),
            default_click_handler: true,
            ready_fired: false,
            ready_listeners: Vec::new(),
            markers: HashMap::new(),
            shapes: HashMap::new(),
        }
    }

    pub fn map_options(&self) -> &MapOptions {
        &self.map_options
    }

    /// Must be set before `initialize` to have any effect.
    pub fn set_map_options(&mut self, options: MapOptions) {
        self.map_options = options;
    }

    /// Opts out of the click-to-add handler. Only has an effect before `initialize`.
    pub fn remove_default_event_handler(&mut self) {
        self.default_click_handler = false;
    }

    /// Creates the surface. Setup failures are logged and the pane stays usable; the host
    /// just won't get anything drawn.
    pub fn initialize(&mut self) {
        if let Err(err) = self.renderer.init(&self.map_options) {
            error!("Creating the map surface failed: {}", err);
            return;
        }
        if self.default_click_handler {
            if let Err(err) = self.renderer.subscribe(EventTarget::Map, EventKind::Click) {
                warn!("Subscribing to map clicks failed: {}", err);
            }
        }
    }

    /// The host calls this once the surface reports itself ready: center on the located
    /// position, load the store, then fire the ready listeners, each exactly once.
    pub fn map_ready(&mut self) {
        self.center_on_local();

        match MapStore::load(&self.store_path) {
            Ok(store) => self.store = store,
            Err(err) => {
                error!(
                    "Loading {} failed, starting with an empty store: {}",
                    self.store_path, err
                );
                self.store = MapStore::empty(&self.store_path);
            }
        }
        self.rebuild_index();

        if !self.ready_fired {
            self.ready_fired = true;
            for listener in std::mem::take(&mut self.ready_listeners) {
                listener(self);
            }
        }
    }

    /// Registers a callback fired exactly once, after the surface is ready and the initial
    /// centering and store load have happened. Registering after that point fires
    /// immediately.
    pub fn on_ready(&mut self, listener: Box<dyn FnOnce(&mut MapPane<R>)>) {
        if self.ready_fired {
            listener(self);
        } else {
            self.ready_listeners.push(listener);
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    pub fn current_route(&self) -> Option<&str> {
        self.current_route.as_deref()
    }

    /// Makes this route the one `add_new_waypoint` appends to.
    pub fn select_route(&mut self, name: &str) {
        self.current_route = Some(name.to_string());
    }

    pub fn default_line_style(&self) -> &PolylineStyle {
        &self.default_line_style
    }

    pub fn set_default_line_style(&mut self, style: PolylineStyle) {
        self.default_line_style = style;
    }

    /// Creates an empty map with default options. An existing name is left alone.
    pub fn add_map(&mut self, name: &str) {
        self.store.add_map(name);
    }

    /// Selects the map all route operations work against. Returns whether the name was
    /// known.
    pub fn select_map(&mut self, name: &str) -> bool {
        let selected = self.store.select_map(name);
        if selected {
            self.current_route = None;
            self.rebuild_index();
        }
        selected
    }

    /// Deletes the map and its persisted content.
    pub fn delete_map(&mut self, name: &str) {
        self.store.delete_map(name);
        self.persist();
        self.rebuild_index();
    }

    /// Adds the route to the selected map if its name is free, and persists.
    pub fn add_route(&mut self, route: Route) {
        match self.store.selected_map_mut() {
            Some(map) => {
                if map.add_route(route) {
                    self.persist();
                    self.rebuild_index();
                }
            }
            None => warn!("No map selected; dropping the route"),
        }
    }

    /// Removes the route from the selected map, and persists.
    pub fn remove_route(&mut self, name: &str) {
        if let Some(map) = self.store.selected_map_mut() {
            if map.remove_route(name).is_some() {
                if self.current_route.as_deref() == Some(name) {
                    self.current_route = None;
                }
                self.persist();
                self.rebuild_index();
            }
        }
    }

    pub fn get_route(&self, name: &str) -> Option<&Route> {
        self.store.selected_map()?.get_route(name)
    }

    /// A waypoint at this position with a defaulted marker, labelled by the current route's
    /// size.
    pub fn create_waypoint(&self, position: LonLat) -> Waypoint {
        let idx = self.current_route_model().map_or(0, |r| r.len());
        Waypoint::new(position, Marker::waypoint(idx))
    }

    /// Appends a waypoint to the current route (falling back to a route named "temp" when
    /// none is current), synthesizing the connecting line from the last two positions once
    /// the route has two or more waypoints. Model first, then rendering, then persistence.
    pub fn add_new_waypoint(&mut self, waypoint: Waypoint, style: Option<PolylineStyle>) {
        let line_style = style.unwrap_or_else(|| self.default_line_style.clone());

        if self.store.selected_map().is_none() {
            warn!("No map selected; dropping the waypoint");
            return;
        }
        if self.current_route.is_none() {
            let map = self.store.selected_map_mut().unwrap();
            if map.get_route(FALLBACK_ROUTE).is_none() {
                map.add_route(Route::new(FALLBACK_ROUTE));
            }
            self.current_route = Some(FALLBACK_ROUTE.to_string());
        }
        let name = self.current_route.clone().unwrap();

        let (position, marker, line) = {
            let route = match self
                .store
                .selected_map_mut()
                .and_then(|map| map.get_route_mut(&name))
            {
                Some(route) => route,
                None => {
                    warn!("Current route {} is gone; dropping the waypoint", name);
                    return;
                }
            };
            let mut waypoint = waypoint;
            let line = route
                .destination()
                .map(|prev| Polyline::new(vec![prev.position(), waypoint.position()], line_style));
            if let Some(line) = &line {
                waypoint.set_connection(line.clone());
            }
            let position = waypoint.position();
            let marker = waypoint.marker().clone();
            route.add_waypoint(waypoint);
            if let Some(line) = line.clone() {
                route.add_line(line);
            }
            (position, marker, line)
        };

        self.display_marker(position, &marker);
        if let Some(line) = &line {
            self.display_shape(line);
        }

        self.persist();
        self.rebuild_index();
    }

    /// Renders an existing waypoint, one already part of a route. Its delete affordance
    /// comes from the marker's right-click subscription.
    pub fn display_waypoint(&mut self, wp: &Waypoint) {
        self.display_marker(wp.position(), wp.marker());
    }

    /// Removes the waypoint from the current route. Like the model operation, this leaves
    /// the line sequence alone; the context-menu delete flow is the full
    /// erase/repair/redisplay cycle.
    pub fn remove_waypoint(&mut self, wp: &Waypoint) {
        if let Some(name) = self.current_route.clone() {
            if let Some(route) = self
                .store
                .selected_map_mut()
                .and_then(|map| map.get_route_mut(&name))
            {
                route.remove_waypoint(wp);
            }
        }
        self.rebuild_index();
    }

    /// Draws a standalone marker and subscribes it for right-clicks. Drawing the same
    /// position again is a no-op, which keeps erase bookkeeping exact.
    pub fn display_marker(&mut self, position: LonLat, marker: &Marker) {
        let key = position.to_hashable();
        if self.markers.contains_key(&key) {
            return;
        }
        match self.renderer.draw_marker(position, marker) {
            Ok(id) => {
                self.markers.insert(key, id);
                if let Err(err) = self
                    .renderer
                    .subscribe(EventTarget::Marker(id), EventKind::RightClick)
                {
                    warn!("Subscribing marker right-clicks failed: {}", err);
                }
            }
            Err(err) => error!("Drawing a marker failed: {}", err),
        }
    }

    /// Removes the marker drawn at this position, if any. Removing twice is a no-op.
    pub fn erase_marker(&mut self, position: LonLat) {
        if let Some(id) = self.markers.remove(&position.to_hashable()) {
            if let Err(err) = self.renderer.remove_marker(id) {
                warn!("Removing a marker failed: {}", err);
            }
        }
    }

    /// Renders a connecting line. Right-clicks are only subscribed when some waypoint of
    /// the current route actually owns this line's path.
    pub fn display_shape(&mut self, line: &Polyline) {
        let owned = self
            .current_route_model()
            .map_or(false, |route| route.waypoint_for_line(line).is_some());
        self.draw_shape(owned, line);
    }

    /// Removes the line drawn with this path, if any.
    pub fn erase_shape(&mut self, line: &Polyline) {
        if let Some(id) = self.shapes.remove(&line.path_key()) {
            if let Err(err) = self.renderer.remove_line(id) {
                warn!("Removing a line failed: {}", err);
            }
        }
    }

    /// Renders a route: markers for its waypoints (interim ones only when the route says
    /// so; endpoints always), then its lines, after re-attaching each line as the canonical
    /// connection of its owning waypoint.
    pub fn display_route(&mut self, name: &str) {
        let route = {
            let map = match self.store.selected_map_mut() {
                Some(map) => map,
                None => {
                    warn!("No map selected; nothing to display");
                    return;
                }
            };
            match map.get_route_mut(name) {
                Some(route) => {
                    route.refresh_connections();
                    route.clone()
                }
                None => {
                    warn!("No route {} to display", name);
                    return;
                }
            }
        };

        let last = route.len().saturating_sub(1);
        for (idx, wp) in route.waypoints().iter().enumerate() {
            if route.interim_markers_visible() || idx == 0 || idx == last {
                self.display_marker(wp.position(), wp.marker());
            }
        }
        for line in route.lines() {
            let owned = route.waypoint_for_line(line).is_some();
            self.draw_shape(owned, line);
        }
    }

    /// Displays each route in turn, leaving the last one current, then refreshes the
    /// surface.
    pub fn display_routes(&mut self, names: &[String]) {
        for name in names {
            self.current_route = Some(name.clone());
            self.display_route(name);
        }
        self.refresh();
    }

    /// Non-destructively removes a route's rendered primitives. The model is untouched, and
    /// erasing twice in a row is the same as erasing once.
    pub fn erase_route(&mut self, name: &str) {
        let (positions, keys) = match self.get_route(name) {
            Some(route) => (
                route
                    .waypoints()
                    .iter()
                    .map(|wp| wp.position())
                    .collect::<Vec<_>>(),
                route
                    .lines()
                    .iter()
                    .map(|line| line.path_key())
                    .collect::<Vec<_>>(),
            ),
            None => return,
        };
        for position in positions {
            self.erase_marker(position);
        }
        for key in keys {
            if let Some(id) = self.shapes.remove(&key) {
                if let Err(err) = self.renderer.remove_line(id) {
                    warn!("Removing a line failed: {}", err);
                }
            }
        }
    }

    /// Erases the route's rendering, empties it logically, and persists.
    pub fn clear_route(&mut self, name: &str) {
        self.erase_route(name);
        if let Some(route) = self
            .store
            .selected_map_mut()
            .and_then(|map| map.get_route_mut(name))
        {
            route.remove_all_waypoints();
        }
        self.persist();
        self.rebuild_index();
    }

    /// Clears every route of the selected map, logically and on the surface.
    pub fn clear_map(&mut self) {
        self.current_route = None;
        for name in self.route_names() {
            self.clear_route(&name);
        }
    }

    /// Erases all rendered content without touching the model.
    pub fn erase_map(&mut self) {
        for name in self.route_names() {
            self.erase_route(&name);
        }
    }

    /// The host forwards surface events here, already marshalled onto the event thread.
    pub fn event(&mut self, event: MapEvent) -> Outcome {
        match (event.target, event.kind) {
            (EventTarget::Map, EventKind::Click) => {
                if !self.default_click_handler || self.mode != Mode::AddWaypoints {
                    return Outcome::Nothing;
                }
                if self.store.selected_map().is_none() {
                    return Outcome::Nothing;
                }
                let waypoint = self.create_waypoint(event.position);
                self.add_new_waypoint(waypoint, None);
                match self.current_route.clone() {
                    Some(route) => Outcome::WaypointAdded { route },
                    None => Outcome::Nothing,
                }
            }
            (EventTarget::Marker(id), EventKind::RightClick) => {
                let target = self
                    .marker_position(id)
                    .and_then(|position| self.waypoint_target(position));
                self.context_menu(target, event.position)
            }
            (EventTarget::Shape(id), EventKind::RightClick) => {
                let target = self
                    .shape_path(id)
                    .and_then(|key| self.connection_target(&key));
                self.context_menu(target, event.position)
            }
            _ => Outcome::Nothing,
        }
    }

    /// The context-menu delete flow: re-resolve the canonical waypoint, erase the route's
    /// rendering, remove the waypoint, repair the connections around the gap, redisplay,
    /// persist.
    pub fn delete_object(&mut self, target: &ContextTarget) {
        let (name, position) = match target {
            ContextTarget::Waypoint { route, position }
            | ContextTarget::Connection { route, position } => (route.clone(), *position),
        };
        self.current_route = Some(name.clone());
        self.erase_route(&name);

        let style = self.default_line_style.clone();
        match self
            .store
            .selected_map_mut()
            .and_then(|map| map.get_route_mut(&name))
        {
            Some(route) => {
                let canonical = route
                    .waypoints()
                    .iter()
                    .find(|wp| wp.position() == position)
                    .cloned();
                match canonical {
                    Some(wp) => {
                        route.remove_waypoint(&wp);
                        route.reconnect(&style);
                    }
                    None => warn!("No waypoint at {} in {}; nothing deleted", position, name),
                }
            }
            None => {
                warn!("Route {} is gone; nothing deleted", name);
                return;
            }
        }

        self.display_route(&name);
        self.persist();
        self.rebuild_index();
    }

    /// Centers the surface on the locator's best guess at where the user is. Failures keep
    /// the current center.
    pub fn center_on_local(&mut self) {
        match self.locator.locate() {
            Ok(position) => {
                if let Err(err) = self.renderer.set_center(position) {
                    warn!("Centering on the local position failed: {}", err);
                }
            }
            Err(err) => warn!("Geolocation failed, keeping the default center: {}", err),
        }
    }

    pub fn set_center(&mut self, position: LonLat) {
        if let Err(err) = self.renderer.set_center(position) {
            warn!("Setting the center failed: {}", err);
        }
    }

    pub fn zoom(&self) -> usize {
        self.renderer.zoom()
    }

    pub fn set_zoom(&mut self, zoom: usize) {
        if let Err(err) = self.renderer.set_zoom(zoom) {
            warn!("Setting the zoom failed: {}", err);
        }
    }

    /// Redraws by nudging the zoom out and back, the way embedded surfaces are coaxed into
    /// repainting.
    pub fn refresh(&mut self) {
        let zoom = self.renderer.zoom();
        let nudged = self
            .renderer
            .set_zoom(zoom + 1)
            .and_then(|_| self.renderer.set_zoom(zoom));
        if let Err(err) = nudged {
            warn!("Refreshing the surface failed: {}", err);
        }
    }

    pub fn screen_point(&self, position: LonLat) -> Option<ScreenPt> {
        self.renderer.screen_point(position)
    }

    fn context_menu(&mut self, target: Option<ContextTarget>, position: LonLat) -> Outcome {
        match target {
            Some(target) => {
                // Right-clicking an object also makes its route current.
                let route = match &target {
                    ContextTarget::Waypoint { route, .. } => route.clone(),
                    ContextTarget::Connection { route, .. } => route.clone(),
                };
                self.current_route = Some(route);
                Outcome::ShowContextMenu {
                    screen: self.renderer.screen_point(position),
                    target,
                }
            }
            None => Outcome::Nothing,
        }
    }

    // Resolves a right-clicked marker to the canonical waypoint in its owning route.
    fn waypoint_target(&self, position: LonLat) -> Option<ContextTarget> {
        let name = self.index.route_for_position(position)?;
        let route = self.store.selected_map()?.get_route(name)?;
        let canonical = route
            .waypoints()
            .iter()
            .find(|wp| wp.position() == position)?;
        Some(ContextTarget::Waypoint {
            route: name.to_string(),
            position: canonical.position(),
        })
    }

    // Resolves a right-clicked line to the waypoint owning that connection.
    fn connection_target(&self, key: &PathKey) -> Option<ContextTarget> {
        let name = self.index.route_for_path(key)?;
        let route = self.store.selected_map()?.get_route(name)?;
        let canonical = route.waypoint_for_path(key)?;
        Some(ContextTarget::Connection {
            route: name.to_string(),
            position: canonical.position(),
        })
    }

    fn marker_position(&self, id: MarkerId) -> Option<LonLat> {
        self.markers
            .iter()
            .find(|(_, drawn)| **drawn == id)
            .map(|(key, _)| key.to_lonlat())
    }

    fn shape_path(&self, id: ShapeId) -> Option<PathKey> {
        self.shapes
            .iter()
            .find(|(_, drawn)| **drawn == id)
            .map(|(key, _)| key.clone())
    }

    fn draw_shape(&mut self, owned: bool, line: &Polyline) {
        let key = line.path_key();
        if self.shapes.contains_key(&key) {
            return;
        }
        match self.renderer.draw_line(line.path(), line.style()) {
            Ok(id) => {
                self.shapes.insert(key, id);
                if owned {
                    if let Err(err) = self
                        .renderer
                        .subscribe(EventTarget::Shape(id), EventKind::RightClick)
                    {
                        warn!("Subscribing line right-clicks failed: {}", err);
                    }
                }
            }
            Err(err) => error!("Drawing a line failed: {}", err),
        }
    }

    fn current_route_model(&self) -> Option<&Route> {
        let name = self.current_route.as_ref()?;
        self.store.selected_map()?.get_route(name)
    }

    fn route_names(&self) -> Vec<String> {
        match self.store.selected_map() {
            Some(map) => map
                .routes()
                .iter()
                .map(|route| route.name().to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.store() {
            error!("Persisting the store failed: {}", err);
        }
    }

    fn rebuild_index(&mut self) {
        self.index = match self.store.selected_map() {
            Some(map) => RouteIndex::rebuild(map),
            None => RouteIndex::default(),
        };
    }
}
