use serde::{Deserialize, Serialize};

use crate::Route;

/// How the rendering surface should set itself up for a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub zoom: usize,
    pub map_type: MapType,
    pub pan_control: bool,
    pub zoom_control: bool,
    pub scale_control: bool,
    pub map_type_control: bool,
    pub street_view_control: bool,
}

impl Default for MapOptions {
    fn default() -> MapOptions {
        MapOptions {
            zoom: 15,
            map_type: MapType::Roadmap,
            pan_control: false,
            zoom_control: false,
            scale_control: false,
            map_type_control: false,
            street_view_control: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MapType {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

/// A named collection of routes. Route names are unique within a map, and insertion order is
/// display order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapModel {
    name: String,
    options: MapOptions,
    routes: Vec<Route>,
}

impl MapModel {
    pub fn new(name: &str) -> MapModel {
        MapModel {
            name: name.to_string(),
            options: MapOptions::default(),
            routes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: MapOptions) {
        self.options = options;
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Refuses a route whose name is already taken; returns whether the route was added.
    pub fn add_route(&mut self, route: Route) -> bool {
        if self.get_route(route.name()).is_some() {
            return false;
        }
        self.routes.push(route);
        true
    }

    pub fn remove_route(&mut self, name: &str) -> Option<Route> {
        let idx = self.routes.iter().position(|r| r.name() == name)?;
        Some(self.routes.remove(idx))
    }

    pub fn get_route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name() == name)
    }

    pub fn get_route_mut(&mut self, name: &str) -> Option<&mut Route> {
        self.routes.iter_mut().find(|r| r.name() == name)
    }
}
