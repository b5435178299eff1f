//! The logical map model: named maps containing named routes of waypoints and their
//! connecting lines, the value-keyed lookups that resolve rendered peers back to the
//! entities actually stored here, and the JSON store persisting all of it.

#[macro_use]
extern crate log;

mod convert;
mod index;
mod map;
mod polyline;
mod route;
mod store;
mod waypoint;

pub use crate::convert::{map_to_geojson, routes_from_geojson};
pub use crate::index::RouteIndex;
pub use crate::map::{MapModel, MapOptions, MapType};
pub use crate::polyline::{Polyline, PolylineStyle};
pub use crate::route::Route;
pub use crate::store::MapStore;
pub use crate::waypoint::{Marker, MarkerColor, Waypoint};
