//! Plain geographic types shared by the route model and the map surface glue. Positions are
//! WGS84 lon/lat; nothing here knows about screens, tiles or projections.

mod distance;
mod gps;

pub use crate::distance::Distance;
pub use crate::gps::{HashableLonLat, LonLat, PathKey};

// Reduce floating point precision errors by rounding everything to this many decimal places.
pub(crate) fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
