use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::Distance;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    pub fn gps_dist(self, other: LonLat) -> Distance {
        // Haversine distance
        let earth_radius_m = 6_371_000.0;
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(earth_radius_m * c)
    }

    pub fn center(pts: &[LonLat]) -> LonLat {
        assert!(!pts.is_empty());
        let mut lon = 0.0;
        let mut lat = 0.0;
        for pt in pts {
            lon += pt.longitude;
            lat += pt.latitude;
        }
        let len = pts.len() as f64;
        LonLat {
            longitude: lon / len,
            latitude: lat / len,
        }
    }

    pub fn to_hashable(self) -> HashableLonLat {
        HashableLonLat::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// A position usable as a key: coordinates are guaranteed non-NaN, so equality and hashing are
/// well-defined. Two separately allocated positions with the same coordinates are the same key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct HashableLonLat {
    lon_nan: NotNan<f64>,
    lat_nan: NotNan<f64>,
}

impl HashableLonLat {
    pub fn new(lon: f64, lat: f64) -> HashableLonLat {
        HashableLonLat {
            lon_nan: NotNan::new(lon).unwrap(),
            lat_nan: NotNan::new(lat).unwrap(),
        }
    }

    pub fn to_lonlat(self) -> LonLat {
        LonLat::new(self.lon_nan.into_inner(), self.lat_nan.into_inner())
    }
}

impl From<LonLat> for HashableLonLat {
    fn from(pt: LonLat) -> Self {
        pt.to_hashable()
    }
}

/// The identity of a line, derived from its ordered endpoint positions. Two lines with equal
/// paths are the same line, no matter how they were allocated or styled. The point order is
/// part of the key; a reversed path is a different line.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PathKey(Vec<HashableLonLat>);

impl PathKey {
    pub fn new(pts: &[LonLat]) -> PathKey {
        PathKey(pts.iter().map(|pt| pt.to_hashable()).collect())
    }

    pub fn points(&self) -> &[HashableLonLat] {
        &self.0
    }
}
