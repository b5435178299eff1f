use geom::{LonLat, PathKey};
use serde::{Deserialize, Serialize};

/// Rendering options for a line. Never part of the line's identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolylineStyle {
    pub stroke_color: String,
    pub stroke_weight: f64,
    pub visible: bool,
    pub clickable: bool,
}

impl Default for PolylineStyle {
    fn default() -> PolylineStyle {
        PolylineStyle {
            stroke_color: "red".to_string(),
            stroke_weight: 2.0,
            visible: true,
            clickable: true,
        }
    }
}

/// A line through two or more positions, in order. Two polylines with equal paths are the
/// same line for lookup purposes, even as distinct instances with different styles; compare
/// them with `path_key`, not by identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Polyline {
    path: Vec<LonLat>,
    style: PolylineStyle,
}

impl Polyline {
    pub fn new(path: Vec<LonLat>, style: PolylineStyle) -> Polyline {
        assert!(path.len() >= 2);
        Polyline { path, style }
    }

    pub fn path(&self) -> &[LonLat] {
        &self.path
    }

    pub fn style(&self) -> &PolylineStyle {
        &self.style
    }

    pub fn path_key(&self) -> PathKey {
        PathKey::new(&self.path)
    }
}
