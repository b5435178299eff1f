use anyhow::{bail, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use geom::LonLat;

use crate::{MapModel, PolylineStyle, Route};

/// Represents each route as a LineString feature, with the route name and marker visibility
/// as properties.
pub fn map_to_geojson(map: &MapModel) -> GeoJson {
    let mut features = Vec::new();
    for route in map.routes() {
        let coords: Vec<Vec<f64>> = route
            .waypoints()
            .iter()
            .map(|wp| vec![wp.position().longitude, wp.position().latitude])
            .collect();
        let mut properties = serde_json::Map::new();
        properties.insert("name".to_string(), route.name().into());
        properties.insert(
            "interim_markers_visible".to_string(),
            route.interim_markers_visible().into(),
        );
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(coords))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }
    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Reads routes back from a feature collection of LineStrings; other geometry kinds are
/// rejected. GeoJSON doesn't carry line styles, so connections are rebuilt with the given
/// style.
pub fn routes_from_geojson(raw: &str, style: &PolylineStyle) -> Result<Vec<Route>> {
    let gj: GeoJson = raw.parse()?;
    let collection = FeatureCollection::try_from(gj)?;

    let mut routes = Vec::new();
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let name = feature
            .property("name")
            .and_then(|x| x.as_str())
            .map(|x| x.to_string())
            .unwrap_or_else(|| format!("route {}", idx + 1));
        let interim_markers_visible = feature
            .property("interim_markers_visible")
            .and_then(|x| x.as_bool());
        let geometry = match feature.geometry {
            Some(g) => g,
            None => bail!("feature \"{}\" has no geometry", name),
        };
        let positions = match geometry.value {
            Value::LineString(coords) => {
                let mut positions = Vec::new();
                for pair in coords {
                    if pair.len() < 2 {
                        bail!("feature \"{}\" has a malformed coordinate", name);
                    }
                    positions.push(LonLat::new(pair[0], pair[1]));
                }
                positions
            }
            _ => bail!("feature \"{}\" isn't a LineString", name),
        };

        let mut route = Route::from_positions(&name, positions, style);
        if let Some(visible) = interim_markers_visible {
            route.set_interim_markers_visible(visible);
        }
        routes.push(route);
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_survive_a_geojson_round_trip() {
        let mut map = MapModel::new("export me");
        map.add_route(Route::from_positions(
            "commute",
            vec![LonLat::new(-122.33, 47.60), LonLat::new(-122.32, 47.61)],
            &PolylineStyle::default(),
        ));
        let mut hidden = Route::from_positions(
            "errand",
            vec![
                LonLat::new(-122.35, 47.60),
                LonLat::new(-122.36, 47.59),
                LonLat::new(-122.37, 47.58),
            ],
            &PolylineStyle::default(),
        );
        hidden.set_interim_markers_visible(false);
        map.add_route(hidden);

        let raw = map_to_geojson(&map).to_string();
        let routes = routes_from_geojson(&raw, &PolylineStyle::default()).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name(), "commute");
        assert_eq!(routes[0].len(), 2);
        assert_eq!(routes[0].lines().len(), 1);
        assert_eq!(routes[1].name(), "errand");
        assert_eq!(routes[1].len(), 3);
        assert!(!routes[1].interim_markers_visible());
        assert_eq!(
            routes[1].waypoint(0).position(),
            LonLat::new(-122.35, 47.60)
        );
    }

    #[test]
    fn non_linestrings_are_rejected() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "spot" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }]
        }"#;
        assert!(routes_from_geojson(raw, &PolylineStyle::default()).is_err());
    }
}
